use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::Store;
use crate::error::StoreError;
use crate::models::{NewRun, NewUser, Registration, Run, User};

/// Keeps every table in process memory. Ids start at 1 like `BIGSERIAL`, and
/// inserts check references the way the PostgreSQL foreign keys do.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    runs: Vec<Run>,
    users_runs: Vec<Registration>,
}

fn next_id(len: usize) -> i64 {
    len as i64 + 1
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    pub fn registration_count(&self, runner_id: i64, run_id: i64) -> Result<usize, StoreError> {
        Ok(self
            .tables()?
            .users_runs
            .iter()
            .filter(|r| r.runner_id == runner_id && r.run_id == run_id)
            .count())
    }

    pub fn total_registrations(&self) -> Result<usize, StoreError> {
        Ok(self.tables()?.users_runs.len())
    }
}

impl Store for MemoryStore {
    fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables()?.users.clone())
    }

    fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables()?.users.iter().find(|u| u.id == id).cloned())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.tables()?.users.iter().find(|u| u.email == email).cloned())
    }

    fn insert_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables()?;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("users"));
        }
        let row = User {
            id: next_id(tables.users.len()),
            created_at: Utc::now(),
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            phone: user.phone.clone(),
            gender: user.gender.clone(),
            age: user.age,
            planner: user.planner,
            runner: user.runner,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    fn list_runs(&self) -> Result<Vec<Run>, StoreError> {
        let mut runs = self.tables()?.runs.clone();
        runs.sort_by_key(|r| (r.date, r.time));
        Ok(runs)
    }

    fn find_run(&self, id: i64) -> Result<Option<Run>, StoreError> {
        Ok(self.tables()?.runs.iter().find(|r| r.id == id).cloned())
    }

    fn insert_run(&self, run: &NewRun) -> Result<Run, StoreError> {
        let mut tables = self.tables()?;
        if !tables.users.iter().any(|u| u.id == run.planner_id) {
            return Err(StoreError::MissingReference("runs"));
        }
        let row = Run {
            id: next_id(tables.runs.len()),
            name: run.name.clone(),
            description: run.description.clone(),
            location: run.location.clone(),
            latitude: run.latitude,
            longitude: run.longitude,
            location_to: run.location_to.clone(),
            latitude_to: run.latitude_to,
            longitude_to: run.longitude_to,
            distance: run.distance,
            date: run.date,
            time: run.time,
            planner_id: run.planner_id,
        };
        tables.runs.push(row.clone());
        Ok(row)
    }

    fn runs_for_planner(&self, planner_id: i64) -> Result<Vec<Run>, StoreError> {
        Ok(self
            .list_runs()?
            .into_iter()
            .filter(|r| r.planner_id == planner_id)
            .collect())
    }

    fn runs_for_runner(&self, runner_id: i64) -> Result<Vec<(Run, Registration)>, StoreError> {
        let tables = self.tables()?;
        let mut joined: Vec<(Run, Registration)> = tables
            .users_runs
            .iter()
            .filter(|reg| reg.runner_id == runner_id)
            .filter_map(|reg| {
                tables
                    .runs
                    .iter()
                    .find(|run| run.id == reg.run_id)
                    .map(|run| (run.clone(), reg.clone()))
            })
            .collect();
        joined.sort_by_key(|(run, _)| (run.date, run.time));
        Ok(joined)
    }

    fn find_registration(
        &self,
        runner_id: i64,
        run_id: i64,
    ) -> Result<Option<Registration>, StoreError> {
        Ok(self
            .tables()?
            .users_runs
            .iter()
            .find(|r| r.runner_id == runner_id && r.run_id == run_id)
            .cloned())
    }

    fn insert_registration(
        &self,
        runner_id: i64,
        run_id: i64,
    ) -> Result<Registration, StoreError> {
        let mut tables = self.tables()?;
        if !tables.users.iter().any(|u| u.id == runner_id)
            || !tables.runs.iter().any(|r| r.id == run_id)
        {
            return Err(StoreError::MissingReference("users_runs"));
        }
        if tables
            .users_runs
            .iter()
            .any(|r| r.runner_id == runner_id && r.run_id == run_id)
        {
            return Err(StoreError::Conflict("users_runs"));
        }
        let row = Registration {
            id: next_id(tables.users_runs.len()),
            runner_id,
            run_id,
            time: 0,
            rating: 0,
        };
        tables.users_runs.push(row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            phone: "123456789".to_string(),
            gender: "F".to_string(),
            age: 23,
            planner: true,
            runner: true,
        }
    }

    #[test]
    fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let jane = store.insert_user(&new_user("jane@jane.com")).unwrap();
        assert_eq!(jane.id, 1);
        assert!(matches!(
            store.insert_user(&new_user("jane@jane.com")),
            Err(StoreError::Conflict("users"))
        ));
        assert_eq!(store.list_users().unwrap().len(), 1);
    }

    fn new_run(planner_id: i64) -> NewRun {
        NewRun {
            name: "Hill repeats".to_string(),
            description: String::new(),
            location: "Ramberget".to_string(),
            latitude: 57.71,
            longitude: 11.93,
            location_to: "Ramberget".to_string(),
            latitude_to: 57.71,
            longitude_to: 11.93,
            distance: 8.0,
            date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            planner_id,
        }
    }

    #[test]
    fn duplicate_registration_conflicts() {
        let store = MemoryStore::new();
        let jane = store.insert_user(&new_user("jane@jane.com")).unwrap().id;
        let john = store.insert_user(&new_user("john@doe.org")).unwrap().id;
        let run = store.insert_run(&new_run(jane)).unwrap().id;

        store.insert_registration(jane, run).unwrap();
        assert!(matches!(
            store.insert_registration(jane, run),
            Err(StoreError::Conflict("users_runs"))
        ));
        assert_eq!(store.registration_count(jane, run).unwrap(), 1);
        store.insert_registration(john, run).unwrap();
        assert_eq!(store.total_registrations().unwrap(), 2);
    }

    #[test]
    fn unknown_references_are_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.insert_run(&new_run(9)),
            Err(StoreError::MissingReference("runs"))
        ));

        let jane = store.insert_user(&new_user("jane@jane.com")).unwrap().id;
        let run = store.insert_run(&new_run(jane)).unwrap().id;
        assert!(matches!(
            store.insert_registration(9, run),
            Err(StoreError::MissingReference("users_runs"))
        ));
        assert!(matches!(
            store.insert_registration(jane, 9),
            Err(StoreError::MissingReference("users_runs"))
        ));
        assert_eq!(store.total_registrations().unwrap(), 0);
    }
}
