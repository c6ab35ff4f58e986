use postgres::error::SqlState;
use postgres::Row;
use tracing::debug;

use super::Store;
use crate::error::StoreError;
use crate::models::{NewRun, NewUser, Registration, Run, User};
use crate::DbPool;

const USER_COLUMNS: &str =
    "id, created_at, name, email, password, phone, gender, age, planner, runner";

const RUN_COLUMNS: &str = "runs.id, runs.name, runs.description, runs.location, runs.latitude, \
     runs.longitude, runs.location_to, runs.latitude_to, runs.longitude_to, runs.distance, \
     runs.date, runs.time, runs.planner_id";

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        PgStore { pool }
    }
}

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        created_at: row.get("created_at"),
        name: row.get("name"),
        email: row.get("email"),
        password: row.get("password"),
        phone: row.get("phone"),
        gender: row.get("gender"),
        age: row.get("age"),
        planner: row.get("planner"),
        runner: row.get("runner"),
    }
}

fn run_from_row(row: &Row) -> Run {
    Run {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        location: row.get("location"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        location_to: row.get("location_to"),
        latitude_to: row.get("latitude_to"),
        longitude_to: row.get("longitude_to"),
        distance: row.get("distance"),
        date: row.get("date"),
        time: row.get("time"),
        planner_id: row.get("planner_id"),
    }
}

fn registration_from_row(row: &Row) -> Registration {
    Registration {
        id: row.get("id"),
        runner_id: row.get("runner_id"),
        run_id: row.get("run_id"),
        time: row.get("time"),
        rating: row.get("rating"),
    }
}

fn is_unique_violation(err: &postgres::Error) -> bool {
    err.code() == Some(&SqlState::UNIQUE_VIOLATION)
}

fn is_foreign_key_violation(err: &postgres::Error) -> bool {
    err.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION)
}

impl Store for PgStore {
    fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut db = self.pool.get()?;
        let rows = db.query(
            format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS).as_str(),
            &[],
        )?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let mut db = self.pool.get()?;
        let row = db.query_opt(
            format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS).as_str(),
            &[&id],
        )?;
        Ok(row.as_ref().map(user_from_row))
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let mut db = self.pool.get()?;
        let row = db.query_opt(
            format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS).as_str(),
            &[&email],
        )?;
        Ok(row.as_ref().map(user_from_row))
    }

    fn insert_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let mut db = self.pool.get()?;
        let row = db
            .query_one(
                format!(
                    "INSERT INTO users (name, email, password, phone, gender, age, planner, runner)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                     RETURNING {}",
                    USER_COLUMNS
                )
                .as_str(),
                &[
                    &user.name,
                    &user.email,
                    &user.password,
                    &user.phone,
                    &user.gender,
                    &user.age,
                    &user.planner,
                    &user.runner,
                ],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::Conflict("users")
                } else {
                    StoreError::Db(err)
                }
            })?;
        Ok(user_from_row(&row))
    }

    fn list_runs(&self) -> Result<Vec<Run>, StoreError> {
        let mut db = self.pool.get()?;
        let rows = db.query(
            format!("SELECT {} FROM runs ORDER BY runs.date, runs.time", RUN_COLUMNS).as_str(),
            &[],
        )?;
        Ok(rows.iter().map(run_from_row).collect())
    }

    fn find_run(&self, id: i64) -> Result<Option<Run>, StoreError> {
        let mut db = self.pool.get()?;
        let row = db.query_opt(
            format!("SELECT {} FROM runs WHERE runs.id = $1", RUN_COLUMNS).as_str(),
            &[&id],
        )?;
        Ok(row.as_ref().map(run_from_row))
    }

    fn insert_run(&self, run: &NewRun) -> Result<Run, StoreError> {
        let mut db = self.pool.get()?;
        let row = db
            .query_one(
                "INSERT INTO runs (name, description, location, latitude, longitude,
                                   location_to, latitude_to, longitude_to, distance,
                                   date, time, planner_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                 RETURNING *",
                &[
                    &run.name,
                    &run.description,
                    &run.location,
                    &run.latitude,
                    &run.longitude,
                    &run.location_to,
                    &run.latitude_to,
                    &run.longitude_to,
                    &run.distance,
                    &run.date,
                    &run.time,
                    &run.planner_id,
                ],
            )
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    StoreError::MissingReference("runs")
                } else {
                    StoreError::Db(err)
                }
            })?;
        Ok(run_from_row(&row))
    }

    fn runs_for_planner(&self, planner_id: i64) -> Result<Vec<Run>, StoreError> {
        let mut db = self.pool.get()?;
        let rows = db.query(
            format!(
                "SELECT {} FROM runs WHERE runs.planner_id = $1 ORDER BY runs.date, runs.time",
                RUN_COLUMNS
            )
            .as_str(),
            &[&planner_id],
        )?;
        Ok(rows.iter().map(run_from_row).collect())
    }

    fn runs_for_runner(&self, runner_id: i64) -> Result<Vec<(Run, Registration)>, StoreError> {
        let mut db = self.pool.get()?;
        let rows = db.query(
            format!(
                "SELECT {}, users_runs.id AS registration_id, users_runs.runner_id,
                        users_runs.run_id, users_runs.time AS registration_time,
                        users_runs.rating
                 FROM runs
                 JOIN users_runs ON runs.id = users_runs.run_id
                 WHERE users_runs.runner_id = $1
                 ORDER BY runs.date, runs.time",
                RUN_COLUMNS
            )
            .as_str(),
            &[&runner_id],
        )?;
        Ok(rows
            .iter()
            .map(|row| {
                let registration = Registration {
                    id: row.get("registration_id"),
                    runner_id: row.get("runner_id"),
                    run_id: row.get("run_id"),
                    time: row.get("registration_time"),
                    rating: row.get("rating"),
                };
                (run_from_row(row), registration)
            })
            .collect())
    }

    fn find_registration(
        &self,
        runner_id: i64,
        run_id: i64,
    ) -> Result<Option<Registration>, StoreError> {
        let mut db = self.pool.get()?;
        let row = db.query_opt(
            "SELECT * FROM users_runs WHERE runner_id = $1 AND run_id = $2 LIMIT 1",
            &[&runner_id, &run_id],
        )?;
        Ok(row.as_ref().map(registration_from_row))
    }

    fn insert_registration(
        &self,
        runner_id: i64,
        run_id: i64,
    ) -> Result<Registration, StoreError> {
        let mut db = self.pool.get()?;
        // The unique (runner_id, run_id) constraint turns a lost race into an empty result.
        let row = db.query_opt(
            "INSERT INTO users_runs (time, rating, runner_id, run_id)
             VALUES (0, 0, $1, $2)
             ON CONFLICT (runner_id, run_id) DO NOTHING
             RETURNING *",
            &[&runner_id, &run_id],
        )
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                StoreError::MissingReference("users_runs")
            } else {
                StoreError::Db(err)
            }
        })?;
        match row {
            Some(row) => Ok(registration_from_row(&row)),
            None => {
                debug!("registration of runner {} for run {} lost a race", runner_id, run_id);
                Err(StoreError::Conflict("users_runs"))
            }
        }
    }
}
