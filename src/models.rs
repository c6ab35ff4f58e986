use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: String,
    pub gender: String,
    pub age: i32,
    pub planner: bool,
    pub runner: bool,
}

/// A user about to be inserted. `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub gender: String,
    pub age: i32,
    pub planner: bool,
    pub runner: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_to: String,
    pub latitude_to: f64,
    pub longitude_to: f64,
    pub distance: f64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub planner_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewRun {
    pub name: String,
    pub description: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_to: String,
    pub latitude_to: f64,
    pub longitude_to: f64,
    pub distance: f64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub planner_id: i64,
}

/// A `users_runs` row: one runner signed up for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub id: i64,
    pub runner_id: i64,
    pub run_id: i64,
    pub time: i32,
    pub rating: i32,
}

/// A run as the listing endpoints present it.
#[derive(Debug, Clone, Serialize)]
pub struct RunView {
    pub id: i64,
    pub planner_id: i64,
    pub name: String,
    pub description: String,
    pub distance: f64,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_to: String,
    pub latitude_to: f64,
    pub longitude_to: f64,
    pub date: String,
    pub event_time: String,
    pub future_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunnerRunView {
    #[serde(flatten)]
    pub run: RunView,
    pub time: i32,
    pub rating: i32,
}

impl Run {
    /// Runs dated today are still joinable; time of day is ignored.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date >= today
    }

    pub fn view(&self, today: NaiveDate) -> RunView {
        RunView {
            id: self.id,
            planner_id: self.planner_id,
            name: self.name.clone(),
            description: self.description.clone(),
            distance: self.distance,
            location: self.location.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            location_to: self.location_to.clone(),
            latitude_to: self.latitude_to,
            longitude_to: self.longitude_to,
            date: format_run_date(self.date),
            event_time: format_event_time(self.time),
            future_run: self.is_upcoming(today),
        }
    }
}

/// `18th Oct, 2026`
pub fn format_run_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{:02}{} {}", day, suffix, date.format("%b, %Y"))
}

/// `07:30 AM`
pub fn format_event_time(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_on(date: NaiveDate) -> Run {
        Run {
            id: 7,
            name: "Harbour loop".to_string(),
            description: "Easy pace".to_string(),
            location: "Pier 4".to_string(),
            latitude: 57.70,
            longitude: 11.97,
            location_to: "Pier 4".to_string(),
            latitude_to: 57.70,
            longitude_to: 11.97,
            distance: 10.0,
            date,
            time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            planner_id: 1,
        }
    }

    #[test]
    fn ordinal_suffixes() {
        let d = |day| format_run_date(NaiveDate::from_ymd_opt(2026, 10, day).unwrap());
        assert_eq!(d(1), "01st Oct, 2026");
        assert_eq!(d(2), "02nd Oct, 2026");
        assert_eq!(d(3), "03rd Oct, 2026");
        assert_eq!(d(11), "11th Oct, 2026");
        assert_eq!(d(12), "12th Oct, 2026");
        assert_eq!(d(13), "13th Oct, 2026");
        assert_eq!(d(18), "18th Oct, 2026");
        assert_eq!(d(22), "22nd Oct, 2026");
        assert_eq!(d(31), "31st Oct, 2026");
    }

    #[test]
    fn event_time_is_twelve_hour() {
        assert_eq!(format_event_time(NaiveTime::from_hms_opt(7, 30, 0).unwrap()), "07:30 AM");
        assert_eq!(format_event_time(NaiveTime::from_hms_opt(18, 5, 0).unwrap()), "06:05 PM");
    }

    #[test]
    fn run_dated_today_is_upcoming() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert!(run_on(today).is_upcoming(today));
        assert!(run_on(today.succ_opt().unwrap()).view(today).future_run);
        assert!(!run_on(today.pred_opt().unwrap()).view(today).future_run);
    }

    #[test]
    fn password_is_not_serialized() {
        let user = User {
            id: 1,
            created_at: Utc::now(),
            name: "Jane Doe".to_string(),
            email: "jane@jane.com".to_string(),
            password: "$2b$04$secret".to_string(),
            phone: "123456789".to_string(),
            gender: "F".to_string(),
            age: 23,
            planner: true,
            runner: true,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "jane@jane.com");
    }
}
