//! Access to the `users`, `runs` and `users_runs` tables.
//!
//! Handlers and the registration check only see the [`Store`] trait, so the
//! same code runs against PostgreSQL in production and [`MemoryStore`] in
//! tests.

use crate::error::StoreError;
use crate::models::{NewRun, NewUser, Registration, Run, User};

pub mod memory;
pub mod pg;

pub use self::memory::MemoryStore;
pub use self::pg::PgStore;

pub trait Store: Send + Sync {
    fn list_users(&self) -> Result<Vec<User>, StoreError>;

    fn find_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Conflict`] if the email is taken.
    fn insert_user(&self, user: &NewUser) -> Result<User, StoreError>;

    fn list_runs(&self) -> Result<Vec<Run>, StoreError>;

    fn find_run(&self, id: i64) -> Result<Option<Run>, StoreError>;

    /// Fails with [`StoreError::MissingReference`] if the planner does not exist.
    fn insert_run(&self, run: &NewRun) -> Result<Run, StoreError>;

    fn runs_for_planner(&self, planner_id: i64) -> Result<Vec<Run>, StoreError>;

    /// Runs the runner signed up for, each with its registration row.
    fn runs_for_runner(&self, runner_id: i64) -> Result<Vec<(Run, Registration)>, StoreError>;

    fn find_registration(
        &self,
        runner_id: i64,
        run_id: i64,
    ) -> Result<Option<Registration>, StoreError>;

    /// Inserts a registration with zeroed time and rating. Fails with
    /// [`StoreError::Conflict`] if the pair is already registered, or with
    /// [`StoreError::MissingReference`] if the runner or run does not exist.
    fn insert_registration(&self, runner_id: i64, run_id: i64)
        -> Result<Registration, StoreError>;
}
