//! Signing a runner up for a run.
//!
//! A registration is accepted only for runs dated today or later, and only
//! once per (runner, run) pair. The duplicate check up front gives the common
//! case a clear answer; the store's uniqueness constraint settles the case
//! where two requests for the same pair pass that check together.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::models::Registration;
use crate::store::Store;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("run is in the past or does not exist")]
    PastOrMissingRun { run_id: i64 },

    #[error("already registered for this run")]
    AlreadyRegistered { runner_id: i64, run_id: i64 },

    #[error("runner does not exist")]
    UnknownRunner { runner_id: i64 },

    #[error("could not register for run: {0}")]
    Store(#[from] StoreError),
}

impl RegistrationError {
    /// Stable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            RegistrationError::PastOrMissingRun { .. } => "past_or_missing_run",
            RegistrationError::AlreadyRegistered { .. } => "already_registered",
            RegistrationError::UnknownRunner { .. } => "unknown_runner",
            RegistrationError::Store(_) => "store_error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Registered {
    pub user_run: Registration,
    pub message: String,
}

pub fn register_for_run<S: Store + ?Sized>(
    store: &S,
    runner_id: i64,
    run_id: i64,
    today: NaiveDate,
) -> Result<Registered, RegistrationError> {
    let run = match store.find_run(run_id)? {
        Some(run) if run.is_upcoming(today) => run,
        _ => return Err(RegistrationError::PastOrMissingRun { run_id }),
    };

    if store.find_registration(runner_id, run_id)?.is_some() {
        return Err(RegistrationError::AlreadyRegistered { runner_id, run_id });
    }

    let user_run = match store.insert_registration(runner_id, run_id) {
        Ok(row) => row,
        Err(StoreError::Conflict(_)) => {
            warn!(runner_id, run_id, "concurrent registration for the same run");
            return Err(RegistrationError::AlreadyRegistered { runner_id, run_id });
        }
        // The run was found above, so the dangling reference is the runner.
        Err(StoreError::MissingReference(_)) => {
            return Err(RegistrationError::UnknownRunner { runner_id });
        }
        Err(err) => return Err(err.into()),
    };

    info!(runner_id, run_id, registration_id = user_run.id, "runner registered");
    Ok(Registered {
        user_run,
        message: format!("registered for {} on {}", run.name, run.date),
    })
}
