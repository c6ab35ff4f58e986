use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{today, AppState};
use crate::error::ApiError;
use crate::models::Registration;
use crate::registration::{register_for_run, RegistrationError};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub runner_id: i64,
    pub run_id: i64,
}

/// Same shape for success and failure; `user_run` is only present on success.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_run: Option<Registration>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

fn status_for(err: &RegistrationError) -> StatusCode {
    match err {
        RegistrationError::PastOrMissingRun { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        RegistrationError::AlreadyRegistered { .. } => StatusCode::CONFLICT,
        RegistrationError::UnknownRunner { .. } => StatusCode::NOT_FOUND,
        RegistrationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let RegisterRequest { runner_id, run_id } = body.into_inner();
    let store = Arc::clone(&state.store);
    let today = today();

    let outcome = web::block(move || register_for_run(&*store, runner_id, run_id, today)).await?;

    Ok(match outcome {
        Ok(registered) => HttpResponse::Created().json(RegisterResponse {
            user_run: Some(registered.user_run),
            message: registered.message,
            error: None,
        }),
        Err(err) => {
            warn!(runner_id, run_id, "registration refused: {}", err);
            HttpResponse::build(status_for(&err)).json(RegisterResponse {
                user_run: None,
                message: err.to_string(),
                error: Some(err.code()),
            })
        }
    })
}
