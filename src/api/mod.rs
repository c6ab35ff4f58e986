use std::sync::Arc;

use actix_web::{web, HttpRequest};
use chrono::{Local, NaiveDate};

use crate::auth::SessionStore;
use crate::error::ApiError;
use crate::models::User;
use crate::store::Store;

pub mod accounts;
pub mod registrations;
pub mod runs;
pub mod users;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionStore,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, bcrypt_cost: u32) -> Self {
        AppState {
            store,
            sessions: SessionStore::new(),
            bcrypt_cost,
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .route("/signup", web::post().to(accounts::signup))
            .route("/login", web::post().to(accounts::login))
            .route("/logout", web::post().to(accounts::logout))
            .route("/me", web::get().to(accounts::me))
            .route("/users", web::get().to(users::list_users))
            .route("/users/{id}", web::get().to(users::get_user))
            .route("/runs", web::get().to(runs::list_runs))
            .route("/runs", web::post().to(runs::create_run))
            .route("/runs/{id}", web::get().to(runs::get_run))
            .route("/planners/{id}/runs", web::get().to(runs::planner_runs))
            .route("/runners/{id}/runs", web::get().to(runs::runner_runs))
            .route("/register", web::post().to(registrations::register)),
    );
}

/// Run dates are compared against the server's local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The user behind the request's session cookie.
pub async fn current_user(req: &HttpRequest, state: &AppState) -> Result<User, ApiError> {
    let session = state
        .sessions
        .for_request(req)
        .ok_or_else(|| ApiError::Unauthorized("not logged in".to_string()))?;

    let store = Arc::clone(&state.store);
    web::block(move || store.find_user(session.user_id))
        .await??
        .ok_or_else(|| ApiError::Unauthorized("session user no longer exists".to_string()))
}
