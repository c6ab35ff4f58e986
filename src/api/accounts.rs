use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{current_user, AppState};
use crate::auth::password;
use crate::auth::session::{expired_cookie, session_cookie};
use crate::auth::SESSION_COOKIE;
use crate::error::{ApiError, StoreError};
use crate::models::{NewUser, User};

fn default_runner() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub planner: bool,
    #[serde(default = "default_runner")]
    pub runner: bool,
}

#[derive(Debug, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<Signup>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let email = normalize_email(&body.email);
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    if !email.contains('@') {
        return Err(ApiError::BadRequest("email address is invalid".to_string()));
    }
    if body.age < 0 {
        return Err(ApiError::BadRequest("age cannot be negative".to_string()));
    }
    password::validate_strength(&body.password)?;

    let store = Arc::clone(&state.store);
    let cost = state.bcrypt_cost;
    let user = web::block(move || -> Result<User, ApiError> {
        let new_user = NewUser {
            name: body.name.trim().to_string(),
            email,
            password: password::hash(&body.password, cost)?,
            phone: body.phone,
            gender: body.gender,
            age: body.age,
            planner: body.planner,
            runner: body.runner,
        };
        store.insert_user(&new_user).map_err(|err| match err {
            StoreError::Conflict(_) => {
                ApiError::Conflict("an account with this email already exists".to_string())
            }
            other => other.into(),
        })
    })
    .await??;

    info!(user_id = user.id, "user signed up");
    let session_id = state.sessions.create(user.id);
    Ok(HttpResponse::Created()
        .cookie(session_cookie(session_id))
        .json(json!({ "user": user })))
}

pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<Login>,
) -> Result<HttpResponse, ApiError> {
    let Login { email, password } = body.into_inner();
    let email = normalize_email(&email);

    let store = Arc::clone(&state.store);
    let user = web::block(move || -> Result<Option<User>, StoreError> {
        Ok(store
            .find_user_by_email(&email)?
            .filter(|user| password::verify(&password, &user.password)))
    })
    .await??
    .ok_or_else(|| ApiError::Unauthorized("invalid email or password".to_string()))?;

    info!(user_id = user.id, "user logged in");
    let session_id = state.sessions.create(user.id);
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(session_id))
        .json(json!({ "user": user })))
}

pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        state.sessions.remove(cookie.value());
    }
    HttpResponse::Ok()
        .cookie(expired_cookie())
        .json(json!({ "message": "logged out" }))
}

pub async fn me(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let user = current_user(&req, &state).await?;
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
