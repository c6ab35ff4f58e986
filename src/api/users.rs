use std::collections::BTreeMap;
use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde_json::json;

use super::AppState;
use crate::error::ApiError;

pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = Arc::clone(&state.store);
    let users = web::block(move || store.list_users()).await??;

    let users: BTreeMap<i64, _> = users.into_iter().map(|u| (u.id, u)).collect();
    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let store = Arc::clone(&state.store);
    let user = web::block(move || store.find_user(id))
        .await??
        .ok_or(ApiError::NotFound("user"))?;

    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
