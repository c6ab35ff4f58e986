use std::collections::BTreeMap;
use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{current_user, today, AppState};
use crate::error::ApiError;
use crate::models::{NewRun, RunView, RunnerRunView};

#[derive(Debug, Deserialize)]
pub struct CreateRun {
    pub name: String,
    #[serde(default)]
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
}

impl CreateRun {
    fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::BadRequest("run name is required".to_string()));
        }
        if !(self.distance > 0.0) {
            return Err(ApiError::BadRequest("distance must be positive".to_string()));
        }
        for &(lat, lon) in &[(self.latitude, self.longitude), (self.latitude_to, self.longitude_to)] {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(ApiError::BadRequest(format!(
                    "coordinates out of range: {}, {}",
                    lat, lon
                )));
            }
        }
        Ok(())
    }

    fn into_new_run(self, planner_id: i64) -> NewRun {
        NewRun {
            name: self.name.trim().to_string(),
            description: self.description,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            location_to: self.location_to,
            latitude_to: self.latitude_to,
            longitude_to: self.longitude_to,
            distance: self.distance,
            date: self.date,
            time: self.time,
            planner_id,
        }
    }
}

pub async fn list_runs(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = Arc::clone(&state.store);
    let runs = web::block(move || store.list_runs()).await??;

    let today = today();
    let runs: BTreeMap<i64, RunView> = runs.iter().map(|r| (r.id, r.view(today))).collect();
    Ok(HttpResponse::Ok().json(json!({ "runs": runs })))
}

pub async fn get_run(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let store = Arc::clone(&state.store);
    let run = web::block(move || store.find_run(id))
        .await??
        .ok_or(ApiError::NotFound("run"))?;

    Ok(HttpResponse::Ok().json(json!({ "run": run.view(today()) })))
}

/// Only planners may create runs; the run is owned by the session user.
pub async fn create_run(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<CreateRun>,
) -> Result<HttpResponse, ApiError> {
    let planner = current_user(&req, &state).await?;
    if !planner.planner {
        return Err(ApiError::Forbidden("only planners can create runs".to_string()));
    }

    let body = body.into_inner();
    body.validate()?;
    let new_run = body.into_new_run(planner.id);

    let store = Arc::clone(&state.store);
    let run = web::block(move || store.insert_run(&new_run)).await??;
    info!(run_id = run.id, planner_id = planner.id, "run created");

    Ok(HttpResponse::Created().json(json!({ "run": run.view(today()) })))
}

pub async fn planner_runs(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let planner_id = path.into_inner();
    let store = Arc::clone(&state.store);
    let runs = web::block(move || store.runs_for_planner(planner_id)).await??;

    let today = today();
    let runs: BTreeMap<i64, RunView> = runs.iter().map(|r| (r.id, r.view(today))).collect();
    Ok(HttpResponse::Ok().json(json!({ "planner_runs": runs })))
}

pub async fn runner_runs(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let runner_id = path.into_inner();
    let store = Arc::clone(&state.store);
    let joined = web::block(move || store.runs_for_runner(runner_id)).await??;

    let today = today();
    let runs: BTreeMap<i64, RunnerRunView> = joined
        .iter()
        .map(|(run, registration)| {
            let view = RunnerRunView {
                run: run.view(today),
                time: registration.time,
                rating: registration.rating,
            };
            (run.id, view)
        })
        .collect();
    Ok(HttpResponse::Ok().json(json!({ "runner_runs": runs })))
}
