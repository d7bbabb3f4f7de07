use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthCheckResponse {
    status: String,
    database: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let response = HealthCheckResponse {
        status: "ok".to_string(),
        database: state.database.clone(),
    };
    Json(response)
}
