//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::run_health_checks;
use mongodb::Database;
use serde_json::Value;

async fn ready(State(db): State<Database>) -> (StatusCode, Json<Value>) {
    run_health_checks(vec![(
        "mongodb",
        Box::pin(async move {
            database::mongodb::check_health(&db)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string())
        }),
    )])
    .await
}

/// `GET /ready` pings MongoDB. Liveness comes from `health_router`.
pub fn router(db: Database) -> Router {
    Router::new().route("/ready", get(ready)).with_state(db)
}
