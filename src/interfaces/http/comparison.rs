use axum::Router;
use axum::extract::{Query, State};
use axum::routing::get;
use serde::Deserialize;
use std::sync::Arc;

use crate::application::comparison::{ComparisonHarness, DEFAULT_STRESS_REQUESTS};

type Harness = Arc<ComparisonHarness>;

pub fn routes() -> Router<Harness> {
    Router::new()
        .route("/performance-test", get(performance_test))
        .route("/stress-test", get(stress_test))
        .route("/health", get(health))
}

async fn performance_test(State(harness): State<Harness>) -> String {
    harness.performance_report().await
}

#[derive(Deserialize)]
struct StressParams {
    requests: Option<usize>,
}

async fn stress_test(State(harness): State<Harness>, Query(params): Query<StressParams>) -> String {
    harness
        .stress_report(params.requests.unwrap_or(DEFAULT_STRESS_REQUESTS))
        .await
}

async fn health() -> &'static str {
    "comparison service is running"
}
