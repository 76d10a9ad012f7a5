//! Thin axum routing over the two execution modes. Mode selection happens
//! here, by route prefix; everything below the handlers is shared.

pub mod comparison;
pub mod expenses;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::comparison::ComparisonHarness;
use crate::application::service::ExpenseService;
use crate::error::ExpenseError;

/// Both modes map the same logical error to the same status code.
impl IntoResponse for ExpenseError {
    fn into_response(self) -> Response {
        let status = match &self {
            ExpenseError::Validation(_) | ExpenseError::InvalidPaymentMethod(_) => {
                StatusCode::BAD_REQUEST
            }
            ExpenseError::NotFound(_) => StatusCode::NOT_FOUND,
            ExpenseError::Enrichment(_)
            | ExpenseError::Notification(_)
            | ExpenseError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(
    pipeline: Arc<ExpenseService>,
    blocking: Arc<ExpenseService>,
    harness: Arc<ComparisonHarness>,
) -> Router {
    Router::new()
        .nest("/api/pipeline", expenses::routes().with_state(pipeline))
        .nest("/api/blocking", expenses::routes().with_state(blocking))
        .nest("/api/comparison", comparison::routes().with_state(harness))
}
