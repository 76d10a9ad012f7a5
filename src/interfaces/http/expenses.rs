use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use std::str::FromStr;
use std::sync::Arc;

use crate::application::service::ExpenseService;
use crate::domain::expense::{CreateExpenseRequest, PaymentMethod};
use crate::error::ExpenseError;

type Service = Arc<ExpenseService>;

pub fn routes() -> Router<Service> {
    Router::new()
        .route("/expenses", post(create_expense).get(list_expenses))
        .route("/expenses/:id", get(get_expense))
        .route("/expenses/user/:user_id", get(list_by_user))
        .route("/expenses/user/:user_id/total", get(total_by_user))
        .route("/expenses/payment-method/:method", get(list_by_payment_method))
        .route(
            "/expenses/payment-method/:method/count",
            get(count_by_payment_method),
        )
        .route("/users", get(list_users))
        .route("/categories", get(list_categories))
        .route("/health", get(health))
}

async fn create_expense(
    State(svc): State<Service>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<impl IntoResponse, ExpenseError> {
    let response = svc.create_expense(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_expenses(State(svc): State<Service>) -> Result<impl IntoResponse, ExpenseError> {
    Ok(Json(svc.list_all().await?))
}

async fn get_expense(
    State(svc): State<Service>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ExpenseError> {
    Ok(Json(svc.get_expense_by_id(&id).await?))
}

async fn list_by_user(
    State(svc): State<Service>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ExpenseError> {
    Ok(Json(svc.list_by_user(&user_id).await?))
}

async fn total_by_user(
    State(svc): State<Service>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ExpenseError> {
    Ok(Json(svc.total_by_user(&user_id).await?))
}

async fn list_by_payment_method(
    State(svc): State<Service>,
    Path(method): Path<String>,
) -> Result<impl IntoResponse, ExpenseError> {
    let method = PaymentMethod::from_str(&method)?;
    Ok(Json(svc.list_by_payment_method(method).await?))
}

async fn count_by_payment_method(
    State(svc): State<Service>,
    Path(method): Path<String>,
) -> Result<impl IntoResponse, ExpenseError> {
    let method = PaymentMethod::from_str(&method)?;
    Ok(Json(svc.count_by_payment_method(method).await?))
}

async fn list_users(State(svc): State<Service>) -> Result<impl IntoResponse, ExpenseError> {
    Ok(Json(svc.list_users().await?))
}

async fn list_categories(State(svc): State<Service>) -> Result<impl IntoResponse, ExpenseError> {
    Ok(Json(svc.list_categories().await?))
}

async fn health(State(svc): State<Service>) -> String {
    format!("{} expense service is running", svc.mode())
}
