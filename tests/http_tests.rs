mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use expense_bench::application::comparison::ComparisonHarness;
use expense_bench::interfaces::http;

async fn app() -> (Router, common::Fixture) {
    let fx = common::fixture().await;
    let harness = Arc::new(ComparisonHarness::new(
        Arc::clone(&fx.pipeline),
        Arc::clone(&fx.blocking),
        Arc::clone(&fx.stores.users),
        Arc::clone(&fx.stores.categories),
    ));
    let router = http::router(Arc::clone(&fx.pipeline), Arc::clone(&fx.blocking), harness);
    (router, fx)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn create_expense_returns_201_with_enriched_body() {
    let (app, fx) = app().await;
    let user = common::seeded_user(&fx.stores, "juan.perez").await;
    let category_id = common::seeded_category_id(&fx.stores, "Salud").await;

    let response = app
        .oneshot(post_json(
            "/api/pipeline/expenses",
            json!({
                "userId": user.id,
                "categoryId": category_id,
                "amount": "75.25",
                "description": "consulta médica",
                "paymentMethod": "DEBIT_CARD",
                "date": "2024-02-01",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let value = body_json(response).await;
    assert_eq!(value["userName"], "Juan Pérez");
    assert_eq!(value["categoryName"], "Salud");
    assert_eq!(value["amount"], "75.25");
    assert_eq!(value["paymentMethod"], "DEBIT_CARD");
    assert_eq!(value["status"], "PENDING");
}

#[tokio::test]
async fn overlimit_amount_is_400_on_both_surfaces() {
    let (app, fx) = app().await;
    let user = common::seeded_user(&fx.stores, "maria.garcia").await;
    let category_id = common::seeded_category_id(&fx.stores, "Servicios").await;

    for prefix in ["pipeline", "blocking"] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/{prefix}/expenses"),
                json!({
                    "userId": user.id,
                    "categoryId": category_id,
                    "amount": "10000.01",
                    "description": "demasiado caro",
                    "paymentMethod": "CASH",
                    "date": "2024-02-01",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let value = body_json(response).await;
        assert!(value["error"].as_str().unwrap().contains("validation"));
    }
}

#[tokio::test]
async fn unknown_payment_method_is_400() {
    let (app, _fx) = app().await;

    let response = app
        .oneshot(get("/api/blocking/expenses/payment-method/BITCOIN"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_expense_is_404() {
    let (app, _fx) = app().await;

    let response = app
        .oneshot(get("/api/pipeline/expenses/does-not-exist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_endpoints_agree_across_surfaces() {
    let (app, _fx) = app().await;

    let pipeline = body_json(
        app.clone()
            .oneshot(get("/api/pipeline/expenses"))
            .await
            .unwrap(),
    )
    .await;
    let blocking = body_json(
        app.clone()
            .oneshot(get("/api/blocking/expenses"))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(pipeline.as_array().unwrap().len(), 3);
    assert_eq!(blocking.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn total_endpoint_returns_user_sum() {
    let (app, fx) = app().await;
    let juan = common::seeded_user(&fx.stores, "juan.perez").await;

    let response = app
        .oneshot(get(&format!("/api/pipeline/expenses/user/{}/total", juan.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 45.50 + 25.00 from the seed data.
    let value = body_json(response).await;
    assert_eq!(value, json!("70.50"));
}

#[tokio::test]
async fn count_endpoint_returns_integer() {
    let (app, _fx) = app().await;

    let response = app
        .oneshot(get("/api/blocking/expenses/payment-method/CASH/count"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!(1));
}

#[tokio::test]
async fn health_endpoints_respond() {
    let (app, _fx) = app().await;

    for uri in [
        "/api/pipeline/health",
        "/api/blocking/health",
        "/api/comparison/health",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn users_and_categories_are_listable() {
    let (app, _fx) = app().await;

    let users = body_json(app.clone().oneshot(get("/api/pipeline/users")).await.unwrap()).await;
    assert_eq!(users.as_array().unwrap().len(), 3);

    let categories = body_json(
        app.clone()
            .oneshot(get("/api/blocking/categories"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(categories.as_array().unwrap().len(), 5);
}
