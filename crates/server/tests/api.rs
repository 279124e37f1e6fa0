use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::ServerOptions;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::router(engine, ServerOptions::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create(app: &Router, amount: Value, category: &str, description: &str, date: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/expenses",
        Some(json!({
            "amount": amount,
            "category": category,
            "description": description,
            "date": date,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn create_returns_201_and_is_listed_once() {
    let app = app().await;

    let created = create(&app, json!(1000), "Food", "Lunch", "2026-03-04").await;
    assert_eq!(created["amount"], 1000.0);
    assert_eq!(created["category"], "Food");
    assert_eq!(created["description"], "Lunch");
    assert!(created["id"].is_string());

    let (status, list) = send(&app, "GET", "/expenses", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], created["id"]);
    assert_eq!(list[0]["description"], "Lunch");
}

#[tokio::test]
async fn form_style_string_amounts_are_accepted() {
    let app = app().await;
    let created = create(&app, json!("42.5"), "Bills", "Phone", "2026-03-04").await;
    assert_eq!(created["amount"], 42.5);
}

#[tokio::test]
async fn invalid_bodies_are_400_with_field() {
    let app = app().await;

    let cases = [
        (json!({"amount": -1, "category": "Food", "description": "x"}), "amount"),
        (json!({"amount": 1e300, "category": "Food", "description": "x"}), "amount"),
        (json!({"amount": "abc", "category": "Food", "description": "x"}), "amount"),
        (json!({"amount": 1, "category": "Groceries", "description": "x"}), "category"),
        (json!({"amount": 1, "category": "Food", "description": "   "}), "description"),
        (json!({"category": "Food", "description": "x"}), "amount"),
        (json!({"amount": 1, "category": "Food", "description": "x", "date": "soon"}), "date"),
    ];

    for (body, field) in cases {
        let (status, error) = send(&app, "POST", "/expenses", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["error"].as_str().unwrap().contains(field), "{error}");
    }

    let (_, list) = send(&app, "GET", "/expenses", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_by_category_and_unknown_category() {
    let app = app().await;
    create(&app, json!(10), "Food", "Pizza", "2026-03-01").await;
    create(&app, json!(20), "Travel", "Bus", "2026-03-02").await;

    let (status, food) = send(&app, "GET", "/expenses/category/Food", None).await;
    assert_eq!(status, StatusCode::OK);
    let food = food.as_array().unwrap();
    assert_eq!(food.len(), 1);
    assert_eq!(food[0]["description"], "Pizza");

    let (status, _) = send(&app, "GET", "/expenses/category/Groceries", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn date_range_filters_and_validates() {
    let app = app().await;
    create(&app, json!(1), "Other", "early", "2026-01-15").await;
    create(&app, json!(1), "Other", "inside", "2026-02-10").await;
    create(&app, json!(1), "Other", "edge", "2026-02-28").await;
    create(&app, json!(1), "Other", "late", "2026-03-01").await;

    let (status, found) = send(
        &app,
        "GET",
        "/expenses/date-range?startDate=2026-02-01&endDate=2026-02-28",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let descriptions: Vec<_> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["description"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(descriptions, ["edge", "inside"]);

    let (status, _) = send(
        &app,
        "GET",
        "/expenses/date-range?startDate=2026-03-01&endDate=2026-02-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, error) = send(&app, "GET", "/expenses/date-range?startDate=2026-03-01", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap().contains("endDate"));
}

#[tokio::test]
async fn update_is_partial_and_validated() {
    let app = app().await;
    let created = create(&app, json!(10), "Food", "Lunch", "2026-03-04").await;
    let uri = format!("/expenses/{}", created["id"].as_str().unwrap());

    let (status, updated) = send(&app, "PUT", &uri, Some(json!({"amount": 15}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amount"], 15.0);
    assert_eq!(updated["category"], "Food");
    assert_eq!(updated["description"], "Lunch");

    let (status, _) = send(&app, "PUT", &uri, Some(json!({"category": "Snacks"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_and_delete_of_missing_id_are_404() {
    let app = app().await;
    let uri = format!("/expenses/{}", uuid::Uuid::new_v4());

    let (status, error) = send(&app, "PUT", &uri, Some(json!({"amount": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "Expense not found");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_are_404() {
    let app = app().await;

    let (status, error) = send(&app, "PUT", "/expenses/not-a-uuid", Some(json!({"amount": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "Expense not found");

    let (status, error) = send(&app, "DELETE", "/expenses/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "Expense not found");
}

async fn post_raw(app: &Router, uri: &str, body: &str) -> (StatusCode, Option<String>, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn undecodable_bodies_are_400_json_errors() {
    let app = app().await;

    let bodies = [
        r#"{"amount": 1, "category": "Food", "description": 5}"#,
        r#"{"amount": true, "category": "Food", "description": "x"}"#,
        r#"{not json"#,
    ];

    for body in bodies {
        let (status, content_type, error) = post_raw(&app, "/expenses", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(content_type.as_deref(), Some("application/json"), "{body}");
        assert!(error["error"].is_string(), "{body}: {error}");
    }

    let created = create(&app, json!(10), "Food", "Lunch", "2026-03-04").await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/expenses/{}", created["id"].as_str().unwrap()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"description": 5}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, list) = send(&app, "GET", "/expenses", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["description"], "Lunch");
}

#[tokio::test]
async fn delete_removes_the_expense() {
    let app = app().await;
    let created = create(&app, json!(10), "Food", "Lunch", "2026-03-04").await;
    let uri = format!("/expenses/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Expense deleted successfully");

    let (_, list) = send(&app, "GET", "/expenses", None).await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn summary_groups_by_category() {
    let app = app().await;
    create(&app, json!(100), "Food", "a", "2026-03-01").await;
    create(&app, json!(50), "Food", "b", "2026-03-02").await;
    create(&app, json!(200), "Travel", "c", "2026-03-03").await;

    let (status, summary) = send(&app, "GET", "/expenses/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    let summary = summary.as_array().unwrap();
    assert_eq!(summary.len(), 2);
    let total_of = |category: &str| {
        summary
            .iter()
            .find(|row| row["category"] == category)
            .map(|row| row["total"].as_f64().unwrap())
    };
    assert_eq!(total_of("Food"), Some(150.0));
    assert_eq!(total_of("Travel"), Some(200.0));
}

#[tokio::test]
async fn stats_report_dashboard_figures() {
    let app = app().await;
    create(&app, json!(100), "Food", "a", "2026-03-01").await;
    create(&app, json!(50), "Food", "b", "2026-03-20").await;
    create(&app, json!(200), "Travel", "c", "2026-02-10").await;

    let (status, stats) = send(&app, "GET", "/expenses/stats?month=2026-03-15", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 350.0);
    assert_eq!(stats["count"], 3);
    assert_eq!(stats["month"]["total"], 150.0);
    assert_eq!(stats["month"]["count"], 2);

    let breakdown = stats["breakdown"].as_array().unwrap();
    let percentage_of = |category: &str| {
        breakdown
            .iter()
            .find(|row| row["category"] == category)
            .map(|row| row["percentage"].as_f64().unwrap())
    };
    assert_eq!(percentage_of("Food"), Some(42.9));
    assert_eq!(percentage_of("Travel"), Some(57.1));
}

#[tokio::test]
async fn stats_of_empty_store_are_zero() {
    let app = app().await;

    let (status, stats) = send(&app, "GET", "/expenses/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 0.0);
    assert_eq!(stats["average"], 0.0);
    assert_eq!(stats["month"]["count"], 0);
    assert!(stats["breakdown"].as_array().unwrap().is_empty());

    let (_, summary) = send(&app, "GET", "/expenses/summary", None).await;
    assert!(summary.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn health_reports_connected_database() {
    let app = app().await;

    let (status, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["database"]["status"], "connected");
    assert!(health["uptimeSeconds"].is_u64());
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let app = app().await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/expenses")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}
