//! Integration tests for the catalog API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog::{CatalogService, CatalogStore, InMemoryAccountsService};
use catalog_api::routes::AppState;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup(charge_on_assign: bool) -> (axum::Router, InMemoryAccountsService) {
    let accounts = InMemoryAccountsService::seeded();
    let service = CatalogService::new(CatalogStore::new(), accounts.clone(), charge_on_assign);
    let state = Arc::new(AppState { service });
    let app = catalog_api::create_app(state, get_metrics_handle());
    (app, accounts)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup(false);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "catalog-api");
}

#[tokio::test]
async fn test_create_product() {
    let (app, _) = setup(false);

    let response = app
        .oneshot(post_json(
            "/products",
            serde_json::json!({"name": "Pro plan", "price": 49}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["product"]["id"], "p1");
    assert_eq!(json["product"]["name"], "Pro plan");
    assert_eq!(json["product"]["price"].as_f64(), Some(49.0));
    assert_eq!(json["product"]["category"], "general");
}

#[tokio::test]
async fn test_product_ids_are_never_reused() {
    let (app, _) = setup(false);

    for expected in ["p1", "p2", "p3"] {
        let response = app
            .clone()
            .oneshot(post_json("/products", serde_json::json!({"name": "Widget"})))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["product"]["id"], expected);
    }
}

#[tokio::test]
async fn test_create_product_missing_name_stores_nothing() {
    let (app, _) = setup(false);

    let response = app
        .clone()
        .oneshot(post_json("/products", serde_json::json!({"price": 10})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().is_some());

    let response = app.oneshot(get("/products/all")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["products"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_product_rejects_non_numeric_price() {
    let (app, _) = setup(false);

    let response = app
        .oneshot(post_json(
            "/products",
            serde_json::json!({"name": "Pro plan", "price": "49"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_product_by_id() {
    let (app, _) = setup(false);

    app.clone()
        .oneshot(post_json(
            "/products",
            serde_json::json!({"name": "Pro plan", "price": 49}),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/products/p1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["product"]["name"], "Pro plan");
}

#[tokio::test]
async fn test_get_unknown_product_is_not_found() {
    let (app, _) = setup(false);

    let response = app.oneshot(get("/products/p404")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("p404"));
}

#[tokio::test]
async fn test_list_products_category_filter() {
    let (app, _) = setup(false);

    for (name, category) in [
        ("Hammer", "tools"),
        ("Pro plan", "general"),
        ("Wrench", "tools"),
    ] {
        app.clone()
            .oneshot(post_json(
                "/products",
                serde_json::json!({"name": name, "category": category}),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(get("/products?category=tools"))
        .await
        .unwrap();
    let json = body_json(response).await;
    let names: Vec<&str> = json["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Hammer", "Wrench"]);

    // filter is case-sensitive
    let response = app
        .clone()
        .oneshot(get("/products?category=Tools"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["products"].as_array().unwrap().len(), 0);

    let response = app.oneshot(get("/products/all")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["products"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_assign_unknown_product_is_not_found() {
    let (app, accounts) = setup(false);

    let response = app
        .oneshot(post_json(
            "/products/p404/assign",
            serde_json::json!({"accountId": "acc_123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(accounts.credit_calls().is_empty());
}

#[tokio::test]
async fn test_assign_missing_account_id_is_bad_request() {
    let (app, _) = setup(false);

    app.clone()
        .oneshot(post_json("/products", serde_json::json!({"name": "Pro plan"})))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json("/products/p1/assign", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_assign_unknown_account_stores_nothing() {
    let (app, _) = setup(false);

    app.clone()
        .oneshot(post_json("/products", serde_json::json!({"name": "Pro plan"})))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/products/p1/assign",
            serde_json::json!({"accountId": "acc_nope"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get("/assignments?accountId=acc_nope"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["assignments"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_assign_without_charging() {
    let (app, accounts) = setup(false);

    app.clone()
        .oneshot(post_json(
            "/products",
            serde_json::json!({"name": "Pro plan", "price": 49}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json(
            "/products/p1/assign",
            serde_json::json!({"accountId": "acc_123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["assignment"]["id"], "a1");
    assert_eq!(json["assignment"]["accountId"], "acc_123");
    assert_eq!(json["assignment"]["productId"], "p1");
    assert!(json["assignment"]["createdAt"].as_str().is_some());
    assert!(json.get("charge").is_none());
    assert!(accounts.credit_calls().is_empty());
}

#[tokio::test]
async fn test_assign_with_charging_debits_the_price() {
    let (app, accounts) = setup(true);

    app.clone()
        .oneshot(post_json(
            "/products",
            serde_json::json!({"name": "Pro plan", "price": 49}),
        ))
        .await
        .unwrap();

    // acc_123 starts with a balance of 200
    let response = app
        .oneshot(post_json(
            "/products/p1/assign",
            serde_json::json!({"accountId": "acc_123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["charge"]["balance"].as_f64(), Some(151.0));
    assert_eq!(json["charge"]["currency"], "USD");
    assert_eq!(accounts.credit_calls(), vec![("acc_123".to_string(), -49.0)]);
}

#[tokio::test]
async fn test_failed_charge_keeps_the_assignment() {
    let (app, accounts) = setup(true);

    app.clone()
        .oneshot(post_json(
            "/products",
            serde_json::json!({"name": "Enterprise plan", "price": 100}),
        ))
        .await
        .unwrap();

    // acc_789 holds 50, the debit of 100 is rejected
    let response = app
        .clone()
        .oneshot(post_json(
            "/products/p1/assign",
            serde_json::json!({"accountId": "acc_789"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Insufficient balance");
    assert_eq!(accounts.balance_of("acc_789"), Some(50.0));

    // no rollback: the assignment is still listed
    let response = app
        .oneshot(get("/assignments?accountId=acc_789"))
        .await
        .unwrap();
    let json = body_json(response).await;
    let assignments = json["assignments"].as_array().unwrap();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0]["productId"], "p1");
}

#[tokio::test]
async fn test_list_assignments_requires_account_id() {
    let (app, _) = setup(false);

    let response = app.oneshot(get("/assignments")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_assignments_preserves_insertion_order() {
    let (app, _) = setup(false);

    for name in ["One", "Two"] {
        app.clone()
            .oneshot(post_json("/products", serde_json::json!({"name": name})))
            .await
            .unwrap();
    }
    for product in ["p1", "p2"] {
        app.clone()
            .oneshot(post_json(
                format!("/products/{product}/assign").as_str(),
                serde_json::json!({"accountId": "acc_456"}),
            ))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(get("/assignments?accountId=acc_456"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let products: Vec<&str> = json["assignments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["productId"].as_str().unwrap())
        .collect();
    assert_eq!(products, ["p1", "p2"]);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = setup(false);

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
