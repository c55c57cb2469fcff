//! HTTP API Contract Tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use compras::api::StatusPolicy;
use compras::http_server::{HttpServer, HttpServerConfig};
use compras::storage::Stores;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

// =============================================================================
// Test Utilities
// =============================================================================

fn app_with_policy(temp_dir: &TempDir, policy: StatusPolicy) -> Router {
    let config = HttpServerConfig {
        status_codes: policy,
        ..HttpServerConfig::default()
    };
    HttpServer::new(Arc::new(Stores::open(temp_dir.path())), config).router()
}

fn app(temp_dir: &TempDir) -> Router {
    app_with_policy(temp_dir, StatusPolicy::Compatible)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Suppliers
// =============================================================================

#[tokio::test]
async fn test_create_and_list_supplier() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let (status, created) = send(
        &app,
        post(
            "/api/fornecedores",
            r#"{"nome":"Acme","cnpj":"123","telefone":"555","email":"a@b.com"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        created,
        json!({"success": true, "message": "Fornecedor criado com sucesso", "id": 1})
    );

    let (status, listed) = send(&app, get("/api/fornecedores")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        listed,
        json!([{"id": "1", "nome": "Acme", "cnpj": "123", "telefone": "555", "email": "a@b.com"}])
    );
}

#[tokio::test]
async fn test_empty_store_lists_empty_array() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let (_, suppliers) = send(&app, get("/api/fornecedores")).await;
    let (_, orders) = send(&app, get("/api/ordens")).await;
    assert_eq!(suppliers, json!([]));
    assert_eq!(orders, json!([]));
}

#[tokio::test]
async fn test_invalid_json_is_reported_in_body() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let (status, body) = send(&app, post("/api/fornecedores", "{nome: Acme")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("JSON inválido"));

    let (_, listed) = send(&app, get("/api/fornecedores")).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_post_without_body_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/fornecedores")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_order_missing_fields_get_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let (_, created) = send(&app, post("/api/ordens", r#"{"fornecedor_id":"3"}"#)).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Ordem de compra criada com sucesso");
    assert_eq!(created["id"], 1);

    let (_, listed) = send(&app, get("/api/ordens")).await;
    let order = &listed[0];
    assert_eq!(order["id"], "1");
    assert_eq!(order["fornecedor_id"], "3");
    assert_eq!(order["valor"].as_f64(), Some(0.0));
    assert_eq!(order["data"], "");
    assert_eq!(order["status"], "Pendente");
    assert_eq!(order["descricao"], "");
}

#[tokio::test]
async fn test_order_value_is_a_number_on_the_wire() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    send(
        &app,
        post(
            "/api/ordens",
            r#"{"fornecedor_id":"1","valor":250.75,"data":"2024-06-10","status":"Aprovada","descricao":"Cabos"}"#,
        ),
    )
    .await;

    let (_, listed) = send(&app, get("/api/ordens")).await;
    assert_eq!(listed[0]["valor"].as_f64(), Some(250.75));
    assert_eq!(listed[0]["status"], "Aprovada");
    assert_eq!(listed[0]["descricao"], "Cabos");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_order_creations_get_distinct_ids() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let first = {
        let app = app.clone();
        tokio::spawn(async move { send(&app, post("/api/ordens", r#"{"fornecedor_id":"1"}"#)).await })
    };
    let second = {
        let app = app.clone();
        tokio::spawn(async move { send(&app, post("/api/ordens", r#"{"fornecedor_id":"2"}"#)).await })
    };

    let (_, a) = first.await.unwrap();
    let (_, b) = second.await.unwrap();
    let mut ids = vec![a["id"].as_u64().unwrap(), b["id"].as_u64().unwrap()];
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);
}

// =============================================================================
// Fixed endpoints
// =============================================================================

#[tokio::test]
async fn test_status_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let (_, body) = send(&app(&temp_dir), get("/api/status")).await;
    assert_eq!(body, json!({"status": "online", "message": "Backend conectado"}));
}

#[tokio::test]
async fn test_stock_and_finance_summaries() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let (_, stock) = send(&app, get("/api/estoque")).await;
    assert_eq!(stock["total_itens"], 42);
    assert_eq!(stock["valor_total"].as_f64(), Some(12500.5));
    assert_eq!(stock["itens_baixo_estoque"], 3);
    assert_eq!(stock["status"], "OK");

    let (_, finance) = send(&app, get("/api/financeiro")).await;
    assert_eq!(finance["contas_pagar"].as_f64(), Some(25000.0));
    assert_eq!(finance["saldo_disponivel"].as_f64(), Some(50000.0));
    assert_eq!(finance["pendencias"], 5);
    assert_eq!(finance["status"], "OK");
}

// =============================================================================
// Unknown routes and CORS
// =============================================================================

#[tokio::test]
async fn test_unknown_get_route() {
    let temp_dir = TempDir::new().unwrap();
    let (status, body) = send(&app(&temp_dir), get("/api/unknown")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"error": "Endpoint não encontrado", "path": "/api/unknown"})
    );
}

#[tokio::test]
async fn test_unknown_post_route_omits_path() {
    let temp_dir = TempDir::new().unwrap();
    let (status, body) = send(&app(&temp_dir), post("/api/outra", "{}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": "Endpoint não encontrado"}));
}

#[tokio::test]
async fn test_query_string_is_ignored_for_routing() {
    let temp_dir = TempDir::new().unwrap();
    let (_, body) = send(&app(&temp_dir), get("/api/status?verbose=1")).await;
    assert_eq!(body["status"], "online");
}

#[tokio::test]
async fn test_every_response_carries_cors_headers() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    for request in [get("/api/status"), get("/nada"), post("/api/ordens", "x")] {
        let response = app.clone().oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, OPTIONS"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }
}

#[tokio::test]
async fn test_preflight_on_any_path() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/qualquer")
        .header(header::ORIGIN, "http://localhost:5500")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

// =============================================================================
// Conventional status codes
// =============================================================================

#[tokio::test]
async fn test_conventional_policy_changes_status_not_body() {
    let temp_dir = TempDir::new().unwrap();
    let app = app_with_policy(&temp_dir, StatusPolicy::Conventional);

    let (status, body) = send(&app, get("/api/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], "/api/unknown");

    let (status, body) = send(&app, post("/api/fornecedores", "[]")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, post("/api/fornecedores", r#"{"nome":"Acme"}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);

    let (status, _) = send(&app, get("/api/fornecedores")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_storage_failure_keeps_listener_serving() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir(temp_dir.path().join("fornecedores.txt")).unwrap();
    let app = app(&temp_dir);

    let (status, body) = send(&app, get("/api/fornecedores")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].as_str().unwrap().contains("fornecedores.txt"));

    let (_, body) = send(&app, post("/api/fornecedores", r#"{"nome":"A"}"#)).await;
    assert_eq!(body["success"], false);

    let (_, body) = send(&app, get("/api/status")).await;
    assert_eq!(body["status"], "online");
}

#[tokio::test]
async fn test_exhausted_ids_fail_create_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fornecedores.txt");
    let original = format!("{}|A|1|2|3\n", u64::MAX);
    std::fs::write(&path, &original).unwrap();
    let app = app_with_policy(&temp_dir, StatusPolicy::Conventional);

    let (status, body) = send(&app, post("/api/fornecedores", r#"{"nome":"B"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("fornecedores.txt"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);

    let (_, listed) = send(&app, get("/api/fornecedores")).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}
