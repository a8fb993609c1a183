//! axum 适配器端到端测试

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use rest_registry::models::{RestRequest, RestResponse};
use rest_registry::{
    AxumHost, EndpointConfig, HandlerTable, RegistrationManager, RegistryConfig, SchemaSpec,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn build_router() -> axum::Router {
    let config = RegistryConfig::default();
    let handlers = HandlerTable::new()
        .with_handler("get_item", |req: &RestRequest| {
            RestResponse::ok(json!({ "id": req.param("id").cloned() }))
        })
        .with_permission("admin_only", |req: &RestRequest| {
            req.param("token").and_then(Value::as_str) == Some("secret")
        });

    let mut manager =
        RegistrationManager::with_namespace(&config, "shop/v1", "shop").with_handlers(handlers);
    manager
        .add_endpoint(
            "/items",
            EndpointConfig::new()
                .with_methods("GET")
                .with_callback(|_req: &RestRequest| RestResponse::ok(json!(["a", "b"]))),
        )
        .add_endpoint(
            "/item",
            EndpointConfig::new()
                .with_methods("GET")
                .with_callback_named("get_item")
                .with_arg(
                    "id",
                    SchemaSpec::of_type("integer")
                        .required()
                        .with_range(Some(1.0), None),
                ),
        )
        .add_endpoint(
            "/admin",
            EndpointConfig::new()
                .with_methods("POST, DELETE")
                .with_callback(|_req: &RestRequest| RestResponse::created(json!({ "ok": true })))
                .with_permission_named("admin_only"),
        );

    let mut host = AxumHost::from_config(&config);
    assert_eq!(manager.register_endpoints(&mut host), 3);
    host.into_router()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = build_router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_get_returns_callback_result() {
    let (status, body) = send(get("/shop/v1/items")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["a", "b"]));
}

#[tokio::test]
async fn test_undeclared_method_not_allowed() {
    let request = Request::builder()
        .method("POST")
        .uri("/shop/v1/items")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_permission_denied() {
    let request = Request::builder()
        .method("POST")
        .uri("/shop/v1/admin")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"token":"wrong"}"#))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "rest_forbidden");
}

#[tokio::test]
async fn test_permission_granted_via_body() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/shop/v1/admin")
        .body(Body::from(r#"{"token":"secret"}"#))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn test_missing_required_param() {
    let (status, body) = send(get("/shop/v1/item")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "rest_missing_callback_param");
    assert_eq!(body["data"]["params"], json!(["id"]));
}

#[tokio::test]
async fn test_invalid_param() {
    let (status, body) = send(get("/shop/v1/item?id=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "rest_invalid_param");
    assert_eq!(body["data"]["params"][0]["code"], "rest_out_of_bounds");
    assert_eq!(body["data"]["params"][0]["context"]["field"], "id");
}

#[tokio::test]
async fn test_valid_param_reaches_named_callback() {
    let (status, body) = send(get("/shop/v1/item?id=7")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": "7" }));
}

#[tokio::test]
async fn test_unknown_path_not_found() {
    let (status, _) = send(get("/shop/v2/items")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
