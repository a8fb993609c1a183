//! axum 宿主适配器
//!
//! 收集注册的端点，最终生成 `axum::Router`。
//! 请求处理流程：
//! 1. 查询参数与 JSON 请求体合并为参数表（请求体优先）
//! 2. 补全参数默认值
//! 3. 权限检查，失败返回 403
//! 4. 必填参数检查，缺失返回 400
//! 5. Schema 校验，失败返回 400 并附带错误列表
//! 6. 调用端点回调

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Query,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{on, MethodFilter},
    Json, Router,
};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use super::host::RouteHost;
use crate::config::RegistryConfig;
use crate::models::{EndpointDefinition, MethodSet, RestRequest, RestResponse};
use crate::schema::SchemaValidator;

/// 已注册到宿主的端点
#[derive(Debug, Clone)]
pub struct RegisteredEndpoint {
    pub namespace: String,
    pub route: String,
    pub definition: EndpointDefinition,
}

#[derive(Debug, Clone)]
pub struct AxumHost {
    url_root: String,
    routes: IndexMap<String, RegisteredEndpoint>,
}

impl AxumHost {
    pub fn new(url_root: impl Into<String>) -> Self {
        Self {
            url_root: url_root.into(),
            routes: IndexMap::new(),
        }
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.url_root.clone())
    }

    /// 路由表中的完整路径：`/{namespace}{route}`
    pub fn full_path(namespace: &str, route: &str) -> String {
        format!("/{}{}", namespace.trim_matches('/'), route)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.routes.keys().map(String::as_str).collect()
    }

    pub fn get(&self, path: &str) -> Option<&RegisteredEndpoint> {
        self.routes.get(path)
    }

    /// 生成 axum 路由，每条路径只接受端点声明的方法
    pub fn into_router(self) -> Router {
        let mut router = Router::new();
        for (path, endpoint) in self.routes {
            let Some(filter) = method_filter(endpoint.definition.methods) else {
                continue;
            };
            let endpoint = Arc::new(endpoint);
            let handler = move |method: Method,
                                Query(query): Query<HashMap<String, String>>,
                                body: Bytes| {
                let endpoint = Arc::clone(&endpoint);
                async move { into_axum_response(dispatch(&endpoint, method, query, &body)) }
            };
            router = router.route(&path, on(filter, handler));
        }
        router
    }

    /// 监听地址并提供服务，`shutdown` 完成后优雅退出
    pub async fn serve<S>(self, addr: SocketAddr, shutdown: S) -> std::io::Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let routes = self.len();
        let app = self.into_router();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!("[AxumHost] 服务监听 {}，共 {} 条路由", addr, routes);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

impl RouteHost for AxumHost {
    fn register_route(&mut self, namespace: &str, route: &str, definition: &EndpointDefinition) {
        let path = Self::full_path(namespace, route);
        tracing::info!("[AxumHost] 注册路由: {} {}", definition.methods, path);
        let previous = self.routes.insert(
            path.clone(),
            RegisteredEndpoint {
                namespace: namespace.to_string(),
                route: route.to_string(),
                definition: definition.clone(),
            },
        );
        if previous.is_some() {
            tracing::debug!("[AxumHost] 覆盖已有路由: {}", path);
        }
    }

    fn url_root(&self) -> &str {
        &self.url_root
    }
}

/// 方法集合对应的 axum 过滤器，空集合返回 None
fn method_filter(methods: MethodSet) -> Option<MethodFilter> {
    methods
        .verbs()
        .into_iter()
        .filter_map(|verb| match verb {
            "GET" => Some(MethodFilter::GET),
            "POST" => Some(MethodFilter::POST),
            "PUT" => Some(MethodFilter::PUT),
            "PATCH" => Some(MethodFilter::PATCH),
            "DELETE" => Some(MethodFilter::DELETE),
            _ => None,
        })
        .reduce(MethodFilter::or)
}

/// 处理单个请求，不涉及 I/O
fn dispatch(
    endpoint: &RegisteredEndpoint,
    method: Method,
    query: HashMap<String, String>,
    body: &[u8],
) -> RestResponse {
    let definition = &endpoint.definition;

    let mut params: Map<String, Value> = query
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    let body = if body.is_empty() {
        None
    } else {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("[AxumHost] 请求体解析失败: {} {}", endpoint.route, e);
                return RestResponse::error(400, "rest_invalid_json", "Invalid JSON body passed.");
            }
        }
    };
    if let Some(Value::Object(fields)) = &body {
        params.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    for (name, spec) in &definition.args {
        if let Some(default) = &spec.default {
            params
                .entry(name.clone())
                .or_insert_with(|| default.clone());
        }
    }

    let request = RestRequest {
        method: method.as_str().to_uppercase(),
        route: endpoint.route.clone(),
        params,
        body,
    };

    if !definition.permits(&request) {
        return RestResponse::error(
            403,
            "rest_forbidden",
            "Sorry, you are not allowed to do that.",
        );
    }

    let missing: Vec<&str> = definition
        .args
        .iter()
        .filter(|(name, spec)| spec.is_required() && !request.params.contains_key(*name))
        .map(|(name, _)| name.as_str())
        .collect();
    if !missing.is_empty() {
        let mut response = RestResponse::error(
            400,
            "rest_missing_callback_param",
            &format!("Missing parameter(s): {}", missing.join(", ")),
        );
        response.data["data"]["params"] = json!(missing);
        return response;
    }

    let errors = SchemaValidator::new().validate(&definition.args, &request.params);
    if !errors.is_empty() {
        let mut response = RestResponse::error(
            400,
            "rest_invalid_param",
            &format!("Invalid parameter(s): {}", errors.fields().join(", ")),
        );
        response.data["data"]["params"] = json!(errors);
        return response;
    }

    definition.dispatch(&request)
}

fn into_axum_response(response: RestResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.data)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EndpointConfig;
    use crate::router::{normalize_endpoint, HandlerTable};
    use crate::schema::SchemaSpec;

    fn definition(config: EndpointConfig) -> EndpointDefinition {
        normalize_endpoint("/items", config, &HandlerTable::new()).unwrap()
    }

    fn echo(req: &RestRequest) -> RestResponse {
        RestResponse::ok(Value::Object(req.params.clone()))
    }

    fn endpoint(config: EndpointConfig) -> RegisteredEndpoint {
        RegisteredEndpoint {
            namespace: "shop/v1".to_string(),
            route: "/items".to_string(),
            definition: definition(config),
        }
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_full_path_and_overwrite() {
        let mut host = AxumHost::new("http://localhost:8999");
        let def = definition(EndpointConfig::new().with_methods("GET").with_callback(echo));
        host.register_route("shop/v1", "/items", &def);
        host.register_route("shop/v1", "/items", &def);
        host.register_route("shop/v1", "/orders", &def);

        assert_eq!(host.paths(), vec!["/shop/v1/items", "/shop/v1/orders"]);
        assert_eq!(host.get("/shop/v1/items").unwrap().route, "/items");
        assert_eq!(
            host.build_url("shop/v1", "/items"),
            "http://localhost:8999/shop/v1/items"
        );
    }

    #[test]
    fn test_method_filter() {
        assert!(method_filter(MethodSet::empty()).is_none());
        assert!(method_filter(MethodSet::all()).is_some());
    }

    #[test]
    fn test_dispatch_merges_body_and_defaults() {
        let ep = endpoint(
            EndpointConfig::new()
                .with_methods("POST")
                .with_callback(echo)
                .with_arg("page", SchemaSpec::of_type("integer").with_default(json!(1))),
        );
        let resp = dispatch(
            &ep,
            Method::POST,
            query(&[("q", "shoes"), ("name", "query")]),
            br#"{"name":"body"}"#,
        );
        assert_eq!(resp.status, 200);
        assert_eq!(resp.data, json!({ "q": "shoes", "name": "body", "page": 1 }));
    }

    #[test]
    fn test_dispatch_rejections() {
        let ep = endpoint(
            EndpointConfig::new()
                .with_methods("GET")
                .with_callback(echo)
                .with_arg("id", SchemaSpec::of_type("integer").required()),
        );

        let missing = dispatch(&ep, Method::GET, query(&[]), b"");
        assert_eq!(missing.status, 400);
        assert_eq!(missing.data["code"], "rest_missing_callback_param");
        assert_eq!(missing.data["data"]["params"], json!(["id"]));

        let invalid = dispatch(&ep, Method::GET, query(&[("id", "abc")]), b"");
        assert_eq!(invalid.status, 400);
        assert_eq!(invalid.data["code"], "rest_invalid_param");
        assert_eq!(invalid.data["data"]["params"][0]["code"], "rest_invalid_type");

        let ok = dispatch(&ep, Method::GET, query(&[("id", "42")]), b"");
        assert_eq!(ok.status, 200);

        let bad_json = dispatch(&ep, Method::GET, query(&[("id", "42")]), b"{");
        assert_eq!(bad_json.data["code"], "rest_invalid_json");
    }

    #[test]
    fn test_dispatch_permission_checked_first() {
        let ep = endpoint(
            EndpointConfig::new()
                .with_methods("GET")
                .with_callback(echo)
                .with_permission(|_req: &RestRequest| false)
                .with_arg("id", SchemaSpec::of_type("integer").required()),
        );
        let resp = dispatch(&ep, Method::GET, query(&[]), b"");
        assert_eq!(resp.status, 403);
        assert_eq!(resp.data["code"], "rest_forbidden");
        assert_eq!(resp.data["data"]["status"], 403);
    }
}
