//! 端点请求与响应模型
//!
//! 回调与权限检查看到的是与宿主框架无关的 `RestRequest`，
//! 返回 `RestResponse`，由宿主适配层负责转换为实际的 HTTP 响应。

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// 传递给回调的请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestRequest {
    /// HTTP 方法（大写）
    pub method: String,
    /// 命中的路由（不含命名空间）
    pub route: String,
    /// 合并后的参数（查询参数 + JSON 请求体字段）
    pub params: Map<String, Value>,
    /// 原始 JSON 请求体
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RestRequest {
    pub fn new(method: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            route: route.into(),
            params: Map::new(),
            body: None,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// 读取单个参数
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }
}

/// 回调返回的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestResponse {
    pub status: u16,
    pub data: Value,
}

impl RestResponse {
    pub fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    /// 200 响应
    pub fn ok(data: Value) -> Self {
        Self::new(200, data)
    }

    /// 201 响应
    pub fn created(data: Value) -> Self {
        Self::new(201, data)
    }

    /// 错误响应，body 为 `{code, message, data: {status}}`
    pub fn error(status: u16, code: &str, message: &str) -> Self {
        Self::new(
            status,
            json!({
                "code": code,
                "message": message,
                "data": { "status": status },
            }),
        )
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = RestRequest::new("get", "/items").with_param("id", 3);
        assert_eq!(req.method, "GET");
        assert_eq!(req.param("id"), Some(&json!(3)));
        assert!(req.param("missing").is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let resp = RestResponse::error(403, "rest_forbidden", "nope");
        assert!(!resp.is_success());
        assert_eq!(resp.data["code"], "rest_forbidden");
        assert_eq!(resp.data["data"]["status"], 403);
    }
}
