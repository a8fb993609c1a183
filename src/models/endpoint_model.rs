//! 端点配置数据模型
//!
//! `EndpointConfig` 是调用方提交的原始配置，字段均可缺省；
//! 经过规范化后得到 `EndpointDefinition`，所有字段都已就绪。
//! `EndpointManifest` 是可从 JSON / YAML 反序列化的配置形式，回调以名称引用。

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::method_model::MethodSet;
use super::request_model::{RestRequest, RestResponse};
use crate::schema::{SchemaMap, SchemaSpec};

/// 端点处理函数签名
pub type HandlerFn = dyn Fn(&RestRequest) -> RestResponse + Send + Sync;
/// 权限检查函数签名
pub type PermissionFn = dyn Fn(&RestRequest) -> bool + Send + Sync;
/// Schema 生成函数签名
pub type SchemaProducerFn = dyn Fn() -> Value + Send + Sync;

pub type Handler = Arc<HandlerFn>;
pub type PermissionCheck = Arc<PermissionFn>;
pub type SchemaProducer = Arc<SchemaProducerFn>;

/// 可调用引用：直接给出的函数，或按名称在处理器表中查找
pub enum Invocable<F: ?Sized> {
    Direct(Arc<F>),
    Named(String),
}

impl<F: ?Sized> Clone for Invocable<F> {
    fn clone(&self) -> Self {
        match self {
            Self::Direct(f) => Self::Direct(Arc::clone(f)),
            Self::Named(name) => Self::Named(name.clone()),
        }
    }
}

impl<F: ?Sized> std::fmt::Debug for Invocable<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct(_) => write!(f, "Direct(<fn>)"),
            Self::Named(name) => write!(f, "Named({name:?})"),
        }
    }
}

/// `methods` 字段：原始字符串或已解析的集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodsField {
    Raw(String),
    Parsed(MethodSet),
}

impl MethodsField {
    /// 解析为方法集合，已解析的集合原样返回
    pub fn resolve(&self) -> MethodSet {
        match self {
            Self::Raw(raw) => MethodSet::parse(raw),
            Self::Parsed(set) => *set,
        }
    }
}

impl From<&str> for MethodsField {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for MethodsField {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<MethodSet> for MethodsField {
    fn from(set: MethodSet) -> Self {
        Self::Parsed(set)
    }
}

/// `schema` 字段：静态结构，或在规范化时调用一次的生成函数
#[derive(Clone)]
pub enum SchemaSource {
    Literal(Value),
    Producer(SchemaProducer),
}

impl SchemaSource {
    pub fn resolve(self) -> Value {
        match self {
            Self::Literal(value) => value,
            Self::Producer(producer) => producer(),
        }
    }
}

impl std::fmt::Debug for SchemaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Producer(_) => write!(f, "Producer(<fn>)"),
        }
    }
}

/// 原始端点配置
#[derive(Debug, Clone, Default)]
pub struct EndpointConfig {
    pub methods: Option<MethodsField>,
    pub callback: Option<Invocable<HandlerFn>>,
    pub permission_callback: Option<Invocable<PermissionFn>>,
    pub args: Option<SchemaMap>,
    pub schema: Option<SchemaSource>,
}

impl EndpointConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_methods(mut self, methods: impl Into<MethodsField>) -> Self {
        self.methods = Some(methods.into());
        self
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&RestRequest) -> RestResponse + Send + Sync + 'static,
    {
        let callback: Handler = Arc::new(callback);
        self.callback = Some(Invocable::Direct(callback));
        self
    }

    /// 按名称引用处理器表中的回调
    pub fn with_callback_named(mut self, name: impl Into<String>) -> Self {
        self.callback = Some(Invocable::Named(name.into()));
        self
    }

    pub fn with_permission<F>(mut self, check: F) -> Self
    where
        F: Fn(&RestRequest) -> bool + Send + Sync + 'static,
    {
        let check: PermissionCheck = Arc::new(check);
        self.permission_callback = Some(Invocable::Direct(check));
        self
    }

    pub fn with_permission_named(mut self, name: impl Into<String>) -> Self {
        self.permission_callback = Some(Invocable::Named(name.into()));
        self
    }

    /// 追加单个参数定义
    pub fn with_arg(mut self, name: impl Into<String>, spec: SchemaSpec) -> Self {
        self.args
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), spec);
        self
    }

    pub fn with_args(mut self, args: SchemaMap) -> Self {
        self.args = Some(args);
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(SchemaSource::Literal(schema));
        self
    }

    pub fn with_schema_producer<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.schema = Some(SchemaSource::Producer(Arc::new(producer)));
        self
    }
}

/// 规范化后的端点定义
#[derive(Clone)]
pub struct EndpointDefinition {
    pub methods: MethodSet,
    pub callback: Handler,
    pub permission_callback: PermissionCheck,
    pub args: SchemaMap,
    pub schema: Option<Value>,
}

impl EndpointDefinition {
    /// 执行权限检查
    pub fn permits(&self, request: &RestRequest) -> bool {
        (self.permission_callback)(request)
    }

    /// 调用端点回调
    pub fn dispatch(&self, request: &RestRequest) -> RestResponse {
        (self.callback)(request)
    }
}

impl std::fmt::Debug for EndpointDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointDefinition")
            .field("methods", &self.methods)
            .field("args", &self.args.keys().collect::<Vec<_>>())
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// 可序列化的端点配置（回调以名称引用）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_callback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<SchemaMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

/// 路由 -> 端点配置清单
pub type ManifestSet = IndexMap<String, EndpointManifest>;

impl From<EndpointManifest> for EndpointConfig {
    fn from(manifest: EndpointManifest) -> Self {
        Self {
            methods: manifest.methods.map(MethodsField::Raw),
            callback: manifest.callback.map(Invocable::Named),
            permission_callback: manifest.permission_callback.map(Invocable::Named),
            args: manifest.args,
            schema: manifest.schema.map(SchemaSource::Literal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_methods_field_resolve() {
        assert_eq!(
            MethodsField::from("get, post").resolve(),
            MethodSet::READABLE | MethodSet::CREATABLE
        );
        assert_eq!(
            MethodsField::from(MethodSet::DELETABLE).resolve(),
            MethodSet::DELETABLE
        );
    }

    #[test]
    fn test_schema_source_producer_resolves() {
        let source = SchemaSource::Producer(Arc::new(|| json!({"title": "item"})));
        assert_eq!(source.resolve(), json!({"title": "item"}));
    }

    #[test]
    fn test_manifest_into_config() {
        let manifest: EndpointManifest = serde_json::from_value(json!({
            "methods": "GET",
            "callback": "list_items",
            "args": { "page": { "type": "integer", "minimum": 1 } }
        }))
        .unwrap();

        let config = EndpointConfig::from(manifest);
        assert_eq!(config.methods, Some(MethodsField::Raw("GET".to_string())));
        assert!(matches!(config.callback, Some(Invocable::Named(ref n)) if n == "list_items"));
        assert!(config.permission_callback.is_none());
        assert_eq!(config.args.unwrap()["page"].minimum, Some(1.0));
    }

    #[test]
    fn test_builder_collects_args() {
        let config = EndpointConfig::new()
            .with_methods("GET")
            .with_arg("id", SchemaSpec::of_type("integer"))
            .with_arg("q", SchemaSpec::of_type("string"));
        let args = config.args.unwrap();
        assert_eq!(args.keys().collect::<Vec<_>>(), vec!["id", "q"]);
    }
}
