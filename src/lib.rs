//! 声明式 REST 端点注册
//!
//! 调用方以配置描述端点（方法、回调、权限检查、参数 Schema），
//! 注册管理器负责校验与规范化，并在宿主路由就绪后统一注册。
//! 附带 axum 宿主适配器与参数 Schema 校验。

pub mod api;
pub mod config;
pub mod logger;
pub mod models;
pub mod router;
pub mod schema;

pub use api::{
    get_rest_endpoint_url, register_rest_endpoints, register_rest_manifest, validate_rest_schema,
};
pub use config::{ConfigError, RegistryConfig};
pub use models::{EndpointConfig, EndpointDefinition, EndpointManifest, MethodSet};
pub use router::{AxumHost, HandlerTable, RegistrationError, RegistrationManager, RouteHost};
pub use schema::{SchemaSpec, SchemaValidator, ValidationErrorSet};
