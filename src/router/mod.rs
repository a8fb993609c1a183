//! 路由注册模块
//!
//! 支持声明式端点注册与命名空间路由。
//! 路由格式：
//! - 命名空间：`{name}/v{version}`，如 `shop/v1`
//! - 端点路由：`/items`、`/orders/recent`
//! - 宿主完整路径：`/{namespace}{route}`

mod axum_host;
mod error;
mod handlers;
mod host;
mod normalize;
mod registry;
mod route_pattern;

pub use axum_host::{AxumHost, RegisteredEndpoint};
pub use error::RegistrationError;
pub use handlers::HandlerTable;
pub use host::{build_endpoint_url, RouteHost};
pub use normalize::{always_allow, normalize_endpoint};
pub use registry::{RegistrationManager, RegistrationState};
pub use route_pattern::{is_valid_namespace, is_valid_route, validate_route, Namespace};
