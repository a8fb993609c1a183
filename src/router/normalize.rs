//! 端点配置规范化
//!
//! 处理顺序：
//! 1. 路由语法校验
//! 2. 必填字段 `methods` / `callback`
//! 3. 解析方法字符串
//! 4. 解析回调引用（名称需在处理器表中存在）
//! 5. Schema 生成函数调用一次
//! 6. 补全默认值

use std::sync::Arc;

use super::error::RegistrationError;
use super::handlers::HandlerTable;
use super::route_pattern::validate_route;
use crate::models::{
    EndpointConfig, EndpointDefinition, Handler, Invocable, MethodsField, PermissionCheck,
    RestRequest,
};

/// 默认权限检查：始终放行
pub fn always_allow() -> PermissionCheck {
    Arc::new(|_request: &RestRequest| true)
}

/// 规范化单个端点，纯函数，不记录日志
pub fn normalize_endpoint(
    route: &str,
    config: EndpointConfig,
    handlers: &HandlerTable,
) -> Result<EndpointDefinition, RegistrationError> {
    validate_route(route)?;

    let missing = |field: &'static str| RegistrationError::MissingField {
        route: route.to_string(),
        field,
    };
    let methods_field = config.methods.ok_or_else(|| missing("methods"))?;
    let callback_ref = config.callback.ok_or_else(|| missing("callback"))?;

    let methods = methods_field.resolve();
    if methods.is_empty() {
        let raw = match methods_field {
            MethodsField::Raw(raw) => raw,
            MethodsField::Parsed(_) => String::new(),
        };
        return Err(RegistrationError::NoMethods {
            route: route.to_string(),
            raw,
        });
    }

    let callback: Handler = match callback_ref {
        Invocable::Direct(callback) => callback,
        Invocable::Named(name) => handlers.handler(&name).ok_or_else(|| {
            RegistrationError::UncallableCallback {
                route: route.to_string(),
                field: "callback",
                name,
            }
        })?,
    };

    let permission_callback = match config.permission_callback {
        None => always_allow(),
        Some(Invocable::Direct(check)) => check,
        Some(Invocable::Named(name)) => handlers.permission(&name).ok_or_else(|| {
            RegistrationError::UncallableCallback {
                route: route.to_string(),
                field: "permission_callback",
                name,
            }
        })?,
    };

    Ok(EndpointDefinition {
        methods,
        callback,
        permission_callback,
        args: config.args.unwrap_or_default(),
        schema: config.schema.map(|source| source.resolve()),
    })
}
