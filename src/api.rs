//! 便捷接口
//!
//! 一次调用完成管理器构建、端点添加与注册。
//! 这一层不向调用方抛出任何错误或 panic，只返回成功与否。

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde_json::{json, Map, Value};

use crate::config::RegistryConfig;
use crate::logger::DebugLog;
use crate::models::{EndpointConfig, ManifestSet};
use crate::router::{HandlerTable, RegistrationError, RegistrationManager, RouteHost};
use crate::schema::{validate, SchemaMap, ValidationErrorSet};

/// 注册一组端点
///
/// 端点为空时返回 `false`；端点回调或 Schema 生成函数 panic 时同样返回 `false`。
/// 个别端点被拒绝不影响返回值。
pub fn register_rest_endpoints<H, I, R>(
    host: &mut H,
    config: &RegistryConfig,
    namespace: &str,
    endpoints: I,
    prefix: &str,
) -> bool
where
    H: RouteHost + ?Sized,
    I: IntoIterator<Item = (R, EndpointConfig)>,
    R: AsRef<str>,
{
    let endpoints: Vec<(R, EndpointConfig)> = endpoints.into_iter().collect();
    if endpoints.is_empty() {
        failure_log(config, prefix).log(
            "未提供任何端点",
            Some(&json!({ "namespace": namespace })),
        );
        return false;
    }

    run_guarded(config, prefix, namespace, || {
        let mut manager = RegistrationManager::with_namespace(config, namespace, prefix);
        manager.add_endpoints(endpoints);
        manager.register_endpoints(host);
    })
}

/// 按清单注册端点，回调名称在 `handlers` 中查找
pub fn register_rest_manifest<H>(
    host: &mut H,
    config: &RegistryConfig,
    handlers: HandlerTable,
    namespace: &str,
    manifest: ManifestSet,
    prefix: &str,
) -> bool
where
    H: RouteHost + ?Sized,
{
    if manifest.is_empty() {
        failure_log(config, prefix).log(
            "端点清单为空",
            Some(&json!({ "namespace": namespace })),
        );
        return false;
    }

    run_guarded(config, prefix, namespace, || {
        let mut manager =
            RegistrationManager::with_namespace(config, namespace, prefix).with_handlers(handlers);
        manager.add_manifest(manifest);
        manager.register_endpoints(host);
    })
}

/// 端点的完整 URL
pub fn get_rest_endpoint_url<H>(host: &H, namespace: &str, endpoint: &str) -> String
where
    H: RouteHost + ?Sized,
{
    host.build_url(namespace, endpoint)
}

/// 校验参数，全部通过时返回 `Ok(())`
pub fn validate_rest_schema(
    schema: &SchemaMap,
    data: &Map<String, Value>,
) -> Result<(), ValidationErrorSet> {
    validate(schema, data).into_result()
}

fn run_guarded<F>(config: &RegistryConfig, prefix: &str, namespace: &str, work: F) -> bool
where
    F: FnOnce(),
{
    match catch_unwind(AssertUnwindSafe(work)) {
        Ok(()) => true,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            let error = RegistrationError::ConstructionFailure(message);
            tracing::debug!("[RestApi] 端点注册中断: {}", error);
            failure_log(config, prefix).warn(
                &error.to_string(),
                Some(&json!({ "code": error.code(), "namespace": namespace })),
            );
            false
        }
    }
}

fn failure_log(config: &RegistryConfig, prefix: &str) -> DebugLog {
    DebugLog::new(config.debug).with_prefix(prefix)
}
