//! 端点注册管理器
//!
//! 两阶段使用：先构建并填充端点，再由调用方在宿主路由就绪后
//! 调用 `register_endpoints`。流式接口不返回错误，被拒绝的输入
//! 只在调试模式下记录日志，其余端点不受影响。

use indexmap::IndexMap;
use serde_json::json;

use super::error::RegistrationError;
use super::handlers::HandlerTable;
use super::host::RouteHost;
use super::normalize::normalize_endpoint;
use super::route_pattern::Namespace;
use crate::config::RegistryConfig;
use crate::logger::DebugLog;
use crate::models::{EndpointConfig, EndpointDefinition, ManifestSet};

/// 管理器生命周期
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistrationState {
    #[default]
    Unconfigured,
    Configured,
    Registered,
}

impl std::fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "unconfigured"),
            Self::Configured => write!(f, "configured"),
            Self::Registered => write!(f, "registered"),
        }
    }
}

#[derive(Debug)]
pub struct RegistrationManager {
    namespace: Namespace,
    prefix: String,
    endpoints: IndexMap<String, EndpointDefinition>,
    handlers: HandlerTable,
    log: DebugLog,
    state: RegistrationState,
}

impl RegistrationManager {
    /// 创建空管理器，调试开关在此读取一次
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            namespace: Namespace::default(),
            prefix: String::new(),
            endpoints: IndexMap::new(),
            handlers: HandlerTable::new(),
            log: DebugLog::new(config.debug),
            state: RegistrationState::Unconfigured,
        }
    }

    /// 创建并设置命名空间与日志前缀，空字符串视为未提供
    pub fn with_namespace(config: &RegistryConfig, namespace: &str, prefix: &str) -> Self {
        let mut manager = Self::new(config);
        if !prefix.is_empty() {
            manager.set_prefix(prefix);
        }
        if !namespace.is_empty() {
            manager.set_namespace(namespace);
        }
        manager
    }

    /// 设置命名回调查找表，需在添加引用名称的端点之前调用
    pub fn with_handlers(mut self, handlers: HandlerTable) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn handlers_mut(&mut self) -> &mut HandlerTable {
        &mut self.handlers
    }

    pub fn try_set_namespace(&mut self, namespace: &str) -> Result<&mut Self, RegistrationError> {
        self.namespace = Namespace::parse(namespace)?;
        self.mark_configured();
        Ok(self)
    }

    /// 设置命名空间，非法值保留原有命名空间
    pub fn set_namespace(&mut self, namespace: &str) -> &mut Self {
        if let Err(e) = self.try_set_namespace(namespace).map(|_| ()) {
            self.reject(&e);
        }
        self
    }

    /// 设置日志前缀，不做校验
    pub fn set_prefix(&mut self, prefix: &str) -> &mut Self {
        self.prefix = prefix.to_string();
        self.log.set_prefix(prefix);
        self
    }

    pub fn try_add_endpoint(
        &mut self,
        route: &str,
        config: EndpointConfig,
    ) -> Result<&mut Self, RegistrationError> {
        let definition = normalize_endpoint(route, config, &self.handlers)?;
        self.endpoints.insert(route.to_string(), definition);
        self.mark_configured();
        Ok(self)
    }

    /// 添加端点，同一路由后者覆盖前者；被拒绝时集合不变
    pub fn add_endpoint(&mut self, route: &str, config: EndpointConfig) -> &mut Self {
        if let Err(e) = self.try_add_endpoint(route, config).map(|_| ()) {
            self.reject(&e);
        }
        self
    }

    /// 按迭代顺序批量添加
    pub fn add_endpoints<I, R>(&mut self, endpoints: I) -> &mut Self
    where
        I: IntoIterator<Item = (R, EndpointConfig)>,
        R: AsRef<str>,
    {
        for (route, config) in endpoints {
            self.add_endpoint(route.as_ref(), config);
        }
        self
    }

    /// 从清单添加端点，回调名称在处理器表中查找
    pub fn add_manifest(&mut self, manifest: ManifestSet) -> &mut Self {
        self.add_endpoints(
            manifest
                .into_iter()
                .map(|(route, entry)| (route, EndpointConfig::from(entry))),
        )
    }

    /// 向宿主注册全部端点，返回注册调用次数
    ///
    /// 命名空间未设置或没有端点时不做任何事。
    pub fn register_endpoints<H>(&mut self, host: &mut H) -> usize
    where
        H: RouteHost + ?Sized,
    {
        if !self.namespace.is_set() || self.endpoints.is_empty() {
            self.log.log(
                "跳过端点注册：命名空间或端点为空",
                Some(&json!({
                    "namespace": self.namespace.as_str(),
                    "endpoints": self.endpoints.len(),
                })),
            );
            return 0;
        }

        let namespace = self.namespace.as_str();
        for (route, definition) in &self.endpoints {
            host.register_route(namespace, route, definition);
            self.log.log(
                "端点注册成功",
                Some(&json!({
                    "namespace": namespace,
                    "route": route,
                    "methods": definition.methods.to_string(),
                })),
            );
        }

        tracing::debug!(
            "[RegistrationManager] 已注册 {} 个端点到 {}",
            self.endpoints.len(),
            namespace
        );
        self.state = RegistrationState::Registered;
        self.endpoints.len()
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_str()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn endpoints(&self) -> &IndexMap<String, EndpointDefinition> {
        &self.endpoints
    }

    pub fn endpoint(&self, route: &str) -> Option<&EndpointDefinition> {
        self.endpoints.get(route)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    pub fn is_debug(&self) -> bool {
        self.log.is_enabled()
    }

    fn mark_configured(&mut self) {
        if self.state == RegistrationState::Unconfigured {
            self.state = RegistrationState::Configured;
        }
    }

    fn reject(&self, error: &RegistrationError) {
        self.log.warn(
            &error.to_string(),
            Some(&json!({ "code": error.code() })),
        );
    }
}
