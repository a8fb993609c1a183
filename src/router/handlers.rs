//! 命名处理器表
//!
//! 端点清单中的回调以名称引用，规范化时在这里查找。
//! 查不到的名称即视为不可调用。

use std::sync::Arc;

use indexmap::IndexMap;

use crate::models::{Handler, PermissionCheck, RestRequest, RestResponse};

#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: IndexMap<String, Handler>,
    permissions: IndexMap<String, PermissionCheck>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&RestRequest) -> RestResponse + Send + Sync + 'static,
    {
        self.insert_handler(name, handler);
        self
    }

    pub fn with_permission<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&RestRequest) -> bool + Send + Sync + 'static,
    {
        self.insert_permission(name, check);
        self
    }

    /// 注册处理器，同名覆盖
    pub fn insert_handler<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&RestRequest) -> RestResponse + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    /// 注册权限检查，同名覆盖
    pub fn insert_permission<F>(&mut self, name: impl Into<String>, check: F)
    where
        F: Fn(&RestRequest) -> bool + Send + Sync + 'static,
    {
        self.permissions.insert(name.into(), Arc::new(check));
    }

    pub fn handler(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).cloned()
    }

    pub fn permission(&self, name: &str) -> Option<PermissionCheck> {
        self.permissions.get(name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty() && self.permissions.is_empty()
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerTable")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("permissions", &self.permissions.keys().collect::<Vec<_>>())
            .finish()
    }
}
