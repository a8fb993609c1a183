//! 配置类型定义

use serde::{Deserialize, Serialize};

/// 默认的 URL 根地址
pub const DEFAULT_URL_ROOT: &str = "http://127.0.0.1:8999";

/// 环境变量：调试模式开关
pub const ENV_DEBUG: &str = "REST_REGISTRY_DEBUG";
/// 环境变量：URL 根地址
pub const ENV_URL_ROOT: &str = "REST_REGISTRY_URL_ROOT";
/// 环境变量：日志级别
pub const ENV_LOG_LEVEL: &str = "REST_REGISTRY_LOG_LEVEL";

/// 注册层配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// 调试模式，开启后输出注册诊断日志
    pub debug: bool,
    /// 构建端点 URL 时使用的根地址
    pub url_root: String,
    /// 日志级别（trace/debug/info/warn/error）
    pub log_level: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            debug: false,
            url_root: DEFAULT_URL_ROOT.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl RegistryConfig {
    /// 从进程环境变量读取，未设置的项使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(debug) = lookup(ENV_DEBUG) {
            config.debug = parse_flag(&debug);
        }
        if let Some(url_root) = lookup(ENV_URL_ROOT).filter(|v| !v.trim().is_empty()) {
            config.url_root = url_root.trim().to_string();
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            config.log_level = level.trim().to_lowercase();
        }
        config
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_url_root(mut self, url_root: impl Into<String>) -> Self {
        self.url_root = url_root.into();
        self
    }
}

/// 解析布尔开关：1 / true / yes / on（不区分大小写）
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
