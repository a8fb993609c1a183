//! 日志模块
//!
//! `DebugLog` 是注册流程的诊断输出：仅在调试模式下写出，
//! 设置了前缀时以 `[prefix]` 打头。实际输出走 `tracing`。

use serde_json::Value;

/// 受调试开关控制的日志输出
#[derive(Debug, Clone, Default)]
pub struct DebugLog {
    enabled: bool,
    prefix: Option<String>,
}

impl DebugLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.set_prefix(prefix);
        self
    }

    /// 空字符串表示不加前缀
    pub fn set_prefix(&mut self, prefix: &str) {
        self.prefix = if prefix.is_empty() {
            None
        } else {
            Some(prefix.to_string())
        };
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 记录一条诊断信息
    pub fn log(&self, message: &str, context: Option<&Value>) {
        if self.enabled {
            tracing::info!("{}", self.format_line(message, context));
        }
    }

    /// 记录一条被拒绝的输入
    pub fn warn(&self, message: &str, context: Option<&Value>) {
        if self.enabled {
            tracing::warn!("{}", self.format_line(message, context));
        }
    }

    pub fn format_line(&self, message: &str, context: Option<&Value>) -> String {
        let mut line = match &self.prefix {
            Some(prefix) => format!("[{prefix}] {message}"),
            None => message.to_string(),
        };
        if let Some(context) = context {
            line.push(' ');
            line.push_str(&context.to_string());
        }
        line
    }
}

/// 初始化全局 tracing 订阅者
///
/// 无法识别的级别按 `info` 处理。已初始化过时返回 `false`。
pub fn init_logging(level: &str) -> bool {
    let level = level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .is_ok()
}
