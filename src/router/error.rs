//! 注册错误类型

/// 端点注册过程中的拒绝原因
///
/// 流式接口会吞掉这些错误并记录日志；`try_*` 接口原样返回。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("invalid namespace `{0}`, expected `<name>/v<version>`")]
    InvalidNamespace(String),

    #[error("invalid route `{0}`")]
    InvalidRoute(String),

    #[error("endpoint `{route}` is missing required field `{field}`")]
    MissingField { route: String, field: &'static str },

    #[error("endpoint `{route}` declares no recognized HTTP method in `{raw}`")]
    NoMethods { route: String, raw: String },

    #[error("endpoint `{route}` has an uncallable {field} `{name}`")]
    UncallableCallback {
        route: String,
        field: &'static str,
        name: String,
    },

    #[error("endpoint registration failed: {0}")]
    ConstructionFailure(String),
}

impl RegistrationError {
    /// 稳定的错误码，用于日志上下文
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidNamespace(_) => "invalid_namespace",
            Self::InvalidRoute(_) => "invalid_route",
            Self::MissingField { .. } => "missing_field",
            Self::NoMethods { .. } => "no_methods",
            Self::UncallableCallback { .. } => "uncallable_callback",
            Self::ConstructionFailure(_) => "construction_failure",
        }
    }
}
