//! 命名空间与路由的语法校验
//!
//! 命名空间格式：`{name}/v{version}`，如 `shop/v1`。
//! 路由格式：以 `/` 开头，仅包含字母、数字、`/`、`_`、`-`。
//! 路由不接受正则捕获组语法（`(?P<id>\d+)` 等）。

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::RegistrationError;

static NAMESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+/v[0-9]+$").expect("namespace pattern"));
static ROUTE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/[A-Za-z0-9/_-]+$").expect("route pattern"));

pub fn is_valid_namespace(namespace: &str) -> bool {
    NAMESPACE_PATTERN.is_match(namespace)
}

pub fn is_valid_route(route: &str) -> bool {
    ROUTE_PATTERN.is_match(route)
}

pub fn validate_route(route: &str) -> Result<(), RegistrationError> {
    if is_valid_route(route) {
        Ok(())
    } else {
        Err(RegistrationError::InvalidRoute(route.to_string()))
    }
}

/// 已校验的命名空间，空值表示尚未设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    pub fn parse(raw: &str) -> Result<Self, RegistrationError> {
        if is_valid_namespace(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(RegistrationError::InvalidNamespace(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_set(&self) -> bool {
        !self.0.is_empty()
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
