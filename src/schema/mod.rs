//! Schema 校验模块
//!
//! 提供以下功能：
//! - 字段级 Schema 定义（JSON Schema 子集）
//! - 单值类型与约束校验
//! - 记录级校验，汇总所有字段错误

mod error_set;
mod spec;
mod validator;
mod value_validator;

pub use error_set::{ErrorContext, ValidationError, ValidationErrorSet};
pub use spec::{Required, SchemaMap, SchemaSpec, SchemaType};
pub use validator::{validate, SchemaValidator, ValidatorConfig};
pub use value_validator::{validate_value, JsonSchemaValidator, ValueError, ValueValidator};
