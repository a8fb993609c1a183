//! 记录级 Schema 校验
//!
//! 对数据记录中出现、且在 Schema 中有定义的每个字段逐一校验，
//! 汇总所有失败字段后一次性返回，不会在第一个错误处中止。

use serde_json::{Map, Value};

use super::error_set::ValidationErrorSet;
use super::spec::SchemaMap;
use super::value_validator::{JsonSchemaValidator, ValueValidator};

/// 校验配置
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    /// 数据中缺失、但 Schema 标记为 `required: true` 的字段是否报错。
    /// 默认关闭：只校验出现的字段。
    pub enforce_required: bool,
}

/// Schema 校验器
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator<V = JsonSchemaValidator> {
    config: ValidatorConfig,
    value_validator: V,
}

impl SchemaValidator {
    /// 使用默认单值校验器
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V: ValueValidator> SchemaValidator<V> {
    /// 使用自定义单值校验器
    pub fn with_value_validator(value_validator: V) -> Self {
        Self {
            config: ValidatorConfig::default(),
            value_validator,
        }
    }

    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// 校验数据记录
    ///
    /// 按 Schema 声明顺序遍历字段；字段错误的消息格式为 `"<field>: <message>"`。
    pub fn validate(&self, schema: &SchemaMap, data: &Map<String, Value>) -> ValidationErrorSet {
        let mut errors = ValidationErrorSet::new();

        for (field, spec) in schema {
            let Some(value) = data.get(field) else {
                if self.config.enforce_required && spec.is_required() {
                    errors.push(
                        "rest_missing_param",
                        format!("{field}: {field} is a required parameter."),
                        field,
                    );
                }
                continue;
            };

            if let Err(err) = self.value_validator.validate_value(value, spec, field) {
                errors.push(err.code, format!("{field}: {}", err.message), field);
            }
        }

        if !errors.is_empty() {
            tracing::debug!(
                "[SchemaValidator] {} invalid field(s): {:?}",
                errors.len(),
                errors.fields()
            );
        }
        errors
    }
}

/// 使用默认配置校验
pub fn validate(schema: &SchemaMap, data: &Map<String, Value>) -> ValidationErrorSet {
    SchemaValidator::new().validate(schema, data)
}
