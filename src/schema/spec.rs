//! 字段级 Schema 定义
//!
//! JSON Schema（draft-04 风格）的子集，既用于端点参数 `args`，
//! 也用于独立的数据校验。未识别的关键字在反序列化时忽略。

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 字段名 -> 字段 Schema，保持声明顺序
pub type SchemaMap = IndexMap<String, SchemaSpec>;

/// `type` 关键字：单个类型或类型列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Union(Vec<String>),
}

impl SchemaType {
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Single(name) => vec![name.as_str()],
            Self::Union(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// `required` 关键字：参数级布尔值，或对象级的属性名列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Required {
    Flag(bool),
    Fields(Vec<String>),
}

/// 单个字段的校验规则
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SchemaType>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_minimum: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_maximum: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unique_items: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<SchemaMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Required>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaSpec {
    /// 仅声明类型的规则
    pub fn of_type(kind: &str) -> Self {
        Self {
            kind: Some(SchemaType::Single(kind.to_string())),
            ..Self::default()
        }
    }

    /// 从 JSON 值解析
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn required(mut self) -> Self {
        self.required = Some(Required::Flag(true));
        self
    }

    pub fn with_range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    pub fn with_enum(mut self, allowed: Vec<Value>) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// 参数级 `required: true`
    pub fn is_required(&self) -> bool {
        matches!(self.required, Some(Required::Flag(true)))
    }

    /// 对象级 `required: [..]` 与属性上 `required: true` 的并集
    pub fn required_properties(&self) -> Vec<&str> {
        let mut names: Vec<&str> = match &self.required {
            Some(Required::Fields(fields)) => fields.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        };
        if let Some(properties) = &self.properties {
            for (name, spec) in properties {
                if spec.is_required() && !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_camel_case_keywords() {
        let spec = SchemaSpec::from_value(json!({
            "type": ["integer", "null"],
            "minimum": 1,
            "exclusiveMaximum": true,
            "maximum": 10,
            "enum": [1, 2, 3],
            "x-unknown": "ignored"
        }))
        .unwrap();

        assert_eq!(spec.kind.unwrap().names(), vec!["integer", "null"]);
        assert_eq!(spec.minimum, Some(1.0));
        assert!(spec.exclusive_maximum);
        assert!(!spec.exclusive_minimum);
        assert_eq!(spec.allowed.unwrap().len(), 3);
    }

    #[test]
    fn test_required_flag_and_fields() {
        assert!(SchemaSpec::of_type("string").required().is_required());
        assert!(!SchemaSpec::of_type("string").is_required());

        let spec = SchemaSpec::from_value(json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string" },
                "email": { "type": "string", "required": true }
            }
        }))
        .unwrap();
        assert!(!spec.is_required());
        assert_eq!(spec.required_properties(), vec!["name", "email"]);
    }

    #[test]
    fn test_serialize_skips_empty_keywords() {
        let value = serde_json::to_value(SchemaSpec::of_type("string")).unwrap();
        assert_eq!(value, json!({ "type": "string" }));
    }
}
