//! 单值校验
//!
//! 按字段 Schema 校验单个 JSON 值的类型与约束。
//!
//! 整数、数字和布尔类型接受可解析的字符串（查询参数都是字符串），
//! 字符串类型不接受数字。类型列表先按严格匹配选择，再尝试宽松转换。

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::spec::SchemaSpec;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"));
static HEX_COLOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([A-Fa-f0-9]{3}){1,2}$").expect("hex color pattern"));
static LIST_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,]+").expect("list separator pattern"));

/// 单值校验失败
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ValueError {
    pub code: String,
    pub message: String,
}

impl ValueError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// 单值校验器，`SchemaValidator` 通过它逐字段校验
pub trait ValueValidator {
    fn validate_value(&self, value: &Value, spec: &SchemaSpec, field: &str)
        -> Result<(), ValueError>;
}

/// 默认实现，委托给 [`validate_value`]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaValidator;

impl ValueValidator for JsonSchemaValidator {
    fn validate_value(
        &self,
        value: &Value,
        spec: &SchemaSpec,
        field: &str,
    ) -> Result<(), ValueError> {
        validate_value(value, spec, field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

impl Primitive {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            "null" => Some(Self::Null),
            _ => None,
        }
    }
}

/// 按 Schema 校验单个值
pub fn validate_value(value: &Value, spec: &SchemaSpec, field: &str) -> Result<(), ValueError> {
    let (primitive, value) = match resolve_type(value, spec, field)? {
        Some((primitive, coerced)) => (Some(primitive), coerced),
        None => (None, Cow::Borrowed(value)),
    };

    if let Some(allowed) = &spec.allowed {
        if !allowed.iter().any(|candidate| values_equal(candidate, &value)) {
            let listed: Vec<String> = allowed.iter().map(Value::to_string).collect();
            return Err(ValueError::new(
                "rest_not_in_enum",
                format!("{field} is not one of {}.", listed.join(", ")),
            ));
        }
    }

    match primitive {
        Some(Primitive::Integer | Primitive::Number) => check_number(&value, spec, field),
        Some(Primitive::String) => check_string(&value, spec, field),
        Some(Primitive::Array) => check_array(&value, spec, field),
        Some(Primitive::Object) => check_object(&value, spec, field),
        _ => Ok(()),
    }
}

fn resolve_type<'a>(
    value: &'a Value,
    spec: &SchemaSpec,
    field: &str,
) -> Result<Option<(Primitive, Cow<'a, Value>)>, ValueError> {
    let Some(kind) = &spec.kind else {
        return Ok(None);
    };
    let names = kind.names();
    let declared: Vec<Primitive> = names.iter().filter_map(|n| Primitive::from_name(n)).collect();
    if declared.is_empty() {
        return Ok(None);
    }

    for lenient in [false, true] {
        for primitive in &declared {
            if let Some(coerced) = coerce(value, *primitive, lenient) {
                return Ok(Some((*primitive, coerced)));
            }
        }
    }

    Err(ValueError::new(
        "rest_invalid_type",
        format!("{field} is not of type {}.", names.join(",")),
    ))
}

fn coerce(value: &Value, primitive: Primitive, lenient: bool) -> Option<Cow<'_, Value>> {
    let strict = match primitive {
        Primitive::String => value.is_string(),
        Primitive::Integer => value.as_f64().is_some_and(|n| n.is_finite() && n.fract() == 0.0),
        Primitive::Number => value.is_number(),
        Primitive::Boolean => value.is_boolean(),
        Primitive::Array => value.is_array(),
        Primitive::Object => value.is_object(),
        Primitive::Null => value.is_null(),
    };
    if strict {
        return Some(Cow::Borrowed(value));
    }
    if !lenient {
        return None;
    }

    let coerced = match (primitive, value) {
        (Primitive::Integer, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),
        (Primitive::Number, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        (Primitive::Boolean, Value::String(s)) => match s.as_str() {
            "true" | "1" => Some(Value::Bool(true)),
            "false" | "0" | "" => Some(Value::Bool(false)),
            _ => None,
        },
        (Primitive::Boolean, Value::Number(n)) => match n.as_i64() {
            Some(1) => Some(Value::Bool(true)),
            Some(0) => Some(Value::Bool(false)),
            _ => None,
        },
        (Primitive::Null, Value::String(s)) if s.is_empty() => Some(Value::Null),
        (Primitive::Object, Value::String(s)) if s.is_empty() => Some(Value::Object(Map::new())),
        (Primitive::Array, Value::String(s)) => Some(Value::Array(
            LIST_SEPARATOR
                .split(s)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        )),
        _ => None,
    };
    coerced.map(Cow::Owned)
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn fmt_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn check_number(value: &Value, spec: &SchemaSpec, field: &str) -> Result<(), ValueError> {
    let Some(n) = value.as_f64() else {
        return Ok(());
    };

    if let Some(step) = spec.multiple_of.filter(|m| *m > 0.0) {
        let quotient = n / step;
        if (quotient - quotient.round()).abs() > 1e-9 {
            return Err(ValueError::new(
                "rest_invalid_multiple",
                format!("{field} must be a multiple of {}.", fmt_num(step)),
            ));
        }
    }

    let below = |min: f64| {
        if spec.exclusive_minimum {
            n <= min
        } else {
            n < min
        }
    };
    let above = |max: f64| {
        if spec.exclusive_maximum {
            n >= max
        } else {
            n > max
        }
    };
    let bound = |exclusive: bool| if exclusive { "exclusive" } else { "inclusive" };

    let message = match (spec.minimum, spec.maximum) {
        (Some(min), None) if below(min) => Some(if spec.exclusive_minimum {
            format!("{field} must be greater than {}", fmt_num(min))
        } else {
            format!("{field} must be greater than or equal to {}", fmt_num(min))
        }),
        (None, Some(max)) if above(max) => Some(if spec.exclusive_maximum {
            format!("{field} must be less than {}", fmt_num(max))
        } else {
            format!("{field} must be less than or equal to {}", fmt_num(max))
        }),
        (Some(min), Some(max)) if below(min) || above(max) => Some(format!(
            "{field} must be between {} ({}) and {} ({})",
            fmt_num(min),
            bound(spec.exclusive_minimum),
            fmt_num(max),
            bound(spec.exclusive_maximum)
        )),
        _ => None,
    };

    match message {
        Some(message) => Err(ValueError::new("rest_out_of_bounds", message)),
        None => Ok(()),
    }
}

fn check_string(value: &Value, spec: &SchemaSpec, field: &str) -> Result<(), ValueError> {
    let Some(s) = value.as_str() else {
        return Ok(());
    };
    let len = s.chars().count();

    if let Some(min) = spec.min_length.filter(|min| len < *min) {
        return Err(ValueError::new(
            "rest_too_short",
            format!("{field} must be at least {min} character(s) long."),
        ));
    }
    if let Some(max) = spec.max_length.filter(|max| len > *max) {
        return Err(ValueError::new(
            "rest_too_long",
            format!("{field} must be at most {max} character(s) long."),
        ));
    }

    if let Some(pattern) = &spec.pattern {
        let regex = Regex::new(pattern).map_err(|_| {
            ValueError::new(
                "rest_invalid_schema",
                format!("{field} declares an invalid pattern {pattern}."),
            )
        })?;
        if !regex.is_match(s) {
            return Err(ValueError::new(
                "rest_invalid_pattern",
                format!("{field} does not match pattern {pattern}."),
            ));
        }
    }

    if let Some(format) = &spec.format {
        if !matches_format(s, format) {
            return Err(ValueError::new(
                "rest_invalid_format",
                format!("{field} is not a valid {format}."),
            ));
        }
    }

    Ok(())
}

/// 未识别的格式一律放行
fn matches_format(s: &str, format: &str) -> bool {
    match format {
        "email" => EMAIL_PATTERN.is_match(s),
        "uri" => url::Url::parse(s).is_ok(),
        "uuid" => uuid::Uuid::parse_str(s).is_ok(),
        "date-time" => chrono::DateTime::parse_from_rfc3339(s).is_ok(),
        "ip" => s.parse::<std::net::IpAddr>().is_ok(),
        "hex-color" => HEX_COLOR_PATTERN.is_match(s),
        _ => true,
    }
}

fn check_array(value: &Value, spec: &SchemaSpec, field: &str) -> Result<(), ValueError> {
    let Some(items) = value.as_array() else {
        return Ok(());
    };

    if let Some(min) = spec.min_items.filter(|min| items.len() < *min) {
        return Err(ValueError::new(
            "rest_too_few_items",
            format!("{field} must contain at least {min} item(s)."),
        ));
    }
    if let Some(max) = spec.max_items.filter(|max| items.len() > *max) {
        return Err(ValueError::new(
            "rest_too_many_items",
            format!("{field} must contain at most {max} item(s)."),
        ));
    }

    if spec.unique_items {
        for (i, item) in items.iter().enumerate() {
            if items[..i].iter().any(|seen| values_equal(seen, item)) {
                return Err(ValueError::new(
                    "rest_duplicate_items",
                    format!("{field} has duplicate items."),
                ));
            }
        }
    }

    if let Some(item_spec) = &spec.items {
        for (i, item) in items.iter().enumerate() {
            validate_value(item, item_spec, &format!("{field}[{i}]"))?;
        }
    }

    Ok(())
}

fn check_object(value: &Value, spec: &SchemaSpec, field: &str) -> Result<(), ValueError> {
    let Some(object) = value.as_object() else {
        return Ok(());
    };

    for name in spec.required_properties() {
        if !object.contains_key(name) {
            return Err(ValueError::new(
                "rest_property_required",
                format!("{name} is a required property of {field}."),
            ));
        }
    }

    for (key, item) in object {
        match spec.properties.as_ref().and_then(|p| p.get(key)) {
            Some(property) => validate_value(item, property, &format!("{field}[{key}]"))?,
            None if spec.additional_properties == Some(false) => {
                return Err(ValueError::new(
                    "rest_additional_properties_forbidden",
                    format!("{key} is not a valid property of Object."),
                ));
            }
            None => {}
        }
    }

    Ok(())
}
