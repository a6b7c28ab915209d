//! Cell value parsing
//!
//! Converts the raw text of one cell into its JSON value according to the
//! field's [`TypeDescriptor`]. Parsing is pure and cell-local: it knows
//! nothing about the sheet or table the cell belongs to.
//!
//! Container cells use fixed delimiters (see [`crate::data::constants`]):
//!
//! | Shape        | Cell text | JSON             |
//! |--------------|-----------|------------------|
//! | `[]string`   | `a,b,c`   | `["a","b","c"]`  |
//! | `[][]int32`  | `1,2;3`   | `[[1,2],[3]]`    |
//! | `map[string]int32` | `a:1;b:2` | `{"a":1,"b":2}` |
//!
//! Empty cells produce the zero value of the type: `0`, `0.0`, `false`, `""`,
//! or an empty container. A blank item inside a non-empty list cell (`1,,2`,
//! `1,2,`) is a format error; blank groups and blank map pairs are not.

use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::types::{Primitive, TypeDescriptor};
use crate::data::constants::{
    GROUP_DELIMITER, KEY_VALUE_DELIMITER, LIST_DELIMITER, PAIR_DELIMITER,
};

/// Largest integer a spreadsheet float can carry without rounding (2^53)
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Cell text could not be converted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("cannot read {text:?} as {expected}")]
    Format { expected: Primitive, text: String },
    #[error("duplicate map key {key}")]
    DuplicateKey { key: String },
}

impl ValueError {
    fn format(expected: Primitive, text: &str) -> Self {
        ValueError::Format {
            expected,
            text: text.to_string(),
        }
    }
}

/// Parse a cell into its JSON value
pub fn parse_cell(text: &str, ty: &TypeDescriptor) -> Result<Value, ValueError> {
    match *ty {
        TypeDescriptor::Scalar(p) => parse_scalar(text, p),
        TypeDescriptor::List(p) => parse_list(text, p),
        TypeDescriptor::ListOfList(p) => {
            if text.trim().is_empty() {
                return Ok(Value::Array(Vec::new()));
            }
            text.split(GROUP_DELIMITER)
                .map(|group| parse_list(group, p))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        TypeDescriptor::Map { key, value } => parse_map(text, key, value),
    }
}

/// Parse a cell and encode it as compact JSON text
pub fn encode_cell(text: &str, ty: &TypeDescriptor) -> Result<String, ValueError> {
    parse_cell(text, ty).map(|value| value.to_string())
}

/// Parse one scalar token
pub fn parse_scalar(text: &str, primitive: Primitive) -> Result<Value, ValueError> {
    match primitive {
        Primitive::Int32 | Primitive::Int64 => parse_int(text, primitive).map(Value::from),
        Primitive::Float32 => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return float_value(0.0, primitive, text);
            }
            let v: f32 = trimmed
                .parse()
                .map_err(|_| ValueError::format(primitive, text))?;
            // Go through the shortest f32 text so 0.1 stays 0.1 once widened
            let widened: f64 = v
                .to_string()
                .parse()
                .map_err(|_| ValueError::format(primitive, text))?;
            float_value(widened, primitive, text)
        }
        Primitive::Float64 => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return float_value(0.0, primitive, text);
            }
            let v: f64 = trimmed
                .parse()
                .map_err(|_| ValueError::format(primitive, text))?;
            float_value(v, primitive, text)
        }
        Primitive::String => Ok(Value::String(text.to_string())),
        Primitive::Bool => parse_bool(text).map(Value::Bool),
    }
}

fn parse_int(text: &str, primitive: Primitive) -> Result<i64, ValueError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let n = match trimmed.parse::<i64>() {
        Ok(n) => n,
        // Spreadsheets hand integers back as floats ("3.0")
        Err(_) => match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT_INT => {
                f as i64
            }
            _ => return Err(ValueError::format(primitive, text)),
        },
    };
    if primitive == Primitive::Int32 && i32::try_from(n).is_err() {
        return Err(ValueError::format(primitive, text));
    }
    Ok(n)
}

fn float_value(v: f64, primitive: Primitive, text: &str) -> Result<Value, ValueError> {
    Number::from_f64(v)
        .map(Value::Number)
        .ok_or_else(|| ValueError::format(primitive, text))
}

fn parse_bool(text: &str) -> Result<bool, ValueError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "0" || trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else if trimmed == "1" || trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else {
        Err(ValueError::format(Primitive::Bool, text))
    }
}

fn parse_list(text: &str, primitive: Primitive) -> Result<Value, ValueError> {
    if text.trim().is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    text.split(LIST_DELIMITER)
        .map(|item| {
            if item.trim().is_empty() {
                return Err(ValueError::format(primitive, text));
            }
            parse_scalar(item, primitive)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn parse_map(text: &str, key_type: Primitive, value_type: Primitive) -> Result<Value, ValueError> {
    let mut map = Map::new();
    for pair in text.split(PAIR_DELIMITER) {
        if pair.trim().is_empty() {
            continue;
        }
        let (key, value) = pair
            .split_once(KEY_VALUE_DELIMITER)
            .ok_or_else(|| ValueError::format(key_type, pair))?;
        if key.trim().is_empty() {
            return Err(ValueError::format(key_type, pair));
        }
        let key = map_key(key.trim(), key_type)?;
        if map.contains_key(&key) {
            return Err(ValueError::DuplicateKey { key });
        }
        map.insert(key, parse_scalar(value, value_type)?);
    }
    Ok(Value::Object(map))
}

/// Canonical text of a map key, used both as the JSON object key and for
/// repeat detection
fn map_key(text: &str, primitive: Primitive) -> Result<String, ValueError> {
    match parse_scalar(text, primitive)? {
        Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}
