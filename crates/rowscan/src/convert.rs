//! Conversion of raw driver values into the kind of an intermediate holder.
//!
//! This is the conversion a driver performs when it scans a cell into a typed
//! destination. Failures are scan errors and surface through the cursor.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::value::{Kind, Value};

/// Convert `value` into a value of `kind`.
///
/// `NULL` and values already of the requested kind pass through unchanged, as
/// does anything converted to [`Kind::Any`].
///
/// # Errors
///
/// Returns an error when the value has no representation in `kind`.
pub fn convert(value: Value, kind: Kind) -> Result<Value> {
    if value.is_null() || kind == Kind::Any || value.kind() == Some(kind) {
        return Ok(value);
    }

    let source = value.kind().unwrap_or_default();
    let shown = truncate(&value);

    let converted = match kind {
        Kind::Any => Some(value),
        Kind::Bool => to_bool(&value).map(Value::Bool),
        Kind::Int => to_i64(&value).map(Value::Int),
        Kind::UInt => to_u64(&value).map(Value::UInt),
        Kind::Float => to_f64(&value).map(Value::Float),
        Kind::Text => to_text(value).map(Value::Text),
        Kind::Bytes => Some(Value::Bytes(to_bytes(value))),
        Kind::Date => to_date(&value).map(Value::Date),
        Kind::Time => to_time(&value).map(Value::Time),
        Kind::Timestamp => to_timestamp(&value).map(Value::Timestamp),
        Kind::Json => to_json(value).map(Value::Json),
    };

    converted.ok_or_else(|| anyhow!("converting {source} value `{shown}` to {kind}: invalid syntax"))
}

/// Parse a timestamp in RFC 3339 or `%Y-%m-%d %H:%M:%S%.f` form.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|parsed| parsed.and_utc())
}

fn truncate(value: &Value) -> String {
    let mut shown = value.to_string();
    if shown.len() > 32 {
        let mut end = 32;
        while !shown.is_char_boundary(end) {
            end -= 1;
        }
        shown.truncate(end);
        shown.push_str("...");
    }
    shown
}

fn text(value: &Value) -> Option<&str> {
    match value {
        Value::Text(s) => Some(s.trim()),
        Value::Bytes(b) => std::str::from_utf8(b).ok().map(str::trim),
        _ => None,
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Int(v) => Some(*v != 0),
        Value::UInt(v) => Some(*v != 0),
        _ => match text(value)? {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
            _ => None,
        },
    }
}

fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::UInt(v) => i64::try_from(*v).ok(),
        Value::Float(v) if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 => {
            Some(*v as i64)
        }
        _ => text(value)?.parse().ok(),
    }
}

fn to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Int(v) => u64::try_from(*v).ok(),
        Value::Float(v) if v.fract() == 0.0 && *v >= 0.0 && *v < u64::MAX as f64 => Some(*v as u64),
        _ => text(value)?.parse().ok(),
    }
}

fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(v) => Some(*v as f64),
        Value::UInt(v) => Some(*v as f64),
        _ => text(value)?.parse().ok(),
    }
}

fn to_text(value: Value) -> Option<String> {
    match value {
        Value::Bytes(b) => String::from_utf8(b).ok(),
        other => Some(other.to_string()),
    }
}

fn to_bytes(value: Value) -> Vec<u8> {
    match value {
        Value::Text(s) => s.into_bytes(),
        Value::Json(v) => v.to_string().into_bytes(),
        other => other.to_string().into_bytes(),
    }
}

fn to_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Timestamp(ts) => Some(ts.date_naive()),
        _ => {
            let raw = text(value)?;
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
        }
    }
}

fn to_time(value: &Value) -> Option<NaiveTime> {
    match value {
        Value::Timestamp(ts) => Some(ts.time()),
        _ => NaiveTime::parse_from_str(text(value)?, "%H:%M:%S%.f").ok(),
    }
}

fn to_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(date) => Some(date.and_time(NaiveTime::MIN).and_utc()),
        Value::Int(secs) => DateTime::from_timestamp(*secs, 0),
        _ => parse_timestamp(text(value)?),
    }
}

fn to_json(value: Value) -> Option<serde_json::Value> {
    match value {
        Value::Text(s) => serde_json::from_str(&s).ok(),
        Value::Bytes(b) => serde_json::from_slice(&b).ok(),
        other => Some(other.into_json()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough() {
        assert_eq!(convert(Value::Null, Kind::Int).unwrap(), Value::Null);
        assert_eq!(convert(Value::Int(3), Kind::Any).unwrap(), Value::Int(3));
        assert_eq!(convert(Value::from("x"), Kind::Text).unwrap(), Value::from("x"));
    }

    #[test]
    fn numeric_widening() {
        assert_eq!(convert(Value::Int(3), Kind::Float).unwrap(), Value::Float(3.0));
        assert_eq!(convert(Value::UInt(9), Kind::Int).unwrap(), Value::Int(9));
        assert_eq!(convert(Value::Float(4.0), Kind::Int).unwrap(), Value::Int(4));
        assert_eq!(convert(Value::from(" 42 "), Kind::UInt).unwrap(), Value::UInt(42));
        assert_eq!(convert(Value::Int(2), Kind::Bool).unwrap(), Value::Bool(true));
        assert_eq!(convert(Value::from("f"), Kind::Bool).unwrap(), Value::Bool(false));
        assert_eq!(convert(Value::Int(7), Kind::Text).unwrap(), Value::from("7"));
    }

    #[test]
    fn lossy_numbers_rejected() {
        convert(Value::Float(1.5), Kind::Int).unwrap_err();
        convert(Value::Int(-1), Kind::UInt).unwrap_err();
        convert(Value::UInt(u64::MAX), Kind::Int).unwrap_err();
    }

    #[test]
    fn text_parse_errors() {
        let err = convert(Value::from("abc"), Kind::Int).unwrap_err();
        assert!(err.to_string().contains("converting text value `abc` to int"));

        convert(Value::from("yes"), Kind::Bool).unwrap_err();
        convert(Value::Bytes(vec![0xff, 0xfe]), Kind::Text).unwrap_err();
    }

    #[test]
    fn temporal() {
        let ts = convert(Value::from("2024-01-15 10:30:45.123"), Kind::Timestamp).unwrap();
        let Value::Timestamp(ts) = ts else {
            panic!("expected timestamp");
        };
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-15 10:30:45");

        let ts = convert(Value::from("2024-01-15T10:30:45+02:00"), Kind::Timestamp).unwrap();
        assert_eq!(ts.to_string(), "2024-01-15T08:30:45+00:00");

        let date = convert(Value::from("2024-01-15"), Kind::Date).unwrap();
        assert_eq!(date, Value::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));

        let time = convert(Value::from("10:30:00"), Kind::Time).unwrap();
        assert_eq!(time, Value::Time(NaiveTime::from_hms_opt(10, 30, 0).unwrap()));

        let epoch = convert(Value::Int(0), Kind::Timestamp).unwrap();
        assert_eq!(epoch, Value::Timestamp(DateTime::UNIX_EPOCH));

        convert(Value::from("invalid date"), Kind::Timestamp).unwrap_err();
    }

    #[test]
    fn json() {
        let json = convert(Value::from(r#"{"a":1}"#), Kind::Json).unwrap();
        assert_eq!(json, Value::Json(serde_json::json!({"a": 1})));

        assert_eq!(convert(Value::Int(5), Kind::Json).unwrap(), Value::Json(serde_json::json!(5)));
        convert(Value::from("not json"), Kind::Json).unwrap_err();
    }
}
