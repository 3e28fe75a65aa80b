//! Request body validation.
//!
//! Checks an incoming payload against the `LatencyRequest` schema before
//! the aggregator sees it, collecting every field error with its location.

use crate::models::{LatencyRecord, LatencyRequest};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// One segment of an error location path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for LocSegment {
    fn from(key: &str) -> Self {
        LocSegment::Key(key.to_string())
    }
}

impl From<usize> for LocSegment {
    fn from(index: usize) -> Self {
        LocSegment::Index(index)
    }
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocSegment::Key(key) => write!(f, "{}", key),
            LocSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Machine-readable kind of a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    JsonInvalid,
    ModelType,
    ListType,
    Missing,
    StringType,
    FloatType,
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
}

impl FieldError {
    fn new(loc: Vec<LocSegment>, msg: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            loc,
            msg: msg.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<String> = self.loc.iter().map(ToString::to_string).collect();
        write!(f, "{}: {}", path.join("."), self.msg)
    }
}

/// All schema violations found in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid request body: {}", join_errors(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    fn single(loc: Vec<LocSegment>, msg: impl Into<String>, kind: ErrorKind) -> Self {
        Self(vec![FieldError::new(loc, msg, kind)])
    }
}

/// Parse and validate a raw JSON request body.
pub fn validate_request(body: &[u8]) -> Result<LatencyRequest, ValidationErrors> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ValidationErrors::single(
            vec!["body".into()],
            format!("JSON decode error: {}", e),
            ErrorKind::JsonInvalid,
        )
    })?;

    validate_value(&value)
}

/// Validate an already-parsed JSON value.
pub fn validate_value(value: &Value) -> Result<LatencyRequest, ValidationErrors> {
    let Some(object) = value.as_object() else {
        return Err(ValidationErrors::single(
            vec!["body".into()],
            "Input should be a valid object",
            ErrorKind::ModelType,
        ));
    };

    let data_loc = || vec![LocSegment::from("body"), LocSegment::from("data")];
    let items = match object.get("data") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ValidationErrors::single(
                data_loc(),
                "Input should be a valid list",
                ErrorKind::ListType,
            ))
        }
        None => {
            return Err(ValidationErrors::single(
                data_loc(),
                "Field required",
                ErrorKind::Missing,
            ))
        }
    };

    let mut errors = Vec::new();
    let mut data = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let mut loc = data_loc();
        loc.push(index.into());
        if let Some(record) = validate_record(item, &loc, &mut errors) {
            data.push(record);
        }
    }

    if errors.is_empty() {
        Ok(LatencyRequest { data })
    } else {
        Err(ValidationErrors(errors))
    }
}

fn validate_record(
    item: &Value,
    loc: &[LocSegment],
    errors: &mut Vec<FieldError>,
) -> Option<LatencyRecord> {
    let Some(fields) = item.as_object() else {
        errors.push(FieldError::new(
            loc.to_vec(),
            "Input should be a valid object",
            ErrorKind::ModelType,
        ));
        return None;
    };

    // Every field is checked before bailing so all errors are reported.
    let region = string_field(fields, "region", loc, errors);
    let service = string_field(fields, "service", loc, errors);
    let latency_ms = float_field(fields, "latency_ms", loc, errors);
    let uptime_pct = float_field(fields, "uptime_pct", loc, errors);
    let timestamp = string_field(fields, "timestamp", loc, errors);

    Some(LatencyRecord {
        region: region?,
        service: service?,
        latency_ms: latency_ms?,
        uptime_pct: uptime_pct?,
        timestamp: timestamp?,
    })
}

fn field_loc(loc: &[LocSegment], name: &str) -> Vec<LocSegment> {
    let mut path = loc.to_vec();
    path.push(name.into());
    path
}

fn string_field(
    fields: &Map<String, Value>,
    name: &str,
    loc: &[LocSegment],
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match fields.get(name) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(
                field_loc(loc, name),
                "Input should be a valid string",
                ErrorKind::StringType,
            ));
            None
        }
        None => {
            errors.push(FieldError::new(
                field_loc(loc, name),
                "Field required",
                ErrorKind::Missing,
            ));
            None
        }
    }
}

fn float_field(
    fields: &Map<String, Value>,
    name: &str,
    loc: &[LocSegment],
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    // `as_f64` is `None` for anything but a JSON number, bools included.
    match fields.get(name) {
        Some(value) if value.as_f64().is_some() => value.as_f64(),
        Some(_) => {
            errors.push(FieldError::new(
                field_loc(loc, name),
                "Input should be a valid number",
                ErrorKind::FloatType,
            ));
            None
        }
        None => {
            errors.push(FieldError::new(
                field_loc(loc, name),
                "Field required",
                ErrorKind::Missing,
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_request() {
        let body = json!({
            "data": [
                {"region": "us-east", "service": "api", "latency_ms": 100, "uptime_pct": 99.9, "timestamp": "t1"},
                {"region": "eu-west", "service": "db", "latency_ms": 12.5, "uptime_pct": 100, "timestamp": "t2", "extra": true}
            ]
        });

        let request = validate_request(body.to_string().as_bytes()).unwrap();
        assert_eq!(request.data.len(), 2);
        assert_eq!(request.data[0].latency_ms, 100.0);
        assert_eq!(request.data[1].uptime_pct, 100.0);
        assert_eq!(request.data[1].service, "db");
    }

    #[test]
    fn test_empty_data_is_schema_valid() {
        let request = validate_request(br#"{"data": []}"#).unwrap();
        assert!(request.data.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        let errors = validate_request(b"{not json").unwrap_err();
        assert_eq!(errors.0.len(), 1);
        assert_eq!(errors.0[0].kind, ErrorKind::JsonInvalid);
    }

    #[test]
    fn test_body_must_be_object() {
        let errors = validate_request(b"[1, 2, 3]").unwrap_err();
        assert_eq!(errors.0[0].kind, ErrorKind::ModelType);
        assert_eq!(errors.0[0].loc, vec![LocSegment::from("body")]);
    }

    #[test]
    fn test_missing_data() {
        let errors = validate_request(br#"{"records": []}"#).unwrap_err();
        assert_eq!(errors.0[0].kind, ErrorKind::Missing);
        assert_eq!(
            errors.0[0].loc,
            vec![LocSegment::from("body"), LocSegment::from("data")]
        );
    }

    #[test]
    fn test_data_must_be_list() {
        let errors = validate_request(br#"{"data": {"region": "x"}}"#).unwrap_err();
        assert_eq!(errors.0[0].kind, ErrorKind::ListType);
    }

    #[test]
    fn test_collects_every_field_error() {
        let body = json!({
            "data": [
                {"region": "ok", "service": "api", "latency_ms": 1.0, "uptime_pct": 99.0, "timestamp": "t"},
                {"region": 7, "service": "api", "latency_ms": "fast", "timestamp": "t"},
                "not-a-record"
            ]
        });

        let errors = validate_request(body.to_string().as_bytes()).unwrap_err();
        let kinds: Vec<ErrorKind> = errors.0.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::StringType,
                ErrorKind::FloatType,
                ErrorKind::Missing,
                ErrorKind::ModelType
            ]
        );
        assert_eq!(
            errors.0[1].loc,
            vec![
                LocSegment::from("body"),
                LocSegment::from("data"),
                LocSegment::from(1),
                LocSegment::from("latency_ms")
            ]
        );
        assert_eq!(errors.0[2].to_string(), "body.data.1.uptime_pct: Field required");
    }

    #[test]
    fn test_rejects_bool_and_numeric_string() {
        let body = json!({
            "data": [
                {"region": "r", "service": "s", "latency_ms": true, "uptime_pct": "99.5", "timestamp": "t"}
            ]
        });

        let errors = validate_request(body.to_string().as_bytes()).unwrap_err();
        assert_eq!(errors.0.len(), 2);
        assert!(errors.0.iter().all(|e| e.kind == ErrorKind::FloatType));
    }

    #[test]
    fn test_error_serialization() {
        let error = FieldError::new(
            vec![
                LocSegment::from("body"),
                LocSegment::from("data"),
                LocSegment::Index(0),
                LocSegment::from("region"),
            ],
            "Field required",
            ErrorKind::Missing,
        );
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"loc": ["body", "data", 0, "region"], "msg": "Field required", "type": "missing"})
        );
    }
}
