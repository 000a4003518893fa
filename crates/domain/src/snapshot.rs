//! One fetch cycle's view of the Unbound overview statistics.
//!
//! The upstream schema drifts between firewall releases, so the document is
//! kept untyped and every metric is pulled out on its own. A missing field
//! reads as zero (or an empty table); a field that is present with the wrong
//! shape produces a [`FieldError`] for that field only.

use crate::errors::FetchError;
use serde_json::{Map, Value};
use thiserror::Error;

const UNKNOWN_BLOCKLIST: &str = "unknown";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field `{field}`: {reason}")]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Count and share of one query category (`resolved`, `blocked`, `local`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Breakdown {
    pub total: f64,
    pub percent: f64,
}

/// Members of one breakdown object, each extracted on its own so a bad
/// `pcnt` does not hide a good `total`.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownFields {
    pub total: Result<f64, FieldError>,
    pub percent: Result<f64, FieldError>,
}

impl BreakdownFields {
    fn zero() -> Self {
        Self {
            total: Ok(0.0),
            percent: Ok(0.0),
        }
    }

    pub fn into_breakdown(self) -> Result<Breakdown, FieldError> {
        Ok(Breakdown {
            total: self.total?,
            percent: self.percent?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopEntry {
    pub domain: String,
    pub total: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopBlockedEntry {
    pub domain: String,
    pub blocklist: String,
    pub total: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    document: Map<String, Value>,
}

impl StatsSnapshot {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FetchError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, FetchError> {
        match value {
            Value::Object(document) => Ok(Self { document }),
            other => Err(FetchError::Decode(format!(
                "expected a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }

    pub fn total(&self) -> Result<f64, FieldError> {
        self.number("total")
    }

    pub fn passed(&self) -> Result<f64, FieldError> {
        self.number("passed")
    }

    pub fn blocklist_size(&self) -> Result<f64, FieldError> {
        self.number("blocklist_size")
    }

    pub fn resolved(&self) -> Result<Breakdown, FieldError> {
        self.breakdown_fields("resolved")?.into_breakdown()
    }

    pub fn blocked(&self) -> Result<Breakdown, FieldError> {
        self.breakdown_fields("blocked")?.into_breakdown()
    }

    pub fn local(&self) -> Result<Breakdown, FieldError> {
        self.breakdown_fields("local")?.into_breakdown()
    }

    /// `total` and `pcnt` of a breakdown object (`resolved`, `blocked`,
    /// `local`). Only a non-object value fails as a whole.
    pub fn breakdown_fields(&self, category: &str) -> Result<BreakdownFields, FieldError> {
        let value = match self.document.get(category) {
            None | Some(Value::Null) => return Ok(BreakdownFields::zero()),
            Some(value) => value,
        };
        let members = as_object(category, value)?;
        Ok(BreakdownFields {
            total: member_number(category, members, "total"),
            percent: member_number(category, members, "pcnt"),
        })
    }

    /// Top queried domains. A malformed entry rejects the whole table.
    pub fn top_queried(&self) -> Result<Vec<TopEntry>, FieldError> {
        self.table("top")?
            .iter()
            .map(|(domain, stats)| {
                let field = format!("top[{domain}]");
                let stats = as_object(&field, stats)?;
                Ok(TopEntry {
                    domain: domain.clone(),
                    total: member_number(&field, stats, "total")?,
                    percent: member_number(&field, stats, "pcnt")?,
                })
            })
            .collect()
    }

    /// Top blocked domains with the blocklist that matched them.
    pub fn top_blocked(&self) -> Result<Vec<TopBlockedEntry>, FieldError> {
        self.table("top_blocked")?
            .iter()
            .map(|(domain, stats)| {
                let field = format!("top_blocked[{domain}]");
                let stats = as_object(&field, stats)?;
                Ok(TopBlockedEntry {
                    domain: domain.clone(),
                    blocklist: blocklist_name(stats),
                    total: member_number(&field, stats, "total")?,
                    percent: member_number(&field, stats, "pcnt")?,
                })
            })
            .collect()
    }

    fn number(&self, field: &str) -> Result<f64, FieldError> {
        match self.document.get(field) {
            Some(value) => as_number(field, value),
            None => Ok(0.0),
        }
    }

    fn table(&self, field: &str) -> Result<Map<String, Value>, FieldError> {
        match self.document.get(field) {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(entries)) => Ok(entries.clone()),
            // PHP encodes an empty associative array as `[]`.
            Some(Value::Array(items)) if items.is_empty() => Ok(Map::new()),
            Some(other) => Err(FieldError::new(
                field,
                format!("expected an object keyed by domain, got {}", json_type(other)),
            )),
        }
    }
}

fn as_object<'a>(field: &str, value: &'a Value) -> Result<&'a Map<String, Value>, FieldError> {
    value.as_object().ok_or_else(|| {
        FieldError::new(
            field,
            format!("expected an object, got {}", json_type(value)),
        )
    })
}

fn member_number(field: &str, members: &Map<String, Value>, key: &str) -> Result<f64, FieldError> {
    match members.get(key) {
        Some(value) => as_number(&format!("{field}.{key}"), value),
        None => Ok(0.0),
    }
}

fn as_number(field: &str, value: &Value) -> Result<f64, FieldError> {
    match value {
        Value::Null => Ok(0.0),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| FieldError::new(field, format!("number {n} is not representable"))),
        Value::String(s) if s.trim().is_empty() => Ok(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| FieldError::new(field, format!("'{s}' is not a number"))),
        other => Err(FieldError::new(
            field,
            format!("expected a number, got {}", json_type(other)),
        )),
    }
}

fn blocklist_name(stats: &Map<String, Value>) -> String {
    match stats.get("blocklist") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => UNKNOWN_BLOCKLIST.to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
