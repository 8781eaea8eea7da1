use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A device-reported value after coercion. Every read site matches on
/// this instead of re-deriving "string, number or missing" on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypedValue {
    Numeric(f64),
    Text(String),
    Absent,
}

impl TypedValue {
    /// Coerce a raw gateway value. Numbers and numeric strings become
    /// `Numeric`, booleans 0/1, non-empty non-numeric strings stay as
    /// opaque `Text`, everything else is `Absent`. Never fails: the long
    /// tail of codes has no full type metadata, so degrading gracefully
    /// is the contract.
    pub fn coerce(raw: Option<&Value>) -> Self {
        match raw {
            None | Some(Value::Null) => TypedValue::Absent,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) => TypedValue::Numeric(f),
                None => TypedValue::Absent,
            },
            Some(Value::Bool(b)) => TypedValue::Numeric(if *b { 1.0 } else { 0.0 }),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    TypedValue::Absent
                } else if let Ok(f) = trimmed.parse::<f64>() {
                    TypedValue::Numeric(f)
                } else {
                    TypedValue::Text(s.clone())
                }
            }
            Some(_) => TypedValue::Absent,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Numeric(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, TypedValue::Absent)
    }
}

/// Coerce a raw value to a bare float, for range endpoints.
pub(crate) fn coerce_f64(raw: Option<&Value>) -> Option<f64> {
    TypedValue::coerce(raw).as_f64()
}
