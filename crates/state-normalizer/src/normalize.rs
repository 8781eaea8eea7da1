//! Per-device, per-poll state map production.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use time::OffsetDateTime;

use crate::error::Result;
use crate::table::TypeTable;
use crate::value::{coerce_f64, TypedValue};

/// One (code, value, optional live range) triple as the gateway reports
/// it. Values and range endpoints arrive as strings or numbers, per the
/// wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reported {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(
        default,
        rename = "rangeStart",
        skip_serializing_if = "Option::is_none"
    )]
    pub range_start: Option<Value>,
    #[serde(default, rename = "rangeEnd", skip_serializing_if = "Option::is_none")]
    pub range_end: Option<Value>,
}

/// Typed state for one code: the coerced value plus the live bounds the
/// device firmware reported at poll time. Live bounds take precedence
/// over the static catalog bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub value: TypedValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_max: Option<f64>,
}

/// The state of one device for one poll cycle. Created fresh each poll
/// and fully replaces its predecessor; never merged incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceStateMap {
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    pub entries: BTreeMap<String, StateEntry>,
}

impl DeviceStateMap {
    pub fn value_of(&self, code: &str) -> Option<&TypedValue> {
        self.entries.get(code).map(|e| &e.value)
    }

    pub fn range_of(&self, code: &str) -> Option<(f64, f64)> {
        let entry = self.entries.get(code)?;
        match (entry.range_min, entry.range_max) {
            (Some(lo), Some(hi)) => Some((lo, hi)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turn one poll batch into a typed state map. Infallible: values that
/// will not coerce stay as opaque text, missing values become `Absent`,
/// and codes missing from a partial batch are simply absent from the map.
pub fn normalize(device_id: &str, reported: &[Reported], table: &TypeTable) -> DeviceStateMap {
    let mut entries = BTreeMap::new();

    for item in reported {
        let mut value = TypedValue::coerce(item.value.as_ref());
        if let TypedValue::Numeric(n) = value {
            let divisor = table.divisor_for(&item.code);
            if divisor != 1.0 {
                value = TypedValue::Numeric(n / divisor);
            }
        }

        let range_min = coerce_f64(item.range_start.as_ref());
        let range_max = coerce_f64(item.range_end.as_ref());
        // Live bounds only count when both ends are usable.
        let (range_min, range_max) = match (range_min, range_max) {
            (Some(lo), Some(hi)) => (Some(lo), Some(hi)),
            _ => (None, None),
        };

        if value.is_absent() && range_min.is_none() {
            tracing::debug!(device = device_id, code = %item.code, "empty report");
        }

        entries.insert(
            item.code.clone(),
            StateEntry {
                value,
                range_min,
                range_max,
            },
        );
    }

    DeviceStateMap {
        device_id: device_id.to_string(),
        ts: OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .ok(),
        entries,
    }
}

/// Wrap [`normalize`] with the gateway failure policy: a wholesale fetch
/// failure is propagated unchanged and no state map is produced for the
/// cycle. Retry and backoff belong to the refresh driver, not here.
pub fn normalize_poll(
    device_id: &str,
    outcome: Result<Vec<Reported>>,
    table: &TypeTable,
) -> Result<DeviceStateMap> {
    match outcome {
        Ok(reported) => Ok(normalize(device_id, &reported, table)),
        Err(err) => {
            tracing::warn!(device = device_id, %err, "poll failed, keeping last known state");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use serde_json::json;

    fn triple(code: &str, value: Value) -> Reported {
        Reported {
            code: code.to_string(),
            value: Some(value),
            range_start: None,
            range_end: None,
        }
    }

    #[test]
    fn numeric_value_with_live_range() {
        let reported = vec![Reported {
            code: "T01".into(),
            value: Some(json!("27.0")),
            range_start: Some(json!("0")),
            range_end: Some(json!("70")),
        }];
        let map = normalize("ABC123", &reported, &TypeTable::builtin());
        assert_eq!(map.value_of("T01"), Some(&TypedValue::Numeric(27.0)));
        assert_eq!(map.range_of("T01"), Some((0.0, 70.0)));
        assert!(map.ts.is_some());
    }

    #[test]
    fn unregistered_code_with_text_value() {
        let reported = vec![triple("ZZ99", json!("abc"))];
        let map = normalize("ABC123", &reported, &TypeTable::builtin());
        assert_eq!(map.value_of("ZZ99"), Some(&TypedValue::Text("abc".into())));
        assert_eq!(map.range_of("ZZ99"), None);
    }

    #[test]
    fn half_open_live_range_is_dropped() {
        let reported = vec![Reported {
            code: "R01".into(),
            value: Some(json!(50)),
            range_start: Some(json!("20")),
            range_end: Some(json!("n/a")),
        }];
        let map = normalize("ABC123", &reported, &TypeTable::builtin());
        assert_eq!(map.range_of("R01"), None);
        let entry = map.entries.get("R01");
        assert_eq!(entry.and_then(|e| e.range_min), None);
    }

    #[test]
    fn missing_value_is_absent() {
        let reported = vec![Reported {
            code: "T05".into(),
            value: None,
            range_start: None,
            range_end: None,
        }];
        let map = normalize("ABC123", &reported, &TypeTable::builtin());
        assert_eq!(map.value_of("T05"), Some(&TypedValue::Absent));
    }

    #[test]
    fn divisor_applies_to_raw_encoded_codes() {
        let mut table = TypeTable::builtin();
        table.insert("X01", param_registry::DataType::Digi9, 100.0);
        let reported = vec![triple("X01", json!(431)), triple("T01", json!("27.0"))];
        let map = normalize("ABC123", &reported, &table);
        assert_eq!(map.value_of("X01"), Some(&TypedValue::Numeric(4.31)));
        // Pre-scaled codes pass through untouched.
        assert_eq!(map.value_of("T01"), Some(&TypedValue::Numeric(27.0)));
    }

    #[test]
    fn each_poll_fully_replaces_state() {
        let table = TypeTable::builtin();
        let first = normalize("ABC123", &[triple("T01", json!(20)), triple("T02", json!(25))], &table);
        assert_eq!(first.len(), 2);
        let second = normalize("ABC123", &[triple("T01", json!(21))], &table);
        assert_eq!(second.len(), 1);
        assert_eq!(second.value_of("T02"), None);
    }

    #[test]
    fn duplicate_code_in_batch_later_wins() {
        let map = normalize(
            "ABC123",
            &[triple("T01", json!(20)), triple("T01", json!(22))],
            &TypeTable::builtin(),
        );
        assert_eq!(map.value_of("T01"), Some(&TypedValue::Numeric(22.0)));
    }

    #[test]
    fn gateway_failure_passes_through() {
        let outcome = normalize_poll(
            "ABC123",
            Err(GatewayError::Connection("timed out".into())),
            &TypeTable::builtin(),
        );
        assert!(matches!(outcome, Err(GatewayError::Connection(_))));
    }

    #[test]
    fn wire_shape_deserializes() {
        let batch: Result<Vec<Reported>, _> = serde_json::from_str(
            r#"[{"code":"T01","value":"27.0","rangeStart":"0","rangeEnd":"70"},
                {"code":"ZZ99","value":"abc"}]"#,
        );
        assert!(batch.is_ok());
        if let Ok(batch) = batch {
            let map = normalize("ABC123", &batch, &TypeTable::builtin());
            assert_eq!(map.value_of("T01"), Some(&TypedValue::Numeric(27.0)));
            assert_eq!(map.range_of("T01"), Some((0.0, 70.0)));
            assert_eq!(map.value_of("ZZ99"), Some(&TypedValue::Text("abc".into())));
        }
    }
}
