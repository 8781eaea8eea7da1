//! Unit and step inference for catalog entries.
//!
//! Both functions are pure: display unit from name keywords plus any unit
//! glyphs left in the raw range, step from the data type and range span.

use crate::types::DataType;

/// Derive a display unit. First match wins, in a fixed priority order.
/// Returns an empty string when nothing matches.
pub fn infer_unit(name: &str, raw_range: &str) -> &'static str {
    let name = name.to_lowercase();
    let range = raw_range.to_lowercase();

    if name.contains("temp") || range.contains("°c") || raw_range.contains('℃') {
        "°C"
    } else if name.contains("pressure") || range.contains("bar") {
        "bar"
    } else if name.contains("current") {
        "A"
    } else if name.contains("voltage") {
        "V"
    } else if name.contains("frequency") || name.contains("freq") {
        "Hz"
    } else if name.contains("speed") && name.contains("fan") {
        "rpm"
    } else if name.contains("time") || name.contains("duration") || range.contains("min") {
        "min"
    } else if range.contains("days") {
        "days"
    } else if name.contains("hour") {
        "h"
    } else if name.contains("power") && name.contains("kw") {
        "kW"
    } else if name.contains("flow") {
        "L/min"
    } else if range.contains('%') || name.contains("ratio") {
        "%"
    } else if name.contains("steps") {
        "steps"
    } else {
        ""
    }
}

/// Derive the adjustment step. Temperature registers always step by half a
/// degree; the 0.1-resolution DIGI types by a tenth; everything else by a
/// granularity chosen from the range span.
pub fn infer_step(data_type: DataType, bounds: Option<(f64, f64)>) -> f64 {
    match data_type {
        DataType::Temp => 0.5,
        DataType::Digi5 | DataType::Digi9 => 0.1,
        _ => match bounds {
            Some((min, max)) => {
                let span = max - min;
                if span <= 10.0 {
                    1.0
                } else if span <= 100.0 {
                    5.0
                } else {
                    10.0
                }
            }
            None => 1.0,
        },
    }
}
