//! Four-way classification of registers into catalogs.

use crate::types::{AccessMode, Category, DataType};

/// Codes that never enter any catalog: blank, placeholder, purely numeric
/// (unnamed registers like `1014`), or factory test entries.
pub fn is_excluded_code(code: &str) -> bool {
    let code = code.trim();
    if code.is_empty() || code == "-" || code == "--" {
        return true;
    }
    if code.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    code.starts_with("test")
}

/// Marker in a register description meaning "value 0 is the off state".
/// ENUM registers carrying it are binary toggles despite the tag.
fn has_off_marker(description: &str) -> bool {
    description.contains("0-【NO】") || description.contains("0-NO")
}

/// Assign a register to exactly one catalog. Total and deterministic over
/// entries that survive [`is_excluded_code`].
pub fn classify(
    access: AccessMode,
    data_type: DataType,
    description: &str,
    raw_range: &str,
) -> Category {
    match access {
        AccessMode::ReadOnly => Category::Sensor,
        AccessMode::ReadWrite => match data_type {
            DataType::Binary => Category::Switch,
            DataType::Enum => {
                if has_off_marker(description) || raw_range.trim() == "0~1" {
                    Category::Switch
                } else {
                    Category::Select
                }
            }
            _ => Category::Writable,
        },
    }
}
