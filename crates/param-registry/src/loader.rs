//! Register-table loader.
//!
//! The table is the fixed-shape description shipped with the device
//! firmware: one row per addressable register, comma-separated, with a
//! `#`-comment preamble and a header row. Only this shape is supported.

use anyhow::Context;
use std::fs;
use std::path::Path;

use crate::types::{AccessMode, DataType, RegisterEntry};

/// Column layout of a table row. Column 3 (the raw Modbus register kind)
/// is carried by the table but not used here.
const COL_ADDRESS: usize = 0;
const COL_NAME: usize = 1;
const COL_CODE: usize = 2;
const COL_MODE: usize = 4;
const COL_DESCRIPTION: usize = 5;
const COL_DATA_TYPE: usize = 6;
const COL_RANGE: usize = 7;
const MIN_COLUMNS: usize = 8;

pub fn load_table_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<RegisterEntry>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading register table: {}", path.display()))?;
    Ok(parse_table(&raw))
}

/// Parse the table text into register entries, in row order. Structurally
/// unusable rows (short, non-numeric address, unknown data-type tag,
/// factory test rows) are skipped with a warning; they are not errors.
pub fn parse_table(text: &str) -> Vec<RegisterEntry> {
    let mut entries = Vec::new();
    let mut header_seen = false;

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }

        let fields = split_row(line);
        if fields.len() < MIN_COLUMNS {
            tracing::warn!(line = lineno + 1, "short row, skipping");
            continue;
        }

        let address: u32 = match fields[COL_ADDRESS].trim().parse() {
            Ok(a) => a,
            Err(_) => {
                tracing::warn!(line = lineno + 1, "non-numeric address, skipping");
                continue;
            }
        };
        let name = fields[COL_NAME].trim();
        if name.starts_with("test") {
            tracing::debug!(line = lineno + 1, "factory test row, skipping");
            continue;
        }
        let data_type = match DataType::from_label(&fields[COL_DATA_TYPE]) {
            Some(dt) => dt,
            None => {
                tracing::warn!(
                    line = lineno + 1,
                    tag = %fields[COL_DATA_TYPE].trim(),
                    "unknown data-type tag, skipping"
                );
                continue;
            }
        };

        entries.push(RegisterEntry {
            address,
            name: name.to_string(),
            code: fields[COL_CODE].trim().to_string(),
            access: AccessMode::from_label(&fields[COL_MODE]),
            description: fields[COL_DESCRIPTION].trim().to_string(),
            data_type,
            raw_range: fields[COL_RANGE].trim().to_string(),
        });
    }

    tracing::info!(rows = entries.len(), "register table parsed");
    entries
}

/// Split one row on commas, honoring double-quoted fields (descriptions
/// may contain commas) and `""` escapes inside them. Not a general CSV
/// parser.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
