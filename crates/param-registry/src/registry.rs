//! Registry builder and the frozen four-catalog registry.

use std::collections::BTreeMap;

use crate::classify::{classify, is_excluded_code};
use crate::infer::{infer_step, infer_unit};
use crate::range::interpret;
use crate::types::{
    Category, RegisterEntry, SelectOption, SelectSpec, SensorSpec, SwitchSpec, WritableSpec,
};

/// Fallback bounds for writable registers whose raw range is unresolvable.
const DEFAULT_WRITABLE_BOUNDS: (f64, f64) = (0.0, 100.0);

/// Immutable code-keyed catalogs. Built once from the register table and
/// read-only afterwards; iteration is ordered by code.
#[derive(Debug, Default, Clone)]
pub struct ParamRegistry {
    writable: BTreeMap<String, WritableSpec>,
    sensor: BTreeMap<String, SensorSpec>,
    switch: BTreeMap<String, SwitchSpec>,
    select: BTreeMap<String, SelectSpec>,
}

impl ParamRegistry {
    pub fn writable(&self, code: &str) -> Option<&WritableSpec> {
        self.writable.get(code)
    }

    pub fn sensor(&self, code: &str) -> Option<&SensorSpec> {
        self.sensor.get(code)
    }

    pub fn switch(&self, code: &str) -> Option<&SwitchSpec> {
        self.switch.get(code)
    }

    pub fn select(&self, code: &str) -> Option<&SelectSpec> {
        self.select.get(code)
    }

    pub fn writables(&self) -> impl Iterator<Item = &WritableSpec> {
        self.writable.values()
    }

    pub fn sensors(&self) -> impl Iterator<Item = &SensorSpec> {
        self.sensor.values()
    }

    pub fn switches(&self) -> impl Iterator<Item = &SwitchSpec> {
        self.switch.values()
    }

    pub fn selects(&self) -> impl Iterator<Item = &SelectSpec> {
        self.select.values()
    }

    /// Which catalog a code landed in, if any. A code appears in at most
    /// one catalog.
    pub fn category_of(&self, code: &str) -> Option<Category> {
        if self.writable.contains_key(code) {
            Some(Category::Writable)
        } else if self.sensor.contains_key(code) {
            Some(Category::Sensor)
        } else if self.switch.contains_key(code) {
            Some(Category::Switch)
        } else if self.select.contains_key(code) {
            Some(Category::Select)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.writable.len() + self.sensor.len() + self.switch.len() + self.select.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Side counts from one build pass, for the metrics hub.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildStats {
    pub rows_excluded: u64,
    pub ranges_unresolved: u64,
}

/// Build the four catalogs in one pass over the register table.
///
/// Excluded codes are dropped before classification. Duplicate codes are
/// last-write-wins in input order; overwrites are logged at debug level
/// but not rejected (the table is machine-generated and trailing
/// revisions are intended to win).
pub fn build(entries: &[RegisterEntry]) -> ParamRegistry {
    build_counted(entries).0
}

pub fn build_counted(entries: &[RegisterEntry]) -> (ParamRegistry, BuildStats) {
    let mut reg = ParamRegistry::default();
    let mut stats = BuildStats::default();

    for entry in entries {
        if is_excluded_code(&entry.code) {
            tracing::debug!(code = %entry.code, "excluded code, dropping row");
            stats.rows_excluded += 1;
            continue;
        }

        // Catalog invariant: min <= max. An inverted raw range counts as
        // unresolved rather than entering a catalog backwards.
        let bounds = interpret(&entry.raw_range).filter(|(lo, hi)| lo <= hi);
        if bounds.is_none() {
            stats.ranges_unresolved += 1;
        }
        let unit = infer_unit(&entry.name, &entry.raw_range);
        let step = infer_step(entry.data_type, bounds);
        let category = classify(
            entry.access,
            entry.data_type,
            &entry.description,
            &entry.raw_range,
        );

        if reg.category_of(&entry.code).is_some() {
            tracing::debug!(code = %entry.code, "duplicate code, later row wins");
            reg.writable.remove(&entry.code);
            reg.sensor.remove(&entry.code);
            reg.switch.remove(&entry.code);
            reg.select.remove(&entry.code);
        }

        match category {
            Category::Writable => {
                let (min, max) = bounds.unwrap_or(DEFAULT_WRITABLE_BOUNDS);
                reg.writable.insert(
                    entry.code.clone(),
                    WritableSpec {
                        code: entry.code.clone(),
                        name: entry.name.clone(),
                        address: entry.address,
                        data_type: entry.data_type,
                        unit: unit.to_string(),
                        min,
                        max,
                        step,
                    },
                );
            }
            Category::Sensor => {
                reg.sensor.insert(
                    entry.code.clone(),
                    SensorSpec {
                        code: entry.code.clone(),
                        name: entry.name.clone(),
                        address: entry.address,
                        data_type: entry.data_type,
                        unit: unit.to_string(),
                        min: bounds.map(|(lo, _)| lo),
                        max: bounds.map(|(_, hi)| hi),
                    },
                );
            }
            Category::Switch => {
                reg.switch.insert(
                    entry.code.clone(),
                    SwitchSpec {
                        code: entry.code.clone(),
                        name: entry.name.clone(),
                        address: entry.address,
                        data_type: entry.data_type,
                    },
                );
            }
            Category::Select => {
                reg.select.insert(
                    entry.code.clone(),
                    SelectSpec {
                        code: entry.code.clone(),
                        name: entry.name.clone(),
                        address: entry.address,
                        data_type: entry.data_type,
                        options: parse_options(&entry.description),
                    },
                );
            }
        }
    }

    tracing::info!(
        writable = reg.writable.len(),
        sensor = reg.sensor.len(),
        switch = reg.switch.len(),
        select = reg.select.len(),
        "parameter registry built"
    );
    (reg, stats)
}

/// Extract `value -> label` pairs from an ENUM description like
/// `0-【Display】/1-【Remote】` or the unbracketed `0-Display/1-Remote`.
fn parse_options(description: &str) -> Vec<SelectOption> {
    let mut options = Vec::new();
    for segment in description.split('/') {
        let segment = segment.trim();
        let Some((value, label)) = segment.split_once('-') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let label = label
            .trim()
            .trim_start_matches('【')
            .trim_end_matches('】')
            .trim();
        if label.is_empty() {
            continue;
        }
        options.push(SelectOption {
            value: value.to_string(),
            label: label.to_string(),
        });
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccessMode, DataType};

    fn row(
        address: u32,
        name: &str,
        code: &str,
        access: AccessMode,
        description: &str,
        data_type: DataType,
        raw_range: &str,
    ) -> RegisterEntry {
        RegisterEntry {
            address,
            name: name.to_string(),
            code: code.to_string(),
            access,
            description: description.to_string(),
            data_type,
            raw_range: raw_range.to_string(),
        }
    }

    #[test]
    fn writable_temp_setpoint() {
        // DHW target: TEMP read-write with a plain range.
        let reg = build(&[row(
            1157,
            "DHW Target Temp",
            "R01",
            AccessMode::ReadWrite,
            "",
            DataType::Temp,
            "20~65",
        )]);
        let spec = reg.writable("R01").map(Clone::clone);
        assert!(spec.is_some());
        if let Some(spec) = spec {
            assert_eq!(spec.min, 20.0);
            assert_eq!(spec.max, 65.0);
            assert_eq!(spec.step, 0.5);
            assert_eq!(spec.unit, "°C");
            assert_eq!(spec.address, 1157);
        }
        assert_eq!(reg.category_of("R01"), Some(Category::Writable));
    }

    #[test]
    fn binary_semantics_enum_lands_in_switch() {
        let reg = build(&[row(
            1156,
            "Enable Disinfection",
            "G05",
            AccessMode::ReadWrite,
            "0-【NO】/1-【YES】",
            DataType::Enum,
            "0~1",
        )]);
        assert!(reg.switch("G05").is_some());
        assert!(reg.select("G05").is_none());
    }

    #[test]
    fn read_only_lands_in_sensor_with_optional_bounds() {
        let reg = build(&[
            row(
                2045,
                "Inlet Water Temp",
                "T01",
                AccessMode::ReadOnly,
                "",
                DataType::Temp,
                "-30~97℃",
            ),
            row(
                2069,
                "Low Pressure",
                "T15",
                AccessMode::ReadOnly,
                "",
                DataType::Digi5,
                "--",
            ),
        ]);
        assert_eq!(reg.sensor("T01").and_then(|s| s.min), Some(-30.0));
        assert_eq!(reg.sensor("T01").and_then(|s| s.max), Some(97.0));
        assert_eq!(reg.sensor("T15").and_then(|s| s.min), None);
        assert_eq!(reg.sensor("T15").map(|s| s.unit.as_str()), Some("bar"));
    }

    #[test]
    fn writable_without_range_gets_fallback_bounds() {
        let reg = build(&[row(
            1018,
            "Pump Output",
            "P10",
            AccessMode::ReadWrite,
            "",
            DataType::Digi1,
            "$1053$~100",
        )]);
        assert_eq!(reg.writable("P10").map(|s| (s.min, s.max)), Some((0.0, 100.0)));
    }

    #[test]
    fn inverted_range_counts_as_unresolved() {
        let reg = build(&[row(
            1060,
            "CT Stop Single Fan Cooling",
            "F29",
            AccessMode::ReadWrite,
            "",
            DataType::Digi1,
            "60~-30",
        )]);
        // Falls back to the default bounds instead of entering backwards.
        assert_eq!(reg.writable("F29").map(|s| (s.min, s.max)), Some((0.0, 100.0)));
    }

    #[test]
    fn select_options_from_description() {
        let reg = build(&[row(
            1025,
            "Control Mode",
            "H07",
            AccessMode::ReadWrite,
            "0-【Display】/1-【Remote】",
            DataType::Enum,
            "0~1s",
        )]);
        // Range "0~1s" is not the literal two-value span, so it stays Select.
        let options = reg.select("H07").map(|s| s.options.clone());
        assert_eq!(
            options,
            Some(vec![
                SelectOption {
                    value: "0".into(),
                    label: "Display".into()
                },
                SelectOption {
                    value: "1".into(),
                    label: "Remote".into()
                },
            ])
        );
    }

    #[test]
    fn excluded_codes_never_enter_catalogs() {
        let reg = build(&[
            row(
                1014,
                "Reserved",
                "1014",
                AccessMode::ReadWrite,
                "",
                DataType::Digi1,
                "0~100",
            ),
            row(
                1015,
                "Factory Test",
                "test01",
                AccessMode::ReadWrite,
                "",
                DataType::Digi1,
                "0~100",
            ),
            row(
                1016,
                "Blank",
                "--",
                AccessMode::ReadOnly,
                "",
                DataType::Temp,
                "--",
            ),
        ]);
        assert!(reg.is_empty());
    }

    #[test]
    fn duplicate_code_later_row_wins() {
        // Scenario: two rows share H18 with different names. The registry
        // must hold a single entry matching the second row; changing this
        // policy should break this test on purpose.
        let rows = [
            row(
                1035,
                "Electric Heater Stage",
                "H18",
                AccessMode::ReadWrite,
                "",
                DataType::Digi1,
                "1~3",
            ),
            row(
                1036,
                "E-Heater Stage (revised)",
                "H18",
                AccessMode::ReadWrite,
                "",
                DataType::Digi1,
                "1~3",
            ),
        ];
        let reg = build(&rows);
        assert_eq!(reg.len(), 1);
        assert_eq!(
            reg.writable("H18").map(|s| s.name.as_str()),
            Some("E-Heater Stage (revised)")
        );
        assert_eq!(reg.writable("H18").map(|s| s.address), Some(1036));
    }

    #[test]
    fn duplicate_code_across_categories_stays_exclusive() {
        // A later row can move a code to another catalog; the old entry
        // must not linger.
        let rows = [
            row(
                1040,
                "Silent Mode",
                "H22",
                AccessMode::ReadWrite,
                "",
                DataType::Digi1,
                "0~2",
            ),
            row(
                1041,
                "Silent Mode",
                "H22",
                AccessMode::ReadWrite,
                "0-【NO】/1-【YES】",
                DataType::Enum,
                "0~1",
            ),
        ];
        let reg = build(&rows);
        assert_eq!(reg.len(), 1);
        assert!(reg.writable("H22").is_none());
        assert_eq!(reg.category_of("H22"), Some(Category::Switch));
    }

    #[test]
    fn building_twice_is_idempotent() {
        let rows = [
            row(
                1157,
                "DHW Target Temp",
                "R01",
                AccessMode::ReadWrite,
                "",
                DataType::Temp,
                "20~65",
            ),
            row(
                2045,
                "Inlet Water Temp",
                "T01",
                AccessMode::ReadOnly,
                "",
                DataType::Temp,
                "-30~97℃",
            ),
            row(
                1156,
                "Enable Disinfection",
                "G05",
                AccessMode::ReadWrite,
                "0-【NO】/1-【YES】",
                DataType::Enum,
                "0~1",
            ),
        ];
        let a = build(&rows);
        let b = build(&rows);
        assert_eq!(a.len(), b.len());
        let first: Vec<_> = a.writables().collect();
        let second: Vec<_> = b.writables().collect();
        assert_eq!(first, second);
        let first: Vec<_> = a.sensors().collect();
        let second: Vec<_> = b.sensors().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn option_parsing_edge_cases() {
        assert!(parse_options("").is_empty());
        assert!(parse_options("free text with no markers").is_empty());
        let opts = parse_options("0-NO/1-YES");
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[1].label, "YES");
    }
}
