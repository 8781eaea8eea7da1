//! Fixed code -> (data type, divisor) table.
//!
//! Independent of the parameter registry: the gateway already returns
//! pre-scaled decimal values for every known code, so the builtin table
//! carries divisor 1 throughout. The divisor path exists as a defensive
//! secondary scaling step for codes where a raw integer encoding might
//! leak through; such a code would be tabled with its
//! [`DataType::divisor`] instead.

use param_registry::DataType;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeEntry {
    pub data_type: DataType,
    pub divisor: f64,
}

#[derive(Debug, Default, Clone)]
pub struct TypeTable {
    entries: BTreeMap<String, TypeEntry>,
}

/// Known protocol codes, per the device register table.
const BUILTIN: &[(&str, DataType)] = &[
    // Temperature sensors
    ("T01", DataType::Temp),
    ("T02", DataType::Temp),
    ("T03", DataType::Temp),
    ("T04", DataType::Temp),
    ("T05", DataType::Temp),
    ("T06", DataType::Temp),
    ("T07", DataType::Temp),
    ("T08", DataType::Temp),
    ("T09", DataType::Temp),
    ("T10", DataType::Temp),
    ("T11", DataType::Temp),
    ("T12", DataType::Temp),
    ("T14", DataType::Temp),
    ("T33", DataType::Temp),
    ("T38", DataType::Temp),
    ("T49", DataType::Temp),
    ("T50", DataType::Temp),
    ("T51", DataType::Temp),
    ("T55", DataType::Temp),
    // Setpoints
    ("R01", DataType::Temp),
    ("R02", DataType::Temp),
    ("R03", DataType::Temp),
    ("R04", DataType::Temp),
    ("R05", DataType::Temp),
    ("R06", DataType::Temp),
    ("R07", DataType::Temp),
    ("R08", DataType::Temp),
    ("R09", DataType::Temp),
    ("R10", DataType::Temp),
    ("R11", DataType::Temp),
    ("R16", DataType::Temp),
    ("R17", DataType::Temp),
    ("R36", DataType::Temp),
    ("R37", DataType::Temp),
    ("R70", DataType::Temp),
    // Pressure and currents (0.1 resolution on the wire)
    ("T15", DataType::Digi5),
    ("T35", DataType::Digi5),
    ("T36", DataType::Digi5),
    // Voltages
    ("T34", DataType::Digi1),
    ("T37", DataType::Digi1),
    // Compressor frequencies
    ("T30", DataType::Digi1),
    ("T31", DataType::Digi1),
    ("T32", DataType::Digi1),
    // Fan speeds
    ("T27", DataType::Digi1),
    ("T28", DataType::Digi1),
    ("T29", DataType::Digi1),
    // Water flow (0.01 L/min on the wire)
    ("T39", DataType::Digi9),
    // Energy block
    ("Power In(Total)", DataType::Digi5),
    ("Capacity Out(Total)", DataType::Digi5),
    ("COP/EER(Total)", DataType::Digi9),
    ("Comsuption Power", DataType::Digi1),
    // Outdoor-unit power and energy meters
    ("Power In(ODU)", DataType::Digi5),
    ("Capacity Out(ODU)", DataType::Digi5),
    ("Heating Con.(ODU)", DataType::Digi1),
    ("Heating Gen.(ODU)", DataType::Digi1),
    ("Cooling Con.(ODU)", DataType::Digi1),
    ("Cooling Gen.(ODU)", DataType::Digi1),
    ("DHW Con.(ODU)", DataType::Digi1),
    ("DHW Gen.(ODU)", DataType::Digi1),
    // Zone and indoor climate
    ("Zone 1 Room Temp", DataType::Temp),
    ("Zone 2 Room Temp", DataType::Temp),
    ("Zone 2 Mixing Temp", DataType::Temp),
    ("Zone 2 Mixing Valve", DataType::Digi1),
    ("DP4", DataType::Temp),
    ("DP5", DataType::Temp),
    ("DP6", DataType::Temp),
    // Discrete states
    ("Power", DataType::Enum),
    ("Mode", DataType::Enum),
    ("ModeState", DataType::Enum),
    ("Power State", DataType::Enum),
    ("H01", DataType::Enum),
    ("H05", DataType::Enum),
    ("H07", DataType::Enum),
    ("H18", DataType::Enum),
    ("H20", DataType::Enum),
    ("H21", DataType::Enum),
    ("H22", DataType::Enum),
    ("H25", DataType::Enum),
    ("H27", DataType::Enum),
    ("H28", DataType::Enum),
    ("H30", DataType::Enum),
    ("H31", DataType::Enum),
    ("A11", DataType::Enum),
    ("A29", DataType::Enum),
    ("F01", DataType::Enum),
    ("F10", DataType::Enum),
    ("F22", DataType::Enum),
    ("G05", DataType::Enum),
    ("Z01", DataType::Enum),
];

impl TypeTable {
    /// The fixed table for the known protocol codes. Divisor 1 everywhere:
    /// the gateway pre-scales.
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for (code, data_type) in BUILTIN {
            table.insert(code, *data_type, 1.0);
        }
        table
    }

    pub fn insert(&mut self, code: &str, data_type: DataType, divisor: f64) {
        self.entries.insert(
            code.to_string(),
            TypeEntry {
                data_type,
                divisor,
            },
        );
    }

    pub fn get(&self, code: &str) -> Option<&TypeEntry> {
        self.entries.get(code)
    }

    pub fn data_type_of(&self, code: &str) -> Option<DataType> {
        self.entries.get(code).map(|e| e.data_type)
    }

    /// Divisor applied to numeric values for this code. Unknown codes
    /// pass through unscaled.
    pub fn divisor_for(&self, code: &str) -> f64 {
        self.entries.get(code).map(|e| e.divisor).unwrap_or(1.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_codes_present() {
        let table = TypeTable::builtin();
        assert_eq!(table.data_type_of("T01"), Some(DataType::Temp));
        assert_eq!(table.data_type_of("T39"), Some(DataType::Digi9));
        assert_eq!(table.data_type_of("Mode"), Some(DataType::Enum));
        assert_eq!(table.data_type_of("ZZ99"), None);
    }

    #[test]
    fn outdoor_unit_zone_and_climate_codes_present() {
        let table = TypeTable::builtin();
        assert_eq!(table.data_type_of("Power In(ODU)"), Some(DataType::Digi5));
        assert_eq!(table.data_type_of("Capacity Out(ODU)"), Some(DataType::Digi5));
        assert_eq!(table.data_type_of("Heating Con.(ODU)"), Some(DataType::Digi1));
        assert_eq!(table.data_type_of("DHW Gen.(ODU)"), Some(DataType::Digi1));
        assert_eq!(table.data_type_of("Zone 1 Room Temp"), Some(DataType::Temp));
        assert_eq!(table.data_type_of("Zone 2 Mixing Valve"), Some(DataType::Digi1));
        assert_eq!(table.data_type_of("DP4"), Some(DataType::Temp));
        assert_eq!(table.data_type_of("DP6"), Some(DataType::Temp));
        assert_eq!(table.divisor_for("Power In(ODU)"), 1.0);
    }

    #[test]
    fn builtin_divisors_are_identity() {
        let table = TypeTable::builtin();
        assert_eq!(table.divisor_for("T15"), 1.0);
        assert_eq!(table.divisor_for("ZZ99"), 1.0);
    }

    #[test]
    fn custom_raw_encoding_entry() {
        let mut table = TypeTable::builtin();
        table.insert("X01", DataType::Digi6, DataType::Digi6.divisor());
        assert_eq!(table.divisor_for("X01"), 1000.0);
    }
}
