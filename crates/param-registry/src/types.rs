use serde::{Deserialize, Serialize};

/// Access mode of a register, as declared in the register table.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

impl AccessMode {
    /// Map the table's mode label. Anything that is not an explicit
    /// read-write marker is treated as read-only.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Read-write" | "R/W" | "RW" => AccessMode::ReadWrite,
            _ => AccessMode::ReadOnly,
        }
    }
}

/// Raw encoding tag of a register. The DIGIn tags differ only in their
/// canonical divisor; ENUM and BINARY are discrete.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Temp,
    Digi1,
    Digi2,
    Digi3,
    Digi5,
    Digi6,
    Digi9,
    Enum,
    Binary,
}

impl DataType {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "TEMP" => Some(DataType::Temp),
            "DIGI1" => Some(DataType::Digi1),
            "DIGI2" => Some(DataType::Digi2),
            "DIGI3" => Some(DataType::Digi3),
            "DIGI5" => Some(DataType::Digi5),
            "DIGI6" => Some(DataType::Digi6),
            "DIGI9" => Some(DataType::Digi9),
            "ENUM" => Some(DataType::Enum),
            "BINARY" => Some(DataType::Binary),
            _ => None,
        }
    }

    /// Canonical divisor for the raw Modbus encoding of this type. The
    /// cloud gateway already returns pre-scaled decimals, so this is only
    /// used when a raw integer encoding leaks through (see the type table
    /// in the state-normalizer crate).
    pub fn divisor(&self) -> f64 {
        match self {
            DataType::Temp => 10.0,
            DataType::Digi1 => 1.0,
            DataType::Digi2 => 10.0,
            DataType::Digi3 => 100.0,
            DataType::Digi5 => 10.0,
            DataType::Digi6 => 1000.0,
            DataType::Digi9 => 100.0,
            DataType::Enum => 1.0,
            DataType::Binary => 1.0,
        }
    }
}

/// One row of the register table, after structural validation by the
/// loader and before classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterEntry {
    pub address: u32,
    pub name: String,
    pub code: String,
    pub access: AccessMode,
    pub description: String,
    pub data_type: DataType,
    pub raw_range: String,
}

/// The four catalogs a register can land in. Classification is total and
/// exclusive: every surviving entry gets exactly one category.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Writable,
    Sensor,
    Switch,
    Select,
}

/// A continuous read-write value. Bounds and step are always concrete:
/// rows without a resolvable range get the 0..100 fallback at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritableSpec {
    pub code: String,
    pub name: String,
    pub address: u32,
    pub data_type: DataType,
    pub unit: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// A read-only measurement. Bounds are advisory and may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSpec {
    pub code: String,
    pub name: String,
    pub address: u32,
    pub data_type: DataType,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// A binary on/off toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchSpec {
    pub code: String,
    pub name: String,
    pub address: u32,
    pub data_type: DataType,
}

/// One option of an enumerated choice: the wire value and its label as
/// extracted from the register description.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// An enumerated multi-option choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectSpec {
    pub code: String,
    pub name: String,
    pub address: u32,
    pub data_type: DataType,
    pub options: Vec<SelectOption>,
}
