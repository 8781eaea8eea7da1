//! Localized display names for protocol codes.
//!
//! Two declarative assets replace the per-platform name tables the device
//! vendor ships: one keyed by (code, locale) for parameter names, one keyed
//! by (code, option value, locale) for select-option labels. Loaded once;
//! lookups fall back to English and then to the catalog text the caller
//! already has.

use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const BUILTIN_LABELS: &str = include_str!("../assets/labels.yaml");
const BUILTIN_OPTION_LABELS: &str = include_str!("../assets/option_labels.yaml");

type LocaleMap = BTreeMap<String, String>;

#[derive(Debug, Default, Clone)]
pub struct LabelTable {
    // code -> locale tag -> display name
    labels: BTreeMap<String, LocaleMap>,
    // code -> option value -> locale tag -> option label
    options: BTreeMap<String, BTreeMap<String, LocaleMap>>,
}

impl LabelTable {
    /// The embedded assets. Falls back to an empty table if an asset is
    /// malformed, which only loses display names, never data.
    pub fn builtin() -> Self {
        let mut table = match Self::from_yaml(BUILTIN_LABELS) {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(%err, "builtin label asset unreadable");
                Self::default()
            }
        };
        if let Err(err) = table.merge_option_yaml(BUILTIN_OPTION_LABELS) {
            tracing::warn!(%err, "builtin option label asset unreadable");
        }
        table
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let labels: BTreeMap<String, LocaleMap> =
            serde_yaml::from_str(text).context("parsing label asset")?;
        Ok(Self {
            labels,
            options: BTreeMap::new(),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading label asset: {}", path.display()))?;
        Self::from_yaml(&raw)
    }

    /// Adds option labels from a (code, value, locale) keyed document,
    /// replacing any existing entries for the codes it names.
    pub fn merge_option_yaml(&mut self, text: &str) -> anyhow::Result<()> {
        let options: BTreeMap<String, BTreeMap<String, LocaleMap>> =
            serde_yaml::from_str(text).context("parsing option label asset")?;
        self.options.extend(options);
        Ok(())
    }

    /// Display name for a code in the requested locale, falling back to
    /// English. `None` means the caller should use the catalog name.
    pub fn label(&self, code: &str, locale: &str) -> Option<&str> {
        let per_code = self.labels.get(code)?;
        per_code
            .get(locale)
            .or_else(|| per_code.get("en"))
            .map(String::as_str)
    }

    /// Label for one option value of a select code, falling back to
    /// English. `None` means the caller should use the label parsed from
    /// the register description.
    pub fn option_label(&self, code: &str, value: &str, locale: &str) -> Option<&str> {
        let per_value = self.options.get(code)?.get(value)?;
        per_value
            .get(locale)
            .or_else(|| per_value.get("en"))
            .map(String::as_str)
    }

    pub fn locales(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .labels
            .values()
            .flat_map(|m| m.keys().map(String::as_str))
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
