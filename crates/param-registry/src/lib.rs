//! param-registry: typed parameter catalogs for heat-pump protocol codes
//!
//! Ingests the flat register table a device ships (address, name, code,
//! access mode, description, data-type tag, raw range text) and produces
//! four immutable code-keyed catalogs: continuous writable values,
//! read-only sensors, binary switches and enumerated selects. Built once
//! at startup and shared read-only afterwards.

mod types;
pub use types::*;

mod range;
pub use range::interpret;

mod infer;
pub use infer::{infer_step, infer_unit};

mod classify;
pub use classify::{classify, is_excluded_code};

mod registry;
pub use registry::{build, build_counted, BuildStats, ParamRegistry};

mod loader;
pub use loader::{load_table_file, parse_table};

mod labels;
pub use labels::LabelTable;

mod metrics;
pub use metrics::{MetricsHub, RegistryMetrics};
