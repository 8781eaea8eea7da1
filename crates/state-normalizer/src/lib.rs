//! state-normalizer: typed per-device state from raw gateway reports
//!
//! Each poll cycle the device gateway returns a batch of (code, value,
//! optional live range) triples. This crate coerces them into typed,
//! unit-scaled state maps, one per device per cycle. Normalization never
//! fails; only a wholesale gateway failure is passed upward, unchanged.

mod value;
pub use value::TypedValue;

mod table;
pub use table::{TypeEntry, TypeTable};

mod normalize;
pub use normalize::{normalize, normalize_poll, DeviceStateMap, Reported, StateEntry};

mod error;
pub use error::{GatewayError, Result};
