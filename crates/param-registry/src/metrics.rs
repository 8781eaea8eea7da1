use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

use crate::registry::build_counted;
use crate::types::RegisterEntry;
use crate::ParamRegistry;

#[derive(Clone)]
pub struct RegistryMetrics {
    pub writable_params: IntGauge,
    pub sensor_params: IntGauge,
    pub switch_params: IntGauge,
    pub select_params: IntGauge,
    pub rows_excluded: IntCounter,
    pub ranges_unresolved: IntCounter,
}

#[derive(Clone)]
pub struct MetricsHub {
    pub registry: Registry,
    pub params: RegistryMetrics,
}

impl MetricsHub {
    pub fn new() -> Result<Self, String> {
        let registry = Registry::new();
        let writable_params =
            IntGauge::new("tl_writable_params", "Writable catalog entries")
                .map_err(|e| format!("metrics init error: {e}"))?;
        let sensor_params = IntGauge::new("tl_sensor_params", "Sensor catalog entries")
            .map_err(|e| format!("metrics init error: {e}"))?;
        let switch_params = IntGauge::new("tl_switch_params", "Switch catalog entries")
            .map_err(|e| format!("metrics init error: {e}"))?;
        let select_params = IntGauge::new("tl_select_params", "Select catalog entries")
            .map_err(|e| format!("metrics init error: {e}"))?;
        let rows_excluded =
            IntCounter::new("tl_rows_excluded", "Register rows dropped before classification")
                .map_err(|e| format!("metrics init error: {e}"))?;
        let ranges_unresolved =
            IntCounter::new("tl_ranges_unresolved", "Raw ranges with no usable bounds")
                .map_err(|e| format!("metrics init error: {e}"))?;
        let params = RegistryMetrics {
            writable_params,
            sensor_params,
            switch_params,
            select_params,
            rows_excluded,
            ranges_unresolved,
        };
        let _ = registry.register(Box::new(params.writable_params.clone()));
        let _ = registry.register(Box::new(params.sensor_params.clone()));
        let _ = registry.register(Box::new(params.switch_params.clone()));
        let _ = registry.register(Box::new(params.select_params.clone()));
        let _ = registry.register(Box::new(params.rows_excluded.clone()));
        let _ = registry.register(Box::new(params.ranges_unresolved.clone()));
        Ok(Self { registry, params })
    }

    /// Record catalog sizes after a build.
    pub fn record_build(&self, reg: &ParamRegistry) {
        self.params.writable_params.set(reg.writables().count() as i64);
        self.params.sensor_params.set(reg.sensors().count() as i64);
        self.params.switch_params.set(reg.switches().count() as i64);
        self.params.select_params.set(reg.selects().count() as i64);
    }

    /// Build a registry while keeping the hub's gauges and counters in
    /// step with what the pass saw.
    pub fn build_recorded(&self, entries: &[RegisterEntry]) -> ParamRegistry {
        let (reg, stats) = build_counted(entries);
        self.params.rows_excluded.inc_by(stats.rows_excluded);
        self.params.ranges_unresolved.inc_by(stats.ranges_unresolved);
        self.record_build(&reg);
        reg
    }

    pub fn encode_text(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            return format!("error encoding metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}
