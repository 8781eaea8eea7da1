use thiserror::Error;

pub type Result<T, E = GatewayError> = core::result::Result<T, E>;

/// Failures of the external device gateway, passed upward unmodified.
/// The normalizer itself never fails; a gateway error only means no fresh
/// state map is produced for that cycle.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("device offline: {0}")]
    Offline(String),
}
