//! Error types for board access.

use hkusbio_protocol::ProtocolError;
use thiserror::Error;

/// Errors raised while talking to the board or to a bus slave behind it.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("no HKUSBIO board found ({vid:04x}:{pid:04x} at index #{index})")]
    DeviceNotFound { vid: u16, pid: u16, index: usize },

    #[error("permission denied opening USB device: {0}")]
    PermissionDenied(String),

    #[error("USB transfer timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("board disconnected")]
    Disconnected,

    #[error("short USB write: {written} of {expected} bytes sent")]
    ShortWrite { written: usize, expected: usize },

    #[error("USB error: {0}")]
    Usb(#[source] rusb::Error),

    #[error("I2C slave {address:#04x} did not acknowledge after {polls} polls")]
    AckTimeout { address: u8, polls: u32 },

    #[error("{flag} still busy after {polls} polls")]
    BusyTimeout { flag: &'static str, polls: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl BoardError {
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Whether the failure is a missing board rather than a failing one.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DeviceNotFound { .. })
    }

    /// Whether retrying the same exchange could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::AckTimeout { .. } | Self::BusyTimeout { .. }
        )
    }
}

pub type BoardResult<T> = Result<T, BoardError>;
