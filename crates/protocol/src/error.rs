//! HKUSBIO protocol error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Invalid reply length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Unknown opcode: {0:#04x}")]
    UnknownOpcode(u8),

    #[error("Bit index {0} out of range (0-7)")]
    InvalidBitIndex(u8),

    #[error("Payload too long: at most {max} bytes, got {actual}")]
    PayloadTooLong { max: usize, actual: usize },

    #[error("Unknown register name: {0}")]
    UnknownRegister(String),

    #[error("Invalid {kind} value: {value}")]
    InvalidValue { kind: &'static str, value: u8 },
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
