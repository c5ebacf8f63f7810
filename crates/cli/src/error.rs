//! Error types and exit codes for the hkusbio CLI

use hkusbio_board::BoardError;
use hkusbio_drivers::DriverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Process exit code for a failed command.
///
/// 2 board not found, 3 sensor identity mismatch, 4 configuration error,
/// 1 for everything else.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(err) = error.downcast_ref::<CliError>() {
        return match err {
            CliError::InvalidConfiguration(_) | CliError::JsonError(_) | CliError::YamlError(_) => {
                4
            }
            _ => 1,
        };
    }
    if let Some(err) = error.downcast_ref::<DriverError>() {
        return match err {
            DriverError::IdentityMismatch { .. } => 3,
            DriverError::Board(board) => board_exit_code(board),
            DriverError::InvalidArgument(_) => 1,
        };
    }
    if let Some(err) = error.downcast_ref::<BoardError>() {
        return board_exit_code(err);
    }
    1
}

fn board_exit_code(error: &BoardError) -> i32 {
    match error {
        BoardError::DeviceNotFound { .. } => 2,
        BoardError::InvalidConfiguration(_) => 4,
        _ => 1,
    }
}
