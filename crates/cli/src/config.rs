//! Loading `BoardConfig` from YAML or JSON files.

use std::path::Path;

use hkusbio_board::{BoardConfig, BoardError};
use tracing::debug;

use crate::error::CliError;

/// Load and validate a board configuration, or return the defaults when no
/// file is given. The format follows the extension: `.json` is JSON,
/// anything else is YAML.
pub fn load_config(path: Option<&Path>) -> Result<BoardConfig, CliError> {
    let Some(path) = path else {
        return Ok(BoardConfig::default());
    };
    debug!(path = %path.display(), "loading board configuration");
    let text = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config: BoardConfig = if is_json {
        serde_json::from_str(&text)?
    } else {
        serde_yaml::from_str(&text)?
    };
    config.validate().map_err(|err| {
        let reason = match err {
            BoardError::InvalidConfiguration(reason) => reason,
            other => other.to_string(),
        };
        CliError::InvalidConfiguration(format!("{}: {reason}", path.display()))
    })?;
    Ok(config)
}
