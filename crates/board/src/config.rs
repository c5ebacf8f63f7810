//! Timing configuration for board access.
//!
//! The delays encode hardware timing margins found empirically on real
//! boards. They are configurable so tests can run with zero delays, but the
//! defaults should not be lowered without hardware validation.

use std::time::Duration;

use hkusbio_protocol::DEFAULT_USB_TIMEOUT_MS;
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, BoardResult};

/// Upper bound for any single delay or timeout, in milliseconds.
const MAX_DELAY_MS: u64 = 60_000;

/// Board access configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Timeout for each USB bulk transfer.
    ///
    /// Default: 100ms.
    pub usb_timeout_ms: u64,

    /// Sleep between I2C slave-acknowledge polls.
    ///
    /// Default: 100ms.
    pub ack_poll_interval_ms: u64,

    /// Slave-acknowledge polls before giving up with `AckTimeout`.
    ///
    /// Default: 50.
    pub ack_max_polls: u32,

    /// Settle delay after every SPI chip-select transition.
    ///
    /// Default: 50ms.
    pub cs_settle_ms: u64,

    /// Settle delay after SPI engine initialisation.
    ///
    /// Default: 100ms.
    pub spi_init_settle_ms: u64,

    /// Sleep between SFR busy-flag polls.
    ///
    /// Default: 50ms.
    pub busy_poll_interval_ms: u64,

    /// Busy-flag polls before giving up with `BusyTimeout`.
    ///
    /// Default: 50.
    pub busy_max_polls: u32,

    /// Wait after sensor setup before the first sample.
    ///
    /// Default: 1500ms.
    pub sensor_ready_ms: u64,

    /// Wait between starting a pressure conversion and reading it.
    ///
    /// Default: 5ms.
    pub conversion_delay_ms: u64,
}

impl BoardConfig {
    #[must_use]
    pub fn builder() -> BoardConfigBuilder {
        BoardConfigBuilder::default()
    }

    /// A configuration with every delay set to zero, for simulated boards.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            ack_poll_interval_ms: 0,
            cs_settle_ms: 0,
            spi_init_settle_ms: 0,
            busy_poll_interval_ms: 0,
            sensor_ready_ms: 0,
            conversion_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a zero timeout, a zero poll count
    /// or any delay above one minute.
    pub fn validate(&self) -> BoardResult<()> {
        if self.usb_timeout_ms == 0 {
            return Err(BoardError::invalid_configuration(
                "usb_timeout_ms must be greater than zero",
            ));
        }
        if self.ack_max_polls == 0 {
            return Err(BoardError::invalid_configuration(
                "ack_max_polls must be greater than zero",
            ));
        }
        if self.busy_max_polls == 0 {
            return Err(BoardError::invalid_configuration(
                "busy_max_polls must be greater than zero",
            ));
        }
        let delays = [
            ("usb_timeout_ms", self.usb_timeout_ms),
            ("ack_poll_interval_ms", self.ack_poll_interval_ms),
            ("cs_settle_ms", self.cs_settle_ms),
            ("spi_init_settle_ms", self.spi_init_settle_ms),
            ("busy_poll_interval_ms", self.busy_poll_interval_ms),
            ("sensor_ready_ms", self.sensor_ready_ms),
            ("conversion_delay_ms", self.conversion_delay_ms),
        ];
        if let Some((name, _)) = delays.iter().find(|(_, ms)| *ms > MAX_DELAY_MS) {
            return Err(BoardError::invalid_configuration(format!(
                "{name} must not exceed {MAX_DELAY_MS}"
            )));
        }
        Ok(())
    }

    pub fn usb_timeout(&self) -> Duration {
        Duration::from_millis(self.usb_timeout_ms)
    }

    pub fn ack_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ack_poll_interval_ms)
    }

    pub fn cs_settle(&self) -> Duration {
        Duration::from_millis(self.cs_settle_ms)
    }

    pub fn spi_init_settle(&self) -> Duration {
        Duration::from_millis(self.spi_init_settle_ms)
    }

    pub fn busy_poll_interval(&self) -> Duration {
        Duration::from_millis(self.busy_poll_interval_ms)
    }

    pub fn sensor_ready(&self) -> Duration {
        Duration::from_millis(self.sensor_ready_ms)
    }

    pub fn conversion_delay(&self) -> Duration {
        Duration::from_millis(self.conversion_delay_ms)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            usb_timeout_ms: DEFAULT_USB_TIMEOUT_MS,
            ack_poll_interval_ms: 100,
            ack_max_polls: 50,
            cs_settle_ms: 50,
            spi_init_settle_ms: 100,
            busy_poll_interval_ms: 50,
            busy_max_polls: 50,
            sensor_ready_ms: 1500,
            conversion_delay_ms: 5,
        }
    }
}

/// Builder for `BoardConfig`.
#[derive(Debug, Default)]
pub struct BoardConfigBuilder {
    config: BoardConfig,
}

impl BoardConfigBuilder {
    #[must_use]
    pub fn usb_timeout_ms(mut self, ms: u64) -> Self {
        self.config.usb_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn ack_poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.ack_poll_interval_ms = ms;
        self
    }

    #[must_use]
    pub fn ack_max_polls(mut self, polls: u32) -> Self {
        self.config.ack_max_polls = polls;
        self
    }

    #[must_use]
    pub fn cs_settle_ms(mut self, ms: u64) -> Self {
        self.config.cs_settle_ms = ms;
        self
    }

    #[must_use]
    pub fn spi_init_settle_ms(mut self, ms: u64) -> Self {
        self.config.spi_init_settle_ms = ms;
        self
    }

    #[must_use]
    pub fn busy_poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.busy_poll_interval_ms = ms;
        self
    }

    #[must_use]
    pub fn busy_max_polls(mut self, polls: u32) -> Self {
        self.config.busy_max_polls = polls;
        self
    }

    #[must_use]
    pub fn sensor_ready_ms(mut self, ms: u64) -> Self {
        self.config.sensor_ready_ms = ms;
        self
    }

    #[must_use]
    pub fn conversion_delay_ms(mut self, ms: u64) -> Self {
        self.config.conversion_delay_ms = ms;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> BoardResult<BoardConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
