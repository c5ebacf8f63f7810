//! Peripherals driven through PIC18F45K50 special function registers.

pub mod dac;
pub mod pin;
pub mod pwm;
pub mod rgb_led;
pub mod seven_segment;
pub mod sfr_spi;

pub use dac::Dac;
pub use pin::SfrPin;
pub use pwm::Pwm;
pub use rgb_led::{Color, RgbLed};
pub use seven_segment::SevenSegment;
pub use sfr_spi::SfrSpi;
