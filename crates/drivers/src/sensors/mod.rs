//! Sensor drivers.

pub mod l3g;
pub mod lsm303dlhc;
pub mod mpl115a2;

pub use l3g::{FullScale, GyroChip, L3gGyro};
pub use lsm303dlhc::Lsm303dlhc;
pub use mpl115a2::{Coefficients, Mpl115a2, PressureSample, RawSample};
