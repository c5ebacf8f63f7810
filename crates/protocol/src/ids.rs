//! USB identity of the HKUSBIO board.

/// Microchip Technology vendor ID used by the board firmware.
pub const HKUSBIO_VENDOR_ID: u16 = 0x04D8;

/// Product ID of the custom HID demo firmware.
pub const HKUSBIO_PRODUCT_ID: u16 = 0x003F;

/// The only interface exposed by the firmware.
pub const INTERFACE: u8 = 0;

/// Bulk OUT endpoint carrying command frames.
pub const ENDPOINT_OUT: u8 = 0x01;

/// Bulk IN endpoint carrying replies.
pub const ENDPOINT_IN: u8 = 0x81;

/// Every reply is a full 64-byte packet.
pub const REPLY_LEN: usize = 64;

/// Transfer timeout used for every command and reply.
pub const DEFAULT_USB_TIMEOUT_MS: u64 = 100;

/// Host-side module version, reported next to the firmware ROM version.
pub const MODULE_VERSION: &str = concat!("hkusbio ", env!("CARGO_PKG_VERSION"));

pub fn is_hkusbio(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == HKUSBIO_VENDOR_ID && product_id == HKUSBIO_PRODUCT_ID
}
