//! USB transport over libusb.
//!
//! The board enumerates as `04d8:003f` with a single interface carrying one
//! bulk OUT (`0x01`) and one bulk IN (`0x81`) endpoint. Opening a board
//! detaches any kernel driver bound to interface 0, selects the first
//! configuration and claims the interface. The interface is released on
//! drop; [`Transport::reset`] issues a USB port reset.

use std::time::Duration;

use hkusbio_protocol::{
    CommandFrame, ENDPOINT_IN, ENDPOINT_OUT, HKUSBIO_PRODUCT_ID, HKUSBIO_VENDOR_ID, INTERFACE,
    REPLY_LEN, Reply, is_hkusbio,
};
use rusb::{Context, Device, DeviceHandle, UsbContext};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::{BoardError, BoardResult};
use crate::transport::Transport;

/// Identity of an attached board, as reported by `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsbDeviceInfo {
    pub index: usize,
    pub bus: u8,
    pub address: u8,
    pub vendor_id: u16,
    pub product_id: u16,
}

pub struct UsbTransport {
    handle: DeviceHandle<Context>,
    info: UsbDeviceInfo,
}

impl UsbTransport {
    /// Count attached HKUSBIO boards.
    pub fn scan_devices() -> BoardResult<usize> {
        Ok(Self::list_devices()?.len())
    }

    /// Describe every attached HKUSBIO board.
    pub fn list_devices() -> BoardResult<Vec<UsbDeviceInfo>> {
        let context = Context::new().map_err(BoardError::Usb)?;
        let devices = matching_devices(&context)?
            .iter()
            .enumerate()
            .map(|(index, device)| {
                debug!(
                    index,
                    bus = device.bus_number(),
                    address = device.address(),
                    "found HKUSBIO board"
                );
                device_info(index, device)
            })
            .collect();
        Ok(devices)
    }

    /// Open the first attached board.
    pub fn open() -> BoardResult<Self> {
        Self::open_nth(0)
    }

    /// Open the `nth` attached board.
    ///
    /// # Errors
    ///
    /// `DeviceNotFound` if fewer than `nth + 1` boards are attached,
    /// `PermissionDenied` if the OS refuses access (missing udev rule),
    /// or `Usb` for any other libusb failure while claiming the interface.
    pub fn open_nth(nth: usize) -> BoardResult<Self> {
        let context = Context::new().map_err(BoardError::Usb)?;
        let device = matching_devices(&context)?
            .into_iter()
            .nth(nth)
            .ok_or(BoardError::DeviceNotFound {
                vid: HKUSBIO_VENDOR_ID,
                pid: HKUSBIO_PRODUCT_ID,
                index: nth,
            })?;
        let info = device_info(nth, &device);
        debug!(?info, "opening HKUSBIO board");

        let mut handle = device.open().map_err(|err| {
            if err == rusb::Error::Access {
                warn!("access denied; check the udev rule for 04d8:003f");
            }
            map_open_error(err)
        })?;

        // Only Linux reports kernel drivers; elsewhere this is NotSupported.
        match handle.kernel_driver_active(INTERFACE) {
            Ok(true) => {
                debug!(interface = INTERFACE, "detaching kernel driver");
                handle.detach_kernel_driver(INTERFACE).map_err(map_open_error)?;
            }
            Ok(false) | Err(rusb::Error::NotSupported) => {}
            Err(err) => return Err(map_open_error(err)),
        }

        let configuration = device
            .config_descriptor(0)
            .map_err(map_open_error)?
            .number();
        handle
            .set_active_configuration(configuration)
            .map_err(map_open_error)?;
        handle.claim_interface(INTERFACE).map_err(map_open_error)?;

        Ok(Self { handle, info })
    }

    pub fn info(&self) -> &UsbDeviceInfo {
        &self.info
    }
}

impl Drop for UsbTransport {
    fn drop(&mut self) {
        if let Err(err) = self.handle.release_interface(INTERFACE) {
            trace!(%err, "release_interface failed on drop");
        }
    }
}

impl Transport for UsbTransport {
    fn send(&mut self, frame: &CommandFrame, timeout: Duration) -> BoardResult<()> {
        let written = self
            .handle
            .write_bulk(ENDPOINT_OUT, frame.as_bytes(), timeout)
            .map_err(|err| map_transfer_error(err, timeout))?;
        check_written(written, frame.len())
    }

    fn receive(&mut self, timeout: Duration) -> BoardResult<Reply> {
        let mut buf = [0u8; REPLY_LEN];
        let read = self
            .handle
            .read_bulk(ENDPOINT_IN, &mut buf, timeout)
            .map_err(|err| map_transfer_error(err, timeout))?;
        Ok(Reply::from_bytes(buf.get(..read).unwrap_or(&buf))?)
    }

    fn reset(&mut self) -> BoardResult<()> {
        debug!(info = ?self.info, "resetting HKUSBIO board");
        self.handle.reset().map_err(|err| map_transfer_error(err, Duration::ZERO))
    }
}

fn matching_devices(context: &Context) -> BoardResult<Vec<Device<Context>>> {
    let devices = context.devices().map_err(BoardError::Usb)?;
    Ok(devices
        .iter()
        .filter(|device| {
            device
                .device_descriptor()
                .map(|desc| is_hkusbio(desc.vendor_id(), desc.product_id()))
                .unwrap_or(false)
        })
        .collect())
}

fn device_info(index: usize, device: &Device<Context>) -> UsbDeviceInfo {
    UsbDeviceInfo {
        index,
        bus: device.bus_number(),
        address: device.address(),
        vendor_id: HKUSBIO_VENDOR_ID,
        product_id: HKUSBIO_PRODUCT_ID,
    }
}

/// The firmware acts on whole frames only; a partial write is a failed command.
fn check_written(written: usize, expected: usize) -> BoardResult<()> {
    if written != expected {
        warn!(written, expected, "short bulk write");
        return Err(BoardError::ShortWrite { written, expected });
    }
    Ok(())
}

fn map_open_error(err: rusb::Error) -> BoardError {
    match err {
        rusb::Error::Access => BoardError::PermissionDenied(err.to_string()),
        rusb::Error::NoDevice => BoardError::Disconnected,
        other => BoardError::Usb(other),
    }
}

fn map_transfer_error(err: rusb::Error, timeout: Duration) -> BoardError {
    match err {
        rusb::Error::Timeout => BoardError::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        },
        other => map_open_error(other),
    }
}
