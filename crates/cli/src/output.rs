//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use serde::Serialize;
use serde_json::json;

use hkusbio_board::UsbDeviceInfo;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "chain": error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        }
    });
    println!("{error_json}");
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "Caused by:".yellow(), cause);
    }
}

/// Print one result record: a JSON object per line, or a plain text line.
pub fn emit<T: Serialize>(json: bool, record: &T, human: impl FnOnce(&T) -> String) {
    if json {
        match serde_json::to_string(record) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("Failed to format output as JSON: {e}"),
        }
    } else {
        println!("{}", human(record));
    }
}

/// Print the attached boards
pub fn print_device_list(devices: &[UsbDeviceInfo], json: bool) {
    if json {
        for device in devices {
            emit(true, device, |_| String::new());
        }
        return;
    }
    if devices.is_empty() {
        println!("{}", "No HKUSBIO boards found".yellow());
        return;
    }
    for device in devices {
        println!("{}", format_device(device));
    }
}

pub fn format_device(device: &UsbDeviceInfo) -> String {
    format!(
        "#{} bus {:03} address {:03} ({:04x}:{:04x})",
        device.index, device.bus, device.address, device.vendor_id, device.product_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_format_device() {
        let device = UsbDeviceInfo {
            index: 0,
            bus: 1,
            address: 12,
            vendor_id: 0x04D8,
            product_id: 0x003F,
        };
        assert_snapshot!(format_device(&device), @"#0 bus 001 address 012 (04d8:003f)");
    }
}
