//! USB storage inventory
//!
//! Lists attached USB storage devices from `lsusb` and their block device
//! details from `lsblk`. Only the text reports of those tools are consumed.

use crate::command::{CommandRunner, SystemRunner};
use crate::config::InventorySettings;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// `Bus 002 Device 003: ID 0781:5581 SanDisk Corp. Ultra`
static LSUSB_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Bus\s+(\d+)\s+Device\s+(\d+):\s+ID\s+([0-9a-fA-F]{4}):([0-9a-fA-F]{4})\s*(.*)$")
        .expect("lsusb pattern is valid")
});

/// `KEY="value"` pairs of `lsblk -P`
static LSBLK_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Z][A-Z0-9:_-]*)="([^"]*)""#).expect("lsblk pattern is valid"));

/// Columns requested from lsblk
const LSBLK_COLUMNS: &str = "NAME,MOUNTPOINT,VENDOR,MODEL,TRAN,SIZE,SERIAL";

/// A device line of the `lsusb` report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbDevice {
    pub bus_number: u16,
    pub device_address: u16,
    pub vendor_id: u16,
    pub product_id: u16,
    pub description: String,
}

impl UsbDevice {
    /// Parse one `lsusb` line
    pub fn parse(line: &str) -> Option<Self> {
        let caps = LSUSB_LINE.captures(line.trim())?;
        Some(Self {
            bus_number: caps[1].parse().ok()?,
            device_address: caps[2].parse().ok()?,
            vendor_id: u16::from_str_radix(&caps[3], 16).ok()?,
            product_id: u16::from_str_radix(&caps[4], 16).ok()?,
            description: caps[5].trim().to_string(),
        })
    }
}

/// A listed storage device; lines lsusb printed in an unexpected shape are
/// kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEntry {
    Parsed(UsbDevice),
    Raw(String),
}

impl fmt::Display for DeviceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceEntry::Parsed(device) => write!(
                f,
                "  {:04x}:{:04x} - {}\n      Bus {:03} Device {:03}",
                device.vendor_id,
                device.product_id,
                if device.description.is_empty() {
                    "Unknown Product"
                } else {
                    &device.description
                },
                device.bus_number,
                device.device_address
            ),
            DeviceEntry::Raw(line) => write!(f, "  {}", line),
        }
    }
}

/// A USB-attached block device from `lsblk`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockDevice {
    pub name: String,
    pub mount_point: Option<String>,
    pub vendor: Option<String>,
    pub model: Option<String>,
    pub size: Option<String>,
    pub serial: Option<String>,
}

impl BlockDevice {
    /// Build from the pairs of one `lsblk -P` row, keeping USB transports only
    fn from_pairs(pairs: &HashMap<String, String>) -> Option<Self> {
        let transport = pairs.get("TRAN")?;
        if !transport.eq_ignore_ascii_case("usb") {
            return None;
        }

        let field = |key: &str| {
            pairs
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Some(Self {
            name: field("NAME")?,
            mount_point: field("MOUNTPOINT"),
            vendor: field("VENDOR"),
            model: field("MODEL"),
            size: field("SIZE"),
            serial: field("SERIAL"),
        })
    }
}

impl fmt::Display for BlockDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| "Unknown".to_string());
        writeln!(f, "Device Name:   {}", self.name)?;
        writeln!(
            f,
            "Mount Point:   {}",
            self.mount_point.as_deref().unwrap_or("Not mounted")
        )?;
        writeln!(f, "Vendor:        {}", unknown(&self.vendor))?;
        writeln!(f, "Model:         {}", unknown(&self.model))?;
        writeln!(f, "Size:          {}", unknown(&self.size))?;
        write!(f, "Serial Number: {}", unknown(&self.serial))
    }
}

/// Select storage devices from an `lsusb` report
pub fn parse_lsusb(report: &str, settings: &InventorySettings) -> Vec<DeviceEntry> {
    report
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !settings.exclude_markers.iter().any(|m| line.contains(m.as_str())))
        .filter(|line| settings.storage_markers.iter().any(|m| line.contains(m.as_str())))
        .map(|line| match UsbDevice::parse(line) {
            Some(device) => DeviceEntry::Parsed(device),
            None => DeviceEntry::Raw(line.trim().to_string()),
        })
        .collect()
}

/// Select USB block devices from an `lsblk -P` report
pub fn parse_lsblk(report: &str) -> Vec<BlockDevice> {
    report
        .lines()
        .filter_map(|line| {
            let pairs: HashMap<String, String> = LSBLK_PAIR
                .captures_iter(line)
                .map(|caps| (caps[1].to_string(), caps[2].to_string()))
                .collect();
            BlockDevice::from_pairs(&pairs)
        })
        .collect()
}

/// Host device inventory
pub struct Inventory<R: CommandRunner = SystemRunner> {
    runner: R,
    settings: InventorySettings,
}

impl Inventory<SystemRunner> {
    pub fn new(settings: InventorySettings) -> Self {
        Self::with_runner(SystemRunner, settings)
    }
}

impl<R: CommandRunner> Inventory<R> {
    pub fn with_runner(runner: R, settings: InventorySettings) -> Self {
        Self { runner, settings }
    }

    /// Attached USB storage devices
    pub fn storage_devices(&self) -> Result<Vec<DeviceEntry>> {
        let report = self
            .runner
            .run(&self.settings.lsusb_command, &[])
            .context("Error retrieving USB devices")?;
        Ok(parse_lsusb(&report, &self.settings))
    }

    /// Block device details of USB storage
    pub fn block_devices(&self) -> Result<Vec<BlockDevice>> {
        let args = vec![
            "-P".to_string(),
            "-o".to_string(),
            LSBLK_COLUMNS.to_string(),
        ];
        let report = self
            .runner
            .run(&self.settings.lsblk_command, &args)
            .context("Error retrieving detailed USB info")?;
        Ok(parse_lsblk(&report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LSUSB: &str = "\
Bus 002 Device 001: ID 1d6b:0003 Linux Foundation 3.0 root hub
Bus 001 Device 004: ID 0781:5581 SanDisk Corp. Ultra Flash Drive
Bus 001 Device 003: ID 046d:c52b Logitech, Inc. Unifying Receiver
Bus 001 Device 005: ID 0930:6545 Toshiba Corp. Kingston DataTraveler Mass Storage
Bus 001 Device 002: ID 80ee:0021 VirtualBox USB Tablet Mass Storage
Bus 001 Device 001: ID 1d6b:0002 Linux Foundation 2.0 root hub
";

    const LSBLK: &str = r#"NAME="sda" MOUNTPOINT="" VENDOR="ATA     " MODEL="Samsung SSD" TRAN="sata" SIZE="465.8G" SERIAL="S3Z1"
NAME="sda1" MOUNTPOINT="/" VENDOR="" MODEL="" TRAN="" SIZE="465.8G" SERIAL=""
NAME="sdb" MOUNTPOINT="/media/usb" VENDOR="SanDisk " MODEL="Ultra" TRAN="usb" SIZE="57.3G" SERIAL="4C530001"
NAME="sdc" MOUNTPOINT="" VENDOR="" MODEL="" TRAN="usb" SIZE="" SERIAL=""
"#;

    struct FakeRunner {
        lsusb: &'static str,
        lsblk: &'static str,
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, program: &str, args: &[String]) -> Result<String> {
            match program {
                "lsusb" => Ok(self.lsusb.to_string()),
                "lsblk" => {
                    assert_eq!(args[0], "-P");
                    Ok(self.lsblk.to_string())
                }
                other => anyhow::bail!("unexpected program {}", other),
            }
        }
    }

    #[test]
    fn test_parse_usb_device_line() {
        let device = UsbDevice::parse("Bus 001 Device 004: ID 0781:5581 SanDisk Corp. Ultra").unwrap();
        assert_eq!(device.bus_number, 1);
        assert_eq!(device.device_address, 4);
        assert_eq!(device.vendor_id, 0x0781);
        assert_eq!(device.product_id, 0x5581);
        assert_eq!(device.description, "SanDisk Corp. Ultra");
    }

    #[test]
    fn test_parse_lsusb_filters_storage() {
        let entries = parse_lsusb(LSUSB, &InventorySettings::default());
        assert_eq!(entries.len(), 2);

        let DeviceEntry::Parsed(first) = &entries[0] else {
            panic!("expected a parsed device");
        };
        assert_eq!(first.vendor_id, 0x0781);
        let DeviceEntry::Parsed(second) = &entries[1] else {
            panic!("expected a parsed device");
        };
        assert_eq!(second.vendor_id, 0x0930);
    }

    #[test]
    fn test_parse_lsusb_keeps_unexpected_lines_raw() {
        let entries = parse_lsusb("weird Flash Drive output\n", &InventorySettings::default());
        assert_eq!(entries, vec![DeviceEntry::Raw("weird Flash Drive output".to_string())]);
    }

    #[test]
    fn test_parse_lsblk_usb_only() {
        let devices = parse_lsblk(LSBLK);
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].name, "sdb");
        assert_eq!(devices[0].mount_point.as_deref(), Some("/media/usb"));
        assert_eq!(devices[0].vendor.as_deref(), Some("SanDisk"));
        assert_eq!(devices[1].name, "sdc");
        assert_eq!(devices[1].size, None);
    }

    #[test]
    fn test_block_device_display_defaults() {
        let device = BlockDevice {
            name: "sdc".to_string(),
            ..Default::default()
        };
        let text = device.to_string();
        assert!(text.contains("Mount Point:   Not mounted"));
        assert!(text.contains("Serial Number: Unknown"));
    }

    #[test]
    fn test_inventory_with_runner() {
        let inventory = Inventory::with_runner(
            FakeRunner {
                lsusb: LSUSB,
                lsblk: LSBLK,
            },
            InventorySettings::default(),
        );
        assert_eq!(inventory.storage_devices().unwrap().len(), 2);
        assert_eq!(inventory.block_devices().unwrap().len(), 2);
    }
}
