//! Configuration and data file locations
//!
//! Files live in XDG-compliant locations:
//! - Linux: `~/.config/usb-tracker/` and `~/.local/share/usb-tracker/`
//! - macOS: `~/Library/Application Support/usb-tracker/`
//! - Windows: `%APPDATA%\usb-tracker\`

use std::path::{Path, PathBuf};

/// Application name for XDG directory lookup
pub const APP_NAME: &str = "usb-tracker";

/// System-wide configuration directory checked after the user one
pub const SYSTEM_CONFIG_DIR: &str = "/etc/usb-tracker";

/// Path of a file in the user configuration directory
///
/// Falls back to a relative `.config/usb-tracker/` when no home directory
/// can be determined.
pub fn config_file(file_name: &str) -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(APP_NAME).join(file_name),
        None => PathBuf::from(".config").join(APP_NAME).join(file_name),
    }
}

/// Path of a file in the system configuration directory
pub fn system_config_file(file_name: &str) -> PathBuf {
    Path::new(SYSTEM_CONFIG_DIR).join(file_name)
}

/// Path of a file in the user data directory
pub fn data_file(file_name: &str) -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join(APP_NAME).join(file_name),
        None => PathBuf::from(".local/share").join(APP_NAME).join(file_name),
    }
}

/// Expand a leading `~` in a configured path
pub fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).as_ref()),
        None => path.to_path_buf(),
    }
}
