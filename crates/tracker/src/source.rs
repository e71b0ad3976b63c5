//! Kernel log sources
//!
//! Both sources hand the event pipeline only the lines that mention a new
//! device or a disconnect on the configured bus path.

use crate::command::{CommandRunner, SystemRunner};
use crate::config::SourceSettings;
use events::{EventsError, LogSource};
use std::fs;
use std::path::PathBuf;

/// Keep the lines announcing a new device or a disconnect on `bus_path`
///
/// Matching ignores case, as the kernel's own capitalisation varies
/// between versions.
pub fn prefilter(raw: &str, bus_path: &str) -> String {
    let connected = format!("usb {}: new usb device", bus_path);
    let disconnected = format!("usb {}: usb disconnect", bus_path);

    raw.lines()
        .filter(|line| {
            let line = line.to_lowercase();
            line.contains(&connected) || line.contains(&disconnected)
        })
        .fold(String::new(), |mut out, line| {
            out.push_str(line);
            out.push('\n');
            out
        })
}

/// Kernel log read from a command such as `journalctl -k`
pub struct JournalSource<R: CommandRunner = SystemRunner> {
    runner: R,
    command: String,
    args: Vec<String>,
    bus_path: String,
}

impl JournalSource<SystemRunner> {
    /// Source running the configured command on the host
    pub fn from_settings(settings: &SourceSettings) -> Self {
        Self::with_runner(SystemRunner, settings)
    }
}

impl<R: CommandRunner> JournalSource<R> {
    pub fn with_runner(runner: R, settings: &SourceSettings) -> Self {
        Self {
            runner,
            command: settings.command.clone(),
            args: settings.args.clone(),
            bus_path: settings.bus_path.clone(),
        }
    }
}

impl<R: CommandRunner> LogSource for JournalSource<R> {
    fn name(&self) -> &str {
        &self.command
    }

    fn fetch(&self) -> events::Result<String> {
        let raw = self
            .runner
            .run(&self.command, &self.args)
            .map_err(|e| EventsError::SourceUnavailable(format!("{:#}", e)))?;
        Ok(prefilter(&raw, &self.bus_path))
    }
}

/// Kernel log read from a file such as `/var/log/kern.log`
pub struct FileSource {
    path: PathBuf,
    name: String,
    bus_path: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, bus_path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self {
            path,
            name,
            bus_path: bus_path.into(),
        }
    }
}

impl LogSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> events::Result<String> {
        let bytes = fs::read(&self.path).map_err(|e| {
            EventsError::SourceUnavailable(format!("Failed to read {}: {}", self.name, e))
        })?;
        // Decoded like command output, so a stray byte does not hide the log
        Ok(prefilter(&String::from_utf8_lossy(&bytes), &self.bus_path))
    }
}
