//! Numbered console menu and the actions behind it
//!
//! Each action prints its own header and reports failures as a message.
//! Only a closed input stream ends the loop before Exit is chosen.

use crate::command::CommandRunner;
use crate::inventory::Inventory;
use anyhow::Result;
use common::prompt::read_line_from;
use events::{EventPipeline, LogSource, RawLog, WriteOutcome};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, warn};

const SEPARATOR: &str = "=====================================";

/// A menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ListDevices,
    ShowDetails,
    SaveEvents,
    Refresh,
    AnalyzeLogs,
    Exit,
}

impl MenuChoice {
    /// Parse the number typed at the menu prompt
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::ListDevices),
            "2" => Some(Self::ShowDetails),
            "3" => Some(Self::SaveEvents),
            "4" => Some(Self::Refresh),
            "5" => Some(Self::AnalyzeLogs),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Print the menu
pub fn show_menu<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "\nUSB Tracker")?;
    writeln!(out, "\nSelect an option:")?;
    writeln!(out, "1. Show all connected USB devices")?;
    writeln!(out, "2. Show detailed USB device information")?;
    writeln!(out, "3. Show recent USB connection/disconnection events")?;
    writeln!(out, "4. Refresh")?;
    writeln!(out, "5. Analyze Logs")?;
    writeln!(out, "6. Exit")?;
    Ok(())
}

/// Everything the menu actions operate on
pub struct Tracker<S: LogSource, R: CommandRunner> {
    inventory: Inventory<R>,
    pipeline: EventPipeline<S>,
    default_log_name: String,
}

impl<S: LogSource, R: CommandRunner> Tracker<S, R> {
    pub fn new(
        inventory: Inventory<R>,
        pipeline: EventPipeline<S>,
        default_log_name: impl Into<String>,
    ) -> Self {
        Self {
            inventory,
            pipeline,
            default_log_name: default_log_name.into(),
        }
    }

    /// Directory event logs are written into
    pub fn output_dir(&self) -> &Path {
        self.pipeline.output_dir()
    }

    /// List attached USB storage devices
    pub fn list_devices<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "\nConnected USB Storage Devices:")?;
        writeln!(out, "{}\n", SEPARATOR)?;

        let devices = self.inventory.storage_devices()?;
        if devices.is_empty() {
            writeln!(out, "No USB storage devices found.")?;
        }
        for device in devices {
            writeln!(out, "{}", device)?;
        }
        Ok(())
    }

    /// Show block device details of USB storage
    pub fn show_details<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "\nDetailed USB Storage Device Information:")?;
        writeln!(out, "{}\n", SEPARATOR)?;

        let devices = self.inventory.block_devices()?;
        if devices.is_empty() {
            writeln!(out, "No USB block devices found.")?;
        }
        for device in devices {
            writeln!(out, "{}", device)?;
            writeln!(out, "{}", "=".repeat(50))?;
        }
        Ok(())
    }

    /// Extract connect/disconnect events and save them under a chosen name
    ///
    /// The name is only asked for when the snapshot holds events.
    pub fn save_events<I: BufRead, W: Write>(&self, input: &mut I, out: &mut W) -> Result<()> {
        let Some(raw) = self.fetch_events(out)? else {
            return Ok(());
        };

        let prompt = format!(
            "Enter a name for the log file (default: {}): ",
            self.default_log_name
        );
        let name = read_line_from(input, out, &prompt)?;
        self.write_events(&raw, &name, out)
    }

    /// Extract events and save them as `<name>.log` without prompting
    pub fn save_events_as<W: Write>(&self, name: &str, out: &mut W) -> Result<()> {
        match self.fetch_events(out)? {
            Some(raw) => self.write_events(&raw, name, out),
            None => Ok(()),
        }
    }

    fn fetch_events<W: Write>(&self, out: &mut W) -> Result<Option<RawLog>> {
        writeln!(out, "\nUSB Connection & Disconnection Events:")?;
        writeln!(out, "{}\n", SEPARATOR)?;

        let raw = self.pipeline.fetch()?;
        if !raw.has_events() {
            writeln!(out, "No recent USB connection events detected.")?;
            return Ok(None);
        }
        Ok(Some(raw))
    }

    fn write_events<W: Write>(&self, raw: &RawLog, name: &str, out: &mut W) -> Result<()> {
        let name = if name.trim().is_empty() {
            self.default_log_name.as_str()
        } else {
            name
        };

        match self.pipeline.save(raw, name, &mut *out)? {
            WriteOutcome::Written(report) => {
                writeln!(out, "\nLogs saved to: {}", report.path.display())?;
                debug!(
                    "Wrote {} record(s), {} connected, {} disconnected",
                    report.records, report.connected, report.disconnected
                );
            }
            WriteOutcome::NoEvents => {
                writeln!(out, "No recent USB connection events detected.")?;
            }
        }
        Ok(())
    }

    /// Run every action once, each failure reported on its own
    pub fn refresh<I: BufRead, W: Write>(&self, input: &mut I, out: &mut W) -> Result<()> {
        writeln!(out, "\nRefreshing USB device and event list...")?;
        let devices = self.list_devices(out);
        report(out, devices)?;
        let details = self.show_details(out);
        report(out, details)?;
        let saved = self.save_events(input, out);
        if saved.as_ref().is_err_and(is_input_closed) {
            return saved;
        }
        report(out, saved)
    }

    /// Run the menu loop until Exit or end of input
    pub fn run_menu<I, W, A>(&self, input: &mut I, out: &mut W, mut analyze: A) -> Result<()>
    where
        I: BufRead,
        W: Write,
        A: FnMut(&Path) -> Result<()>,
    {
        loop {
            show_menu(out)?;
            let line = match read_line_from(input, out, "\nEnter your choice (1-6): ") {
                Ok(line) => line,
                Err(common::Error::InputClosed) => break,
                Err(e) => return Err(e.into()),
            };

            let result = match MenuChoice::parse(&line) {
                Some(MenuChoice::ListDevices) => self.list_devices(out),
                Some(MenuChoice::ShowDetails) => self.show_details(out),
                Some(MenuChoice::SaveEvents) => self.save_events(input, out),
                Some(MenuChoice::Refresh) => self.refresh(input, out),
                Some(MenuChoice::AnalyzeLogs) => analyze(self.output_dir()),
                Some(MenuChoice::Exit) => break,
                None => {
                    writeln!(out, "Invalid choice! Please enter a number between 1 and 6.")?;
                    Ok(())
                }
            };

            if let Err(e) = result {
                if is_input_closed(&e) {
                    break;
                }
                report(out, Err(e))?;
            }
        }

        writeln!(out, "Exiting USB Tracker...")?;
        Ok(())
    }
}

/// Print an action failure as a message
fn report<W: Write>(out: &mut W, result: Result<()>) -> Result<()> {
    if let Err(e) = result {
        warn!("Action failed: {:#}", e);
        writeln!(out, "Error: {:#}", e)?;
    }
    Ok(())
}

fn is_input_closed(e: &anyhow::Error) -> bool {
    matches!(e.downcast_ref::<common::Error>(), Some(common::Error::InputClosed))
}
