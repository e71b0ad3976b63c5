//! usb-tracker
//!
//! Lists attached USB storage devices, extracts USB connect/disconnect
//! events from the kernel log into a `.log` file and analyzes saved logs.

mod command;
mod config;
mod inventory;
mod menu;
mod source;
mod tui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::setup_logging;
use config::TrackerConfig;
use events::{EventPipeline, LogSource};
use inventory::Inventory;
use menu::Tracker;
use source::{FileSource, JournalSource};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "usb-tracker")]
#[command(
    author,
    version,
    about = "USB Tracker - Inspect USB storage devices and log their events"
)]
#[command(long_about = "
Inspects attached USB storage devices and records USB connect/disconnect
events from the kernel log into a tagged .log file. Saved logs can be
summarized and searched from the command line or in the log analyzer.

EXAMPLES:
    # Interactive menu
    usb-tracker

    # List USB storage devices
    usb-tracker devices

    # Save events to ./session.log
    usb-tracker events --name session

    # Extract events from a kernel log file
    usb-tracker events --from-file /var/log/kern.log

    # Summarize or search a saved log
    usb-tracker summary usb_logs.log
    usb-tracker filter usb_logs.log disconnect

    # Browse saved logs
    usb-tracker analyze ~/usb-logs

CONFIGURATION:
    The tracker looks for configuration files in the following order:
    1. Path specified with --config
    2. ~/.config/usb-tracker/tracker.toml
    3. /etc/usb-tracker/tracker.toml
    4. Built-in defaults
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Save default configuration to default location and exit
    #[arg(long)]
    save_config: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// List attached USB storage devices
    Devices,

    /// Show block device details of USB storage
    Details,

    /// Extract USB events from the kernel log and save them
    Events {
        /// Base name of the log file (".log" is appended)
        #[arg(short, long)]
        name: Option<String>,

        /// Read this kernel log file instead of running the journal command
        #[arg(long, value_name = "PATH")]
        from_file: Option<PathBuf>,
    },

    /// Count the entries of a saved log
    Summary {
        /// Log file to summarize
        file: PathBuf,
    },

    /// Print the lines of a saved log containing a keyword
    Filter {
        /// Log file to search
        file: PathBuf,
        /// Case-insensitive keyword
        keyword: String,
    },

    /// Browse saved logs in the terminal analyzer
    Analyze {
        /// Directory to browse (defaults to the output directory)
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --save-config flag early (before loading config)
    if args.save_config {
        let config = TrackerConfig::default();
        let path = TrackerConfig::default_path();
        config.save(&path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    let config = if let Some(ref path) = args.config {
        TrackerConfig::load(Some(path.clone())).context("Failed to load configuration")?
    } else {
        TrackerConfig::load_or_default()
    };

    // Use CLI log level if specified, otherwise use config value
    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.tracker.log_level);

    setup_logging(log_level).context("Failed to setup logging")?;

    info!("usb-tracker v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        None => run_menu(&config),
        Some(Command::Devices) => {
            let tracker = build_tracker(&config, None);
            tracker.list_devices(&mut io::stdout())
        }
        Some(Command::Details) => {
            let tracker = build_tracker(&config, None);
            tracker.show_details(&mut io::stdout())
        }
        Some(Command::Events { name, from_file }) => run_events(&config, name, from_file),
        Some(Command::Summary { file }) => {
            let summary = events::summarize(&file)?;
            println!("{}", summary);
            Ok(())
        }
        Some(Command::Filter { file, keyword }) => {
            let result = events::filter(&file, &keyword)?;
            println!("{}", result);
            Ok(())
        }
        Some(Command::Analyze { dir }) => {
            let dir = dir
                .map(|d| common::paths::expand_path(&d))
                .unwrap_or_else(|| config.output_dir());
            tui::run_analyzer(&dir)
        }
    }
}

/// Log source selected by the command line or the configuration
fn build_source(config: &TrackerConfig, from_file: Option<PathBuf>) -> Box<dyn LogSource> {
    match from_file.or_else(|| config.source_file()) {
        Some(path) => {
            info!("Reading kernel log from {}", path.display());
            Box::new(FileSource::new(path, config.source.bus_path.clone()))
        }
        None => Box::new(JournalSource::from_settings(&config.source)),
    }
}

fn build_tracker(
    config: &TrackerConfig,
    from_file: Option<PathBuf>,
) -> Tracker<Box<dyn LogSource>, command::SystemRunner> {
    Tracker::new(
        Inventory::new(config.inventory.clone()),
        EventPipeline::new(build_source(config, from_file), config.output_dir()),
        config.tracker.default_log_name.clone(),
    )
}

/// Interactive numbered menu on stdin/stdout
fn run_menu(config: &TrackerConfig) -> Result<()> {
    let tracker = build_tracker(config, None);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    tracker.run_menu(&mut stdin.lock(), &mut stdout, |dir: &Path| {
        tui::run_analyzer(dir)
    })
}

/// Non-interactive event extraction
fn run_events(config: &TrackerConfig, name: Option<String>, from_file: Option<PathBuf>) -> Result<()> {
    let tracker = build_tracker(config, from_file);
    match name {
        Some(name) => tracker.save_events_as(&name, &mut io::stdout()),
        None => {
            let stdin = io::stdin();
            tracker.save_events(&mut stdin.lock(), &mut io::stdout())
        }
    }
}
