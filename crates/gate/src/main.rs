//! usb-tracker-gate
//!
//! Registers and authenticates users before handing the terminal over to
//! the USB tracker.

mod auth;
mod config;
mod error;
mod launch;
mod menu;
mod store;

use anyhow::{Context, Result};
use auth::Authenticator;
use clap::{Parser, Subcommand};
use common::setup_logging;
use config::GateConfig;
use menu::TerminalPrompter;
use std::io;
use store::FileUserStore;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "usb-tracker-gate")]
#[command(
    author,
    version,
    about = "USB Tracker Gate - Log in before using the USB tracker"
)]
#[command(long_about = "
Registers users and checks their credentials before starting the USB
tracker. Passwords are stored as Argon2 hashes and typed without echo.

EXAMPLES:
    # Interactive menu
    usb-tracker-gate

    # Register or log in directly
    usb-tracker-gate register
    usb-tracker-gate login

    # Keep users in a custom store
    usb-tracker-gate --config /path/to/gate.toml

CONFIGURATION:
    The gate looks for configuration files in the following order:
    1. Path specified with --config
    2. ~/.config/usb-tracker/gate.toml
    3. /etc/usb-tracker/gate.toml
    4. Built-in defaults
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,

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
    /// Register a new user
    Register,
    /// Log in and start the USB tracker
    Login,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --save-config flag early (before loading config)
    if args.save_config {
        let config = GateConfig::default();
        let path = GateConfig::default_path();
        config.save(&path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    let config = if let Some(ref path) = args.config {
        GateConfig::load(Some(path.clone())).context("Failed to load configuration")?
    } else {
        GateConfig::load_or_default()
    };

    let log_level = args.log_level.as_deref().unwrap_or(&config.gate.log_level);
    setup_logging(log_level).context("Failed to setup logging")?;

    info!("usb-tracker-gate v{}", env!("CARGO_PKG_VERSION"));

    let store = FileUserStore::new(&config.store);
    info!("Using user store {}", store.path().display());
    let mut auth = Authenticator::new(store);

    let mut prompter = TerminalPrompter;
    let mut stdout = io::stdout();
    let on_success = |_: &str| launch::launch(&config.launch);

    match args.command {
        None => menu::run_menu(&mut auth, &mut prompter, &mut stdout, on_success),
        Some(Command::Register) => menu::register(&mut auth, &mut prompter, &mut stdout),
        Some(Command::Login) => menu::login(&auth, &mut prompter, &mut stdout, on_success),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let args = Args::try_parse_from(["usb-tracker-gate"]).unwrap();
        assert!(args.command.is_none());

        let args = Args::try_parse_from(["usb-tracker-gate", "login"]).unwrap();
        assert_eq!(args.command, Some(Command::Login));

        let args = Args::try_parse_from(["usb-tracker-gate", "-l", "debug", "register"]).unwrap();
        assert_eq!(args.command, Some(Command::Register));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Args::try_parse_from(["usb-tracker-gate", "delete"]).is_err());
    }
}
