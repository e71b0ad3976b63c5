//! Launch the tracker after a successful login

use crate::config::LaunchSettings;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::process::{Command, ExitStatus};
use tracing::{info, warn};

/// How a launch attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The tool ran and exited
    Exited(ExitStatus),
    /// The configured program does not exist
    NotFound,
}

/// Run the configured program and wait for it to exit
pub fn launch(settings: &LaunchSettings) -> Result<LaunchOutcome> {
    info!("Launching {} {:?}", settings.program, settings.args);

    match Command::new(&settings.program).args(&settings.args).status() {
        Ok(status) => {
            if !status.success() {
                warn!("{} exited with {}", settings.program, status);
            }
            Ok(LaunchOutcome::Exited(status))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(LaunchOutcome::NotFound),
        Err(e) => Err(e).with_context(|| format!("Failed to launch '{}'", settings.program)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(program: &str, args: &[&str]) -> LaunchSettings {
        LaunchSettings {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_launch_waits_for_exit() {
        let outcome = launch(&settings("sh", &["-c", "exit 3"])).unwrap();
        let LaunchOutcome::Exited(status) = outcome else {
            panic!("expected the program to run");
        };
        assert_eq!(status.code(), Some(3));
    }

    #[test]
    fn test_launch_missing_program() {
        let outcome = launch(&settings("definitely-not-usb-tracker", &[])).unwrap();
        assert_eq!(outcome, LaunchOutcome::NotFound);
    }
}
