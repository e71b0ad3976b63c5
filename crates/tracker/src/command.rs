//! External command execution
//!
//! The kernel log and the device inventory both come from host tools
//! (`journalctl`, `lsusb`, `lsblk`). They are run through [`CommandRunner`]
//! so the parsing around them can be exercised without the tools.

use anyhow::{Context, Result, bail};
use std::process::Command;
use tracing::debug;

/// Runs a program and returns its standard output
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String>;
}

/// Runs programs on the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        debug!("Running {} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run '{}'", program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "'{}' exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
