//! Common utilities for usb-tracker
//!
//! This crate provides shared functionality between the tracker and the
//! credential gate, including logging setup, configuration file locations,
//! terminal prompts and error handling.

pub mod error;
pub mod logging;
pub mod paths;
pub mod prompt;

pub use error::{Error, Result};
pub use logging::{LOG_LEVELS, setup_logging, validate_log_level};
pub use prompt::{RawModeGuard, prompt_line, prompt_secret};
