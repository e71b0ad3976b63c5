//! Authentication menu
//!
//! Usernames are read as lines and passwords without echo. Every failure
//! becomes a message and the menu keeps running until Exit, end of input
//! or Ctrl+C.

use crate::auth::Authenticator;
use crate::error::GateError;
use crate::launch::LaunchOutcome;
use crate::store::UserStore;
use anyhow::Result;
use std::io::Write;
use tracing::warn;

/// Source of typed input
pub trait Prompter {
    /// Read a visible line
    fn line(&mut self, prompt: &str) -> common::Result<String>;

    /// Read a secret without echo
    fn secret(&mut self, prompt: &str) -> common::Result<String>;
}

/// Prompts on the controlling terminal
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn line(&mut self, prompt: &str) -> common::Result<String> {
        common::prompt_line(prompt)
    }

    fn secret(&mut self, prompt: &str) -> common::Result<String> {
        common::prompt_secret(prompt)
    }
}

/// Ask for a new username and password and register them
pub fn register<S, P, W>(auth: &mut Authenticator<S>, prompter: &mut P, out: &mut W) -> Result<()>
where
    S: UserStore,
    P: Prompter,
    W: Write,
{
    let username = prompter.line("Enter a new username: ")?;
    let password = prompter.secret("Enter password: ")?;
    let confirm = prompter.secret("Confirm password: ")?;

    match auth.register(&username, &password, &confirm) {
        Ok(()) => writeln!(out, "Registration successful.")?,
        Err(e) => report(out, e)?,
    }
    Ok(())
}

/// Ask for credentials and run `on_success` with the username once they check out
pub fn login<S, P, W, F>(
    auth: &Authenticator<S>,
    prompter: &mut P,
    out: &mut W,
    mut on_success: F,
) -> Result<()>
where
    S: UserStore,
    P: Prompter,
    W: Write,
    F: FnMut(&str) -> Result<LaunchOutcome>,
{
    let username = prompter.line("Enter username: ")?;
    let password = prompter.secret("Enter password: ")?;

    let username = match auth.login(&username, &password) {
        Ok(username) => username,
        Err(e) => {
            report(out, e)?;
            return Ok(());
        }
    };

    writeln!(out, "Login successful. Welcome, {}!", username)?;
    match on_success(&username) {
        Ok(LaunchOutcome::Exited(_)) => {}
        Ok(LaunchOutcome::NotFound) => {
            writeln!(out, "Error: the USB tracker program was not found.")?;
        }
        Err(e) => {
            warn!("Launch failed: {:#}", e);
            writeln!(out, "Error: {:#}", e)?;
        }
    }
    Ok(())
}

/// Print a gate error as a message
fn report<W: Write>(out: &mut W, e: GateError) -> std::io::Result<()> {
    if e.is_user_error() {
        writeln!(out, "{}", e)
    } else {
        warn!("{}", e);
        writeln!(out, "Error: {}", e)
    }
}

/// True when the user closed input or pressed Ctrl+C
fn is_end_of_input(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<common::Error>(),
        Some(common::Error::InputClosed | common::Error::Interrupted)
    )
}

/// Run the menu loop until Exit or end of input
pub fn run_menu<S, P, W, F>(
    auth: &mut Authenticator<S>,
    prompter: &mut P,
    out: &mut W,
    mut on_success: F,
) -> Result<()>
where
    S: UserStore,
    P: Prompter,
    W: Write,
    F: FnMut(&str) -> Result<LaunchOutcome>,
{
    loop {
        writeln!(out, "\nUser Authentication")?;
        writeln!(out, "1. Register")?;
        writeln!(out, "2. Login")?;
        writeln!(out, "3. Exit")?;

        let choice = match prompter.line("Choose an option: ") {
            Ok(choice) => choice,
            Err(common::Error::InputClosed | common::Error::Interrupted) => break,
            Err(e) => return Err(e.into()),
        };

        let result = match choice.as_str() {
            "1" => register(auth, prompter, out),
            "2" => login(auth, prompter, out, &mut on_success),
            "3" => break,
            _ => {
                writeln!(out, "Invalid choice. Please enter 1, 2, or 3.")?;
                Ok(())
            }
        };

        if let Err(e) = result {
            if is_end_of_input(&e) {
                writeln!(out)?;
                break;
            }
            writeln!(out, "Error: {:#}", e)?;
        }
    }

    writeln!(out, "Exiting...")?;
    Ok(())
}
