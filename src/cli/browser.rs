use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

use crate::common::EnvProvider;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("BROWSER is set but contains no command")]
    EmptyCommand,

    #[error("Failed to launch browser '{program}'")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Browser '{program}' exited with {status}")]
    Exit { program: String, status: ExitStatus },
}

/// Hands a URL to a web browser
pub trait BrowserLauncher {
    fn open(&self, url: &str) -> Result<(), BrowserError>;
}

/// Launches the user's browser: `$BROWSER` if set, else the platform opener
pub struct SystemBrowser<E: EnvProvider> {
    env: E,
}

impl<E: EnvProvider> SystemBrowser<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }
}

impl<E: EnvProvider> BrowserLauncher for SystemBrowser<E> {
    fn open(&self, url: &str) -> Result<(), BrowserError> {
        let mut command = browser_command(&self.env, url)?;
        let program = command.get_program().to_string_lossy().to_string();
        log::debug!("Opening {} with {}", url, program);
        run_silent_command(&mut command, program)
    }
}

/// Build the command that opens `url`
///
/// `BROWSER` may carry arguments (`firefox --new-window`); the URL is appended.
pub fn browser_command(env: &impl EnvProvider, url: &str) -> Result<Command, BrowserError> {
    if let Some(value) = env.get_var("BROWSER") {
        let mut parts = value.split_whitespace();
        let program = parts.next().ok_or(BrowserError::EmptyCommand)?;
        let mut command = Command::new(program);
        command.args(parts).arg(url);
        return Ok(command);
    }

    if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(url);
        return Ok(command);
    }

    if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", url]);
        return Ok(command);
    }

    let mut command = Command::new("xdg-open");
    command.arg(url);
    Ok(command)
}

fn run_silent_command(command: &mut Command, program: String) -> Result<(), BrowserError> {
    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(BrowserError::Exit { program, status }),
        Err(source) => Err(BrowserError::Launch { program, source }),
    }
}
