//! Colored one-line status reports on stderr.
//!
//! These are for the person at the terminal. Failing to print one is logged
//! and otherwise ignored.

use std::io::{self, stderr, Stderr};

use crossterm::{
    style::{Print, ResetColor, Stylize},
    ExecutableCommand,
};

fn emit(f: impl FnOnce(&mut Stderr) -> io::Result<&mut Stderr>) {
    let mut err = stderr();
    if let Err(e) = f(&mut err).and_then(|err| err.execute(ResetColor)) {
        tracing::debug!(error = %e, "could not write status line");
    }
}

pub(crate) fn up_to_date(name: &str) {
    emit(|err| {
        err.execute(Print(name))?
            .execute(Print(" is healthy and up to date.".green().bold()))?
            .execute(Print(" Release the hounds.\n".bold()))
    })
}

pub(crate) fn updating(name: &str, exists: bool) {
    let why = if exists {
        " binary is unhealthy or out of date."
    } else {
        " binary is missing."
    };
    emit(|err| {
        err.execute(Print("Local ".red().bold()))?
            .execute(Print(name.bold()))?
            .execute(Print(why.red().bold()))?
            .execute(Print(" Updating now...\n".bold()))
    })
}

pub(crate) fn updated(name: &str, bytes: u64) {
    emit(|err| {
        err.execute(Print(name))?
            .execute(Print(" has been updated!".green()))?
            .execute(Print(format!(" ({bytes} bytes)\n").dim()))
    })
}

pub(crate) fn port_clear(port: u16) {
    emit(|err| {
        err.execute(Print("Port ".green().bold()))?
            .execute(Print(port.to_string().bold()))?
            .execute(Print(" is clear.".green().bold()))?
            .execute(Print(" Ready to launch.\n".bold()))
    })
}

pub(crate) fn launched(what: &str, pid: Option<u32>) {
    let pid = pid.map_or_else(|| "?".to_string(), |pid| pid.to_string());
    emit(|err| {
        err.execute(Print("Started ".magenta().italic()))?
            .execute(Print(what))?
            .execute(Print(format!(" (pid {pid})\n").magenta().italic()))
    })
}

/// Report a fatal error in the launcher's voice before exiting.
pub fn fatal(message: &str) {
    emit(|err| {
        err.execute(Print(message.red().bold()))?
            .execute(Print(" Exiting now.\n".bold()))
    })
}
