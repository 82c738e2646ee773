use std::{
    io,
    path::{Path, PathBuf},
    process::ExitStatus,
};

use tokio::{
    process::{Child, Command},
    sync::oneshot,
};

use crate::{
    error::{Error, Result},
    status,
};

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
}

impl Invocation {
    /// Run `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Invocation {
            program: program.into(),
            args: vec![],
        }
    }

    /// Append arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The program to run.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The arguments passed to it.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    fn spawn(&self) -> Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .spawn()
            .map_err(|source| Error::Spawn {
                program: self.program.display().to_string(),
                source,
            })
    }
}

/// How both children ended.
#[derive(Debug)]
pub struct Exits {
    /// The server's exit status, or why it could not be waited on.
    pub server: io::Result<ExitStatus>,
    /// The browser opener's exit status, or why it could not be waited on.
    pub browser: io::Result<ExitStatus>,
}

/// The running server and browser.
///
/// Dropping this does not stop either child; it only means nobody hears
/// about their exit beyond the log lines.
#[derive(Debug)]
pub struct Launched {
    /// Process id of the server.
    pub server_pid: Option<u32>,
    /// Process id of the browser opener.
    pub browser_pid: Option<u32>,
    exits: oneshot::Receiver<Exits>,
}

impl Launched {
    /// Wait until both children have exited.
    ///
    /// Returns `None` if the runtime shut the waiting task down first.
    pub async fn wait(self) -> Option<Exits> {
        self.exits.await.ok()
    }
}

/// Start the server, then the browser, and hand both to a background task
/// that waits for them and logs how they ended.
///
/// Must be called from within a tokio runtime.
pub fn launch(server: &Invocation, browser: &Invocation) -> Result<Launched> {
    let mut server_child = server.spawn()?;
    let server_pid = server_child.id();
    tracing::info!(pid = ?server_pid, program = %server.program.display(), "started server");
    status::launched("server", server_pid);

    let mut browser_child = browser.spawn()?;
    let browser_pid = browser_child.id();
    tracing::info!(pid = ?browser_pid, program = %browser.program.display(), "started browser");
    status::launched("browser", browser_pid);

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let (server, browser) = tokio::join!(server_child.wait(), browser_child.wait());
        log_exit("server", &server);
        log_exit("browser", &browser);
        // The receiver may be gone; the log lines above are all that matter
        // then.
        tx.send(Exits { server, browser }).ok();
    });

    Ok(Launched {
        server_pid,
        browser_pid,
        exits: rx,
    })
}

fn log_exit(what: &str, exit: &io::Result<ExitStatus>) {
    match exit {
        Ok(status) if status.success() => tracing::info!(%status, "{what} finished"),
        Ok(status) => tracing::warn!(%status, "{what} finished with error"),
        Err(e) => tracing::warn!(error = %e, "could not wait for {what}"),
    }
}
