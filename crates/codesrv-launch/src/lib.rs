//! Keep a local code-server binary current, then launch it and a browser
//!
//! # Usage
//!
//! The download host publishes an S3 style bucket listing at its root and
//! serves every artifact at `<host>/<key>`. On each start the launcher
//! compares the modification time of the installed binary against the
//! listing's `LastModified` for the tracked key. If the local binary is
//! missing, or not strictly newer than the published one, it is downloaded
//! again. Then the port is probed, and the server and a browser pointed at it
//! are started.
//!
//! # Example
//!
//! Check and install, without launching anything:
//!
//! ```no_run
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = codesrv_launch::builder()
//!         .bin_dir("/tmp/code-server/bin")
//!         .build()?;
//!     let client = codesrv_launch::client()?;
//!
//!     codesrv_launch::ensure_current(&config, &client).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Do all of it, and wait until both children have exited:
//!
//! ```no_run
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = codesrv_launch::builder().build()?;
//!
//!     let launched = codesrv_launch::run(&config).await?;
//!     launched.wait().await;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod freshness;
mod install;
mod launch;
mod listing;
mod port;
pub mod status;

pub use config::{builder, LauncherConfig, LauncherConfigBuilder, LauncherConfigBuilderError};
pub use error::{Error, Result};
pub use freshness::{check, fetch_listing, is_fresh, Freshness};
pub use install::install;
pub use launch::{launch, Exits, Invocation, Launched};
pub use listing::{Entry, ListBucketResult};
pub use port::{ensure_port_free, is_port_free};

use reqwest::Client;

/// What [`ensure_current`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The installed binary is newer than the published one.
    UpToDate,
    /// The binary was missing or stale and has been downloaded.
    Installed {
        /// Size of the new binary.
        bytes: u64,
    },
}

/// An HTTP client for the listing and the download. No timeouts are set.
pub fn client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Error::Client)
}

/// Make sure the configured binary is installed and current.
pub async fn ensure_current(config: &LauncherConfig, client: &Client) -> Result<Outcome> {
    let bin_path = config.bin_path();
    let name = bin_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| bin_path.display().to_string());

    let freshness = check(
        client,
        &bin_path,
        config.listing_url(),
        config.artifact_key(),
    )
    .await?;

    if freshness.is_fresh {
        tracing::info!(path = %bin_path.display(), "binary is up to date");
        status::up_to_date(&name);
        return Ok(Outcome::UpToDate);
    }

    status::updating(&name, freshness.exists);
    let bytes = install(
        client,
        &bin_path,
        &config.artifact_url(),
        config.permissions(),
    )
    .await?;
    status::updated(&name, bytes);

    Ok(Outcome::Installed { bytes })
}

/// Install or update the binary, check the port, then start the server and
/// the browser.
///
/// Nothing is spawned unless every earlier step succeeded.
pub async fn run(config: &LauncherConfig) -> Result<Launched> {
    let client = client()?;
    ensure_current(config, &client).await?;

    ensure_port_free(config.port())?;
    status::port_clear(config.port());

    launch(&config.server_invocation(), &config.browser_invocation())
}
