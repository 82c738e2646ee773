use std::{io, path::PathBuf};

use thiserror::Error;

/// Everything that can stop the launcher.
///
/// None of these are recovered from locally. The binary reports them and
/// exits; library callers get to decide for themselves.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    /// The listing could not be fetched, or the server refused it.
    #[error("failed to fetch listing from {url}")]
    Listing {
        /// The listing URL.
        url: String,
        /// What went wrong on the wire.
        #[source]
        source: reqwest::Error,
    },
    /// The listing was fetched but is not a bucket listing.
    #[error("failed to parse listing from {url}")]
    ParseListing {
        /// The listing URL.
        url: String,
        /// Why the document was rejected.
        #[source]
        source: quick_xml::de::DeError,
    },
    /// The listing has no entry for the artifact we track.
    #[error("no `{key}` found in listing from {url}")]
    KeyNotFound {
        /// The key that was looked for.
        key: String,
        /// The listing URL.
        url: String,
    },
    /// The artifact download failed part way or never started.
    #[error("failed to download {url}")]
    Download {
        /// The artifact URL.
        url: String,
        /// What went wrong on the wire.
        #[source]
        source: reqwest::Error,
    },
    /// A filesystem step failed.
    #[error("failed to {action} `{}`", path.display())]
    Io {
        /// The step that failed, e.g. `remove` or `chmod`.
        action: &'static str,
        /// The file or directory it was applied to.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// Something else is listening on the port we want.
    #[error("port {port} is taken")]
    PortTaken {
        /// The configured port.
        port: u16,
    },
    /// A child process could not be started.
    #[error("failed to spawn `{program}`")]
    Spawn {
        /// The program that was run.
        program: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io {
            action,
            path,
            source,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
