use std::{io, path::Path};

use chrono::{DateTime, Utc};
use reqwest::Client;

use crate::{
    error::{Error, Result},
    listing::ListBucketResult,
};

/// What the checker found out about the local binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    /// The binary is on disk.
    pub exists: bool,
    /// The binary is strictly newer than the published artifact.
    pub is_fresh: bool,
}

impl Freshness {
    const MISSING: Freshness = Freshness {
        exists: false,
        is_fresh: false,
    };
}

/// A local copy counts as fresh only when it was written strictly after the
/// artifact was published. Equal timestamps mean stale.
pub fn is_fresh(local: DateTime<Utc>, published: DateTime<Utc>) -> bool {
    local > published
}

/// Compare the binary at `local_path` against the entry `key` in the listing
/// at `listing_url`.
///
/// A missing binary is reported without touching the network. A listing
/// without `key` is [`Error::KeyNotFound`], whatever the local state.
pub async fn check(
    client: &Client,
    local_path: &Path,
    listing_url: &str,
    key: &str,
) -> Result<Freshness> {
    let metadata = match tokio::fs::metadata(local_path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %local_path.display(), "no local binary");
            return Ok(Freshness::MISSING);
        }
        Err(e) => return Err(Error::io("stat", local_path)(e)),
    };
    let local: DateTime<Utc> = metadata
        .modified()
        .map_err(Error::io("read modification time of", local_path))?
        .into();

    let listing = fetch_listing(client, listing_url).await?;
    let entry = listing.find(key).ok_or_else(|| Error::KeyNotFound {
        key: key.to_string(),
        url: listing_url.to_string(),
    })?;

    let is_fresh = is_fresh(local, entry.last_modified);
    tracing::debug!(
        %local,
        published = %entry.last_modified,
        is_fresh,
        "compared local binary against listing"
    );

    Ok(Freshness {
        exists: true,
        is_fresh,
    })
}

/// Fetch and parse the bucket listing.
pub async fn fetch_listing(client: &Client, url: &str) -> Result<ListBucketResult> {
    let listing_err = |source| Error::Listing {
        url: url.to_string(),
        source,
    };
    let body = client
        .get(url)
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(listing_err)?
        .text()
        .await
        .map_err(listing_err)?;

    ListBucketResult::from_xml(&body, url)
}
