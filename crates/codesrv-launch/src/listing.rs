//! The bucket listing served at the root of the download host.
//!
//! The host answers a plain `GET /` with an S3 style `ListBucketResult`:
//!
//! ```xml
//! <ListBucketResult xmlns="http://doc.s3.amazonaws.com/2006-03-01">
//!   <Name>codesrv-ci.cdr.sh</Name>
//!   <Prefix/>
//!   <Marker/>
//!   <IsTruncated>false</IsTruncated>
//!   <Contents>
//!     <Key>latest-linux</Key>
//!     <Generation>1555723940832425</Generation>
//!     <MetaGeneration>1</MetaGeneration>
//!     <LastModified>2019-04-20T01:32:20.832Z</LastModified>
//!     <ETag>"d85a301acee0a0749660a802767c95c3"</ETag>
//!     <Size>94109479</Size>
//!   </Contents>
//! </ListBucketResult>
//! ```
//!
//! Elements we have no use for are skipped.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};

/// A parsed bucket listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListBucketResult {
    /// The bucket name.
    #[serde(default)]
    pub name: String,
    /// The prefix the listing was filtered by.
    #[serde(default)]
    pub prefix: String,
    /// Pagination marker.
    #[serde(default)]
    pub marker: String,
    /// Page size the server used, when it reports one.
    #[serde(default)]
    pub max_keys: Option<u64>,
    /// Whether more entries exist beyond this page.
    #[serde(default)]
    pub is_truncated: bool,
    /// The objects in the bucket, in document order.
    #[serde(default)]
    pub contents: Vec<Entry>,
}

/// One object in the bucket.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Entry {
    /// The object key, which is also the path it is downloaded from.
    pub key: String,
    /// When the object was last published.
    pub last_modified: DateTime<Utc>,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Entity tag, quotes included.
    #[serde(rename = "ETag", default)]
    pub etag: String,
    /// Storage class, if the server reports one.
    #[serde(default)]
    pub storage_class: Option<String>,
}

impl ListBucketResult {
    /// Parse a listing. `url` is only used to label errors.
    pub fn from_xml(xml: &str, url: &str) -> Result<Self> {
        quick_xml::de::from_str(xml).map_err(|source| Error::ParseListing {
            url: url.to_string(),
            source,
        })
    }

    /// The first entry with the given key. Duplicate keys after it are
    /// ignored.
    pub fn find(&self, key: &str) -> Option<&Entry> {
        self.contents.iter().find(|entry| entry.key == key)
    }
}
