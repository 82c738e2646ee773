#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::SystemTime,
};

use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use codesrv_launch::{LauncherConfig, LauncherConfigBuilder};
use tempfile::TempDir;

pub const KEY: &str = "latest-linux";
pub const PUBLISHED: &str = "2019-04-20T01:32:20Z";

/// A bucket served from an ephemeral local port, counting hits.
pub struct Bucket {
    pub url: String,
    listing_hits: Arc<AtomicUsize>,
    download_hits: Arc<AtomicUsize>,
}

impl Bucket {
    /// Serve `listing` at `/` and each `(key, body)` at `/<key>`.
    pub async fn serve(listing: String, artifacts: &[(&str, &[u8])]) -> Self {
        let listing_hits = Arc::new(AtomicUsize::new(0));
        let download_hits = Arc::new(AtomicUsize::new(0));

        let hits = Arc::clone(&listing_hits);
        let mut app = Router::new().route(
            "/",
            get(move || async move {
                hits.fetch_add(1, Ordering::SeqCst);
                listing
            }),
        );
        for (key, body) in artifacts {
            let hits = Arc::clone(&download_hits);
            let body = body.to_vec();
            app = app.route(
                &format!("/{key}"),
                get(move || async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    body
                }),
            );
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        Bucket {
            url: format!("http://{addr}/"),
            listing_hits,
            download_hits,
        }
    }

    pub fn listing_hits(&self) -> usize {
        self.listing_hits.load(Ordering::SeqCst)
    }

    pub fn download_hits(&self) -> usize {
        self.download_hits.load(Ordering::SeqCst)
    }
}

/// An S3 style listing with one `Contents` per `(key, last_modified)`.
pub fn listing(entries: &[(&str, &str)]) -> String {
    let contents: String = entries
        .iter()
        .map(|(key, last_modified)| {
            format!(
                "<Contents><Key>{key}</Key><Generation>1</Generation>\
                 <LastModified>{last_modified}</LastModified>\
                 <ETag>\"d85a301acee0a0749660a802767c95c3\"</ETag><Size>42</Size></Contents>"
            )
        })
        .collect();
    format!(
        "<?xml version='1.0' encoding='UTF-8'?>\
         <ListBucketResult xmlns=\"http://doc.s3.amazonaws.com/2006-03-01\">\
         <Name>codesrv-ci.cdr.sh</Name><Prefix/><Marker/><IsTruncated>false</IsTruncated>\
         {contents}</ListBucketResult>"
    )
}

/// An isolated install directory.
pub struct Home {
    _tmp: TempDir,
    pub bin_dir: PathBuf,
}

impl Home {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let bin_dir = tmp.path().join("share/code-server/bin");
        Home { _tmp: tmp, bin_dir }
    }

    pub fn config(&self, bucket: &Bucket) -> LauncherConfigBuilder {
        let mut builder = codesrv_launch::builder();
        builder.base_url(bucket.url.clone()).bin_dir(&self.bin_dir);
        builder
    }

    pub fn build(&self, bucket: &Bucket) -> LauncherConfig {
        self.config(bucket).build().unwrap()
    }

    /// Put a binary in place with the given modification time.
    pub fn install_old(&self, config: &LauncherConfig, contents: &[u8], modified: &str) {
        let path = config.bin_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        set_mtime(&path, modified);
    }
}

/// Pin the modification time of a file or directory.
pub fn set_mtime(path: &Path, at: &str) {
    let at: DateTime<Utc> = at.parse().unwrap();
    fs::File::open(path)
        .unwrap()
        .set_modified(SystemTime::from(at))
        .unwrap();
}
