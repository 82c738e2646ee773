use std::{io, path::Path};

use reqwest::Client;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

/// Replace the binary at `local_path` with the artifact at `artifact_url`.
///
/// Steps, each of which aborts the install on failure:
/// - remove the old binary, if there is one
/// - create the parent directories with mode `permissions`
/// - stream the response body into a fresh file
/// - set the file's mode to `permissions`
///
/// A failed download can leave a partial file behind; nothing cleans it up.
///
/// Returns the number of bytes written.
pub async fn install(
    client: &Client,
    local_path: &Path,
    artifact_url: &str,
    permissions: u32,
) -> Result<u64> {
    match tokio::fs::remove_file(local_path).await {
        Ok(()) => tracing::debug!(path = %local_path.display(), "removed old binary"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io("remove", local_path)(e)),
    }

    if let Some(parent) = local_path.parent() {
        create_dirs(parent, permissions).await?;
    }

    let download_err = |source| Error::Download {
        url: artifact_url.to_string(),
        source,
    };
    let mut response = client
        .get(artifact_url)
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(download_err)?;

    let mut file = tokio::fs::File::create(local_path)
        .await
        .map_err(Error::io("create", local_path))?;

    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await.map_err(download_err)? {
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::io("write", local_path)(e))?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(Error::io("write", local_path))?;
    drop(file);

    set_mode(local_path, permissions).await?;

    tracing::info!(
        path = %local_path.display(),
        url = artifact_url,
        bytes = written,
        "installed binary"
    );

    Ok(written)
}

#[cfg(unix)]
async fn create_dirs(dir: &Path, permissions: u32) -> Result<()> {
    tokio::fs::DirBuilder::new()
        .recursive(true)
        .mode(permissions)
        .create(dir)
        .await
        .map_err(Error::io("create directory", dir))
}

#[cfg(not(unix))]
async fn create_dirs(dir: &Path, _permissions: u32) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(Error::io("create directory", dir))
}

#[cfg(unix)]
async fn set_mode(path: &Path, permissions: u32) -> Result<()> {
    use std::{fs::Permissions, os::unix::fs::PermissionsExt};

    tokio::fs::set_permissions(path, Permissions::from_mode(permissions))
        .await
        .map_err(Error::io("chmod", path))
}

#[cfg(not(unix))]
async fn set_mode(_path: &Path, _permissions: u32) -> Result<()> {
    Ok(())
}
