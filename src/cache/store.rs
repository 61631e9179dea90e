use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

use super::CredentialRecord;

/// Load a cached record from `path`.
///
/// Any failure (missing file, unreadable file, malformed JSON) is a cache
/// miss, never an error; the caller falls back to a fresh exchange.
pub async fn load(path: &Path) -> Option<CredentialRecord> {
    let contents = fs::read_to_string(path).await.ok()?;

    match serde_json::from_str(&contents) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!("Ignoring malformed cache file {}: {}", path.display(), e);
            None
        }
    }
}

/// Save a record to `path`, overwriting any existing file.
///
/// Parent directories are created as needed and the file is created with
/// owner-only read/write permissions. Write failures are fatal.
pub async fn save(path: &Path, record: &CredentialRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(record).context("Failed to serialize credentials")?;

    write_restricted(path, &json)
        .await
        .with_context(|| format!("Failed to write cache file: {}", path.display()))?;

    debug!("Credentials cached at {}", path.display());
    Ok(())
}

#[cfg(unix)]
async fn write_restricted(path: &Path, contents: &str) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .await?;
    file.write_all(contents.as_bytes()).await?;
    file.flush().await
}

#[cfg(not(unix))]
async fn write_restricted(path: &Path, contents: &str) -> std::io::Result<()> {
    fs::write(path, contents).await
}
