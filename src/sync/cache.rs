//! Content-hash cache for the tracked binary asset
//!
//! Stores one hex SHA-256 in a plain-text side file so an unchanged
//! blob is never re-staged across runs. The format carries no algorithm
//! tag; comparisons only make sense against hashes this module produced.

use crate::error::{ShipError, ShipResult};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::debug;

const HASH_CHUNK_SIZE: usize = 8192;

/// Hash a file's contents with SHA-256, streaming in fixed-size chunks.
///
/// Returns `None` when the file does not exist.
pub async fn hash_file(path: &Path) -> ShipResult<Option<String>> {
    let mut file = match fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ShipError::io(format!("opening {}", path.display()), e)),
    };

    let mut hasher = Sha256::new();
    let mut buf = [0u8; HASH_CHUNK_SIZE];

    loop {
        let read = file
            .read(&mut buf)
            .await
            .map_err(|e| ShipError::io(format!("reading {}", path.display()), e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(Some(hex::encode(hasher.finalize())))
}

/// Persists the hash of the tracked asset as of the last stage
pub struct HashCache {
    path: PathBuf,
}

impl HashCache {
    /// Open a cache backed by the given side file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The side file backing this cache
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached hash, `None` when no cache exists yet
    pub async fn read(&self) -> ShipResult<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let hash = content.trim().to_string();
                Ok((!hash.is_empty()).then_some(hash))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ShipError::io(
                format!("reading cache {}", self.path.display()),
                e,
            )),
        }
    }

    /// Overwrite the cache with a fresh hash
    pub async fn write(&self, hash: &str) -> ShipResult<()> {
        fs::write(&self.path, hash).await.map_err(|e| {
            ShipError::io(format!("writing cache {}", self.path.display()), e)
        })?;
        debug!("Cached hash {} in {}", hash, self.path.display());
        Ok(())
    }
}

/// True when the file's current hash differs from the cached one.
///
/// A missing file counts as changed, so a cache with no file behind it
/// never suppresses a future stage.
pub async fn has_changed(path: &Path, cache: &HashCache) -> ShipResult<bool> {
    let current = match hash_file(path).await? {
        Some(hash) => hash,
        None => {
            debug!("{} missing, treating as changed", path.display());
            return Ok(true);
        }
    };

    match cache.read().await? {
        Some(cached) => Ok(cached != current),
        None => Ok(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn hash_missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        let hash = hash_file(&temp.path().join("absent.bin")).await.unwrap();
        assert!(hash.is_none());
    }

    #[tokio::test]
    async fn hash_is_deterministic() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("asset.bin");
        std::fs::write(&path, b"binary payload").unwrap();

        let hash1 = hash_file(&path).await.unwrap().unwrap();
        let hash2 = hash_file(&path).await.unwrap().unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[tokio::test]
    async fn hash_spans_chunk_boundaries() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("large.bin");
        std::fs::write(&path, vec![0xabu8; HASH_CHUNK_SIZE * 3 + 17]).unwrap();

        let streamed = hash_file(&path).await.unwrap().unwrap();

        let mut hasher = Sha256::new();
        hasher.update(std::fs::read(&path).unwrap());
        assert_eq!(streamed, hex::encode(hasher.finalize()));
    }

    #[tokio::test]
    async fn cache_read_write_roundtrip() {
        let temp = TempDir::new().unwrap();
        let cache = HashCache::new(temp.path().join(".shipit-cache"));

        assert!(cache.read().await.unwrap().is_none());

        cache.write("deadbeef").await.unwrap();
        assert_eq!(cache.read().await.unwrap().as_deref(), Some("deadbeef"));
    }

    #[tokio::test]
    async fn cache_read_trims_whitespace() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".shipit-cache");
        std::fs::write(&path, "cafebabe\n").unwrap();

        let cache = HashCache::new(path);
        assert_eq!(cache.read().await.unwrap().as_deref(), Some("cafebabe"));
    }

    #[tokio::test]
    async fn changed_without_cache() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("asset.bin");
        std::fs::write(&path, b"v1").unwrap();

        let cache = HashCache::new(temp.path().join(".shipit-cache"));
        assert!(has_changed(&path, &cache).await.unwrap());
    }

    #[tokio::test]
    async fn unchanged_when_cache_matches() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("asset.bin");
        std::fs::write(&path, b"v1").unwrap();

        let cache = HashCache::new(temp.path().join(".shipit-cache"));
        let hash = hash_file(&path).await.unwrap().unwrap();
        cache.write(&hash).await.unwrap();

        assert!(!has_changed(&path, &cache).await.unwrap());
    }

    #[tokio::test]
    async fn changed_after_content_edit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("asset.bin");
        std::fs::write(&path, b"v1").unwrap();

        let cache = HashCache::new(temp.path().join(".shipit-cache"));
        let hash = hash_file(&path).await.unwrap().unwrap();
        cache.write(&hash).await.unwrap();

        std::fs::write(&path, b"v2").unwrap();
        assert!(has_changed(&path, &cache).await.unwrap());
    }

    #[tokio::test]
    async fn missing_file_is_changed() {
        let temp = TempDir::new().unwrap();
        let cache = HashCache::new(temp.path().join(".shipit-cache"));
        cache.write("deadbeef").await.unwrap();

        assert!(has_changed(&temp.path().join("gone.bin"), &cache)
            .await
            .unwrap());
    }
}
