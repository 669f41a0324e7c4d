//! Artifact store: write-once files under collision-free names.
//!
//! Names combine a tier prefix, the creation time in milliseconds and a random
//! suffix. Files are opened with `create_new`, so a name that somehow already
//! exists is never overwritten; a fresh name is drawn instead.
//!
//! Uploaded inputs are staged under `.incoming/` and removed when their
//! [`StagedInput`] guard drops, whichever way the operation exits.

use blake3::Hasher as Blake3Hasher;
use chrono::Utc;
use rand::Rng;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::{BrandmarkError, Result};
use crate::types::Artifact;

const INCOMING_DIR: &str = ".incoming";
const MAX_NAME_ATTEMPTS: usize = 8;

/// Filesystem-backed artifact store.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(INCOMING_DIR)).await?;
        tracing::debug!("Artifact store at {:?}", root);
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist `content` under a new unique name.
    pub async fn write(
        &self,
        prefix: &str,
        extension: &str,
        content: Vec<u8>,
    ) -> io::Result<Artifact> {
        let (filename, path, mut file) = self.create_unique(&self.root, prefix, extension).await?;
        file.write_all(&content).await?;
        file.flush().await?;

        let artifact = Artifact {
            filename,
            path,
            size: content.len() as u64,
            content_hash: content_hash(&content),
            created_at: Utc::now(),
            content,
        };
        tracing::debug!(
            "Stored {} ({} bytes, blake3 {})",
            artifact.filename,
            artifact.size,
            &artifact.content_hash[..12]
        );
        Ok(artifact)
    }

    /// Read an artifact back, byte for byte.
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.resolve(filename)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            // Directories report an OS-specific kind, so check the path itself
            Err(e) if e.kind() == ErrorKind::NotFound || path.is_dir() => {
                Err(BrandmarkError::NotFound(filename.to_string()))
            }
            Err(e) => Err(BrandmarkError::Io(e)),
        }
    }

    /// Whether a readable artifact with this name exists.
    pub fn contains(&self, filename: &str) -> bool {
        self.resolve(filename).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Write transient input bytes to the staging area.
    pub async fn stage(&self, bytes: &[u8]) -> io::Result<StagedInput> {
        let dir = self.root.join(INCOMING_DIR);
        fs::create_dir_all(&dir).await?;
        let (_, path, mut file) = self.create_unique(&dir, "upload", "bin").await?;
        let staged = StagedInput { path };
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(staged)
    }

    /// Number of inputs currently staged.
    pub fn staged_count(&self) -> usize {
        std::fs::read_dir(self.root.join(INCOMING_DIR))
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }

    /// Map a caller-supplied name to a path inside the store.
    ///
    /// Names with separators, `..`, or a leading dot never resolve.
    fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let valid = !filename.is_empty()
            && !filename.starts_with('.')
            && !filename.contains(['/', '\\'])
            && !filename.contains("..");
        if !valid {
            return Err(BrandmarkError::NotFound(filename.to_string()));
        }
        Ok(self.root.join(filename))
    }

    async fn create_unique(
        &self,
        dir: &Path,
        prefix: &str,
        extension: &str,
    ) -> io::Result<(String, PathBuf, fs::File)> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let filename = unique_name(prefix, extension);
            let path = dir.join(&filename);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((filename, path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }
        Err(io::Error::new(
            ErrorKind::AlreadyExists,
            format!("could not find a free name for prefix '{prefix}'"),
        ))
    }
}

/// `<prefix>-<unix millis>-<random 0..1e9>.<ext>`
fn unique_name(prefix: &str, extension: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{prefix}-{millis}-{suffix}.{extension}")
}

/// BLAKE3 hex digest of an in-memory buffer.
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Blake3Hasher::new();
    hasher.update(data);
    hasher.finalize().to_hex().to_string()
}

/// Scope guard for an uploaded input; deletes the staged file on drop.
#[derive(Debug)]
pub struct StagedInput {
    path: PathBuf,
}

impl StagedInput {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedInput {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::trace!("Removed staged input {:?}", self.path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove staged input {:?}: {e}", self.path),
        }
    }
}
