//! File-backed snapshot storage.
//!
//! One snapshot file per store name under a session directory. Each write
//! replaces the whole file: the snapshot is framed with magic bytes, a
//! format version, a length prefix, and a CRC32 of the payload, written to
//! a temp file and renamed over the previous snapshot. The directory is
//! guarded by a manifest and an exclusive advisory lock so two processes
//! cannot both act as the single writer.

use super::BackingStore;
use crate::error::{Result, StoreError};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Magic bytes for the session manifest.
const MANIFEST_MAGIC: &[u8; 4] = b"TLS\0";

/// Magic bytes for snapshot files.
const SNAPSHOT_MAGIC: &[u8; 4] = b"SNP\0";

/// Current session format version.
const FORMAT_VERSION: u8 = 1;

/// Sanity cap on snapshot payloads (these are UI-sized collections).
const MAX_SNAPSHOT_BYTES: usize = 16 * 1024 * 1024;

/// File-backed [`BackingStore`] rooted at a session directory.
pub struct FileBacking {
    path: PathBuf,

    /// Held for the lifetime of the backing; the advisory lock releases
    /// when this handle drops.
    _lock_file: File,
}

impl FileBacking {
    /// Open an existing session directory or create a new one.
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Create a new session directory.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path)?;
        Self::write_manifest(&path)?;
        let lock_file = Self::acquire_lock(&path)?;

        Ok(Self {
            path,
            _lock_file: lock_file,
        })
    }

    /// Open an existing session directory. Fails with [`StoreError::NotInitialized`]
    /// if the directory does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(StoreError::NotInitialized);
        }
        Self::verify_manifest(&path)?;
        let lock_file = Self::acquire_lock(&path)?;

        Ok(Self {
            path,
            _lock_file: lock_file,
        })
    }

    fn write_manifest(path: &Path) -> Result<()> {
        let mut file = File::create(path.join("manifest"))?;
        file.write_all(MANIFEST_MAGIC)?;
        file.write_all(&[FORMAT_VERSION])?;
        file.sync_all()?;
        Ok(())
    }

    fn verify_manifest(path: &Path) -> Result<()> {
        let manifest = path.join("manifest");
        if !manifest.exists() {
            return Err(StoreError::NotInitialized);
        }

        let mut file = File::open(manifest)?;
        let mut magic = [0u8; 4];
        file.read_exact(&mut magic)?;
        if &magic != MANIFEST_MAGIC {
            return Err(StoreError::InvalidFormat("Invalid manifest magic".into()));
        }

        let mut version = [0u8; 1];
        file.read_exact(&mut version)?;
        if version[0] != FORMAT_VERSION {
            return Err(StoreError::InvalidFormat(format!(
                "Unsupported session version: {}",
                version[0]
            )));
        }

        Ok(())
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.join(".lock"))?;
        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::Locked)?;
        Ok(lock_file)
    }

    fn snapshot_path(&self, store: &str) -> PathBuf {
        self.path.join(format!("{}.snap", store))
    }
}

impl BackingStore for FileBacking {
    fn load(&self, store: &str) -> Result<Option<Vec<u8>>> {
        let snapshot_path = self.snapshot_path(store);
        if !snapshot_path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&snapshot_path)?;

        let mut magic = [0u8; 4];
        file.read_exact(&mut magic)?;
        if &magic != SNAPSHOT_MAGIC {
            return Err(StoreError::InvalidFormat("Invalid snapshot magic".into()));
        }

        let mut version = [0u8; 1];
        file.read_exact(&mut version)?;
        if version[0] != FORMAT_VERSION {
            return Err(StoreError::InvalidFormat(format!(
                "Unsupported snapshot version: {}",
                version[0]
            )));
        }

        let mut len_bytes = [0u8; 4];
        file.read_exact(&mut len_bytes)?;
        let len = u32::from_le_bytes(len_bytes) as usize;
        if len > MAX_SNAPSHOT_BYTES {
            return Err(StoreError::Corruption(format!(
                "Snapshot for '{}' claims {} bytes",
                store, len
            )));
        }

        let mut payload = vec![0u8; len];
        file.read_exact(&mut payload)?;

        let mut checksum_bytes = [0u8; 4];
        file.read_exact(&mut checksum_bytes)?;
        let stored_checksum = u32::from_le_bytes(checksum_bytes);
        let computed_checksum = crc32fast::hash(&payload);
        if stored_checksum != computed_checksum {
            return Err(StoreError::ChecksumMismatch {
                expected: stored_checksum,
                got: computed_checksum,
            });
        }

        Ok(Some(payload))
    }

    fn save(&self, store: &str, payload: &[u8]) -> Result<()> {
        let final_path = self.snapshot_path(store);
        let tmp_path = self.path.join(format!("{}.snap.tmp", store));

        let mut file = File::create(&tmp_path)?;
        file.write_all(SNAPSHOT_MAGIC)?;
        file.write_all(&[FORMAT_VERSION])?;
        file.write_all(&(payload.len() as u32).to_le_bytes())?;
        file.write_all(payload)?;
        file.write_all(&crc32fast::hash(payload).to_le_bytes())?;
        file.sync_all()?;
        drop(file);

        // Atomic replace; a crash mid-write leaves the old snapshot intact.
        fs::rename(&tmp_path, &final_path)?;
        Ok(())
    }
}
