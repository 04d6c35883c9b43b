//! # Registrar FileSystem Content Store
//!
//! A local filesystem backend for the registrar.
//!
//! This crate implements the [`ContentStore`] trait, storing every blob in a file named
//! after its CIDv0 content address.
//!
//! ## Features
//!
//! * **Atomic Writes**: Uses temporary files and rename operations so a blob is never read partially.
//! * **Integrity**: Downloads are re-hashed and rejected if the file no longer matches its address.
//!
//! ## Usage
//!
//! ```no_run
//! use registrar_fs::FileSystemContentStore;
//!
//! let store = FileSystemContentStore::new("./registrar_data");
//! ```

use bytes::Bytes;
use registrar_core::prelude::*;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

async fn atomic_write(path: &std::path::Path, data: &[u8]) -> Result<(), ContentError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    // Unique per writer, concurrent uploads of the same blob must not share it.
    let tmp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4()));

    fs::write(&tmp_path, data).await?;
    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }

    Ok(())
}

#[derive(Clone)]
pub struct FileSystemContentStore {
    root: PathBuf,
}

impl FileSystemContentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { root: path.into() }
    }

    fn get_path(&self, address: &ContentAddress) -> PathBuf {
        self.root.join("blobs").join(address.as_str())
    }
}

impl ContentStore for FileSystemContentStore {
    async fn upload(&self, data: Bytes) -> Result<ContentAddress, ContentError> {
        let address = ContentDigest::of(&data).to_address();
        let path = self.get_path(&address);
        if fs::try_exists(&path).await? {
            return Ok(address);
        }
        atomic_write(&path, &data).await?;
        Ok(address)
    }

    async fn download(&self, address: &ContentAddress) -> Result<Bytes, ContentError> {
        let path = self.get_path(address);
        let data = match fs::read(&path).await {
            Ok(data) => Bytes::from(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ContentError::NotFound(address.to_string()));
            }
            Err(e) => return Err(ContentError::Io(e)),
        };

        if &ContentDigest::of(&data).to_address() != address {
            return Err(ContentError::System(format!(
                "Integrity check failed for {address}"
            )));
        }

        Ok(data)
    }
}
