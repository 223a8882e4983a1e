//! Directory-backed blob store.
//!
//! Each blob lives in `<key>.json` inside a capability-scoped directory.
//! Writes go to a temporary sibling first and are renamed over the target,
//! so a reader never observes a partially written blob.

use std::io::ErrorKind;
use std::sync::Mutex;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tracing::debug;

use crate::board::{
    domain::BlobKey,
    ports::{BlobStore, BlobStoreError, BlobStoreResult},
};

/// Blob store rooted at a single directory.
#[derive(Debug)]
pub struct DirBlobStore {
    dir: Dir,
    write_lock: Mutex<()>,
}

impl DirBlobStore {
    /// Opens the store, creating the directory when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStoreError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(path: &Utf8Path) -> BlobStoreResult<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        debug!(path = %path, "opened blob directory");
        Ok(Self::from_dir(dir))
    }

    /// Wraps an already opened directory capability.
    #[must_use]
    pub const fn from_dir(dir: Dir) -> Self {
        Self {
            dir,
            write_lock: Mutex::new(()),
        }
    }
}

fn blob_file_name(key: &BlobKey) -> String {
    format!("{key}.json")
}

fn staging_file_name(key: &BlobKey) -> String {
    format!(".{key}.json.tmp")
}

impl BlobStore for DirBlobStore {
    fn read(&self, key: &BlobKey) -> BlobStoreResult<Option<String>> {
        match self.dir.read_to_string(blob_file_name(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &BlobKey, contents: &str) -> BlobStoreResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|err| BlobStoreError::Unavailable(err.to_string()))?;
        let staging = staging_file_name(key);
        self.dir.write(&staging, contents)?;
        self.dir.rename(&staging, &self.dir, blob_file_name(key))?;
        Ok(())
    }
}
