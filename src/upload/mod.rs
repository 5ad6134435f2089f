//! File selection and the multipart upload transport
//!
//! A [`FileSelection`] is only a reference to a local file: nothing is read
//! until [`Uploader::upload`] builds the request body.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod testing;

pub use client::{UploadReceipt, Uploader, DEFAULT_ENDPOINT, FILE_FIELD};
pub use error::{UploadError, FALLBACK_MESSAGE, NO_FILE_MESSAGE};

use std::path::{Path, PathBuf};

/// A single user-chosen local file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    path: PathBuf,
    name: String,
    mime: String,
}

impl FileSelection {
    /// Wrap a path as a selection. Returns `None` for paths without a file name
    /// (e.g. `/` or `..`), which callers treat as "nothing selected".
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_string_lossy().to_string();
        let mime = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Some(Self { path, name, mime })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media type sent with the multipart part
    pub fn mime(&self) -> &str {
        &self.mime
    }
}
