//! Blob sources: the asynchronous "fetch text by name" capability a load
//! request consumes.

use std::{
    collections::HashMap,
    io::{self, Read},
    path::PathBuf,
};

use futures::future::{self, BoxFuture, FutureExt};

use crate::error::Error;

/// Fetches localization blobs by name.
///
/// `Ok(None)` means the blob is not available (yet); a load request treats that
/// as a retryable outcome. `Err` fails the request.
pub trait BlobSource {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Option<String>, Error>>;
}

impl<S: BlobSource + ?Sized> BlobSource for &S {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Option<String>, Error>> {
        (**self).fetch(name)
    }
}

/// Blobs held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    blobs: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a blob.
    pub fn insert(&mut self, name: impl Into<String>, blob: impl Into<String>) {
        self.blobs.insert(name.into(), blob.into());
    }

    pub fn with_blob(mut self, name: impl Into<String>, blob: impl Into<String>) -> Self {
        self.insert(name, blob);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.blobs.remove(name)
    }
}

impl BlobSource for MemorySource {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Option<String>, Error>> {
        future::ready(Ok(self.blobs.get(name).cloned())).boxed()
    }
}

/// Blobs stored as `<root>/<name>.csv` files.
///
/// Files are decoded according to their byte-order mark (UTF-8 when absent).
/// Reads go through `tokio::fs`, so fetches must be polled inside a Tokio runtime.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub const EXTENSION: &'static str = "csv";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file backing `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{}", Self::EXTENSION))
    }
}

impl BlobSource for DirSource {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Option<String>, Error>> {
        async move {
            let path = self.path_for(name);
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Blob not found");
                    return Ok(None);
                }
                Err(e) => return Err(Error::Io(e)),
            };

            let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
                .bom_override(true)
                .strip_bom(true)
                .build(bytes.as_slice());
            let mut text = String::new();
            decoder.read_to_string(&mut text)?;
            Ok(Some(text))
        }
        .boxed()
    }
}
