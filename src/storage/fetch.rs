//! Materialising document content in the form a backend asks for.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::{ObjectStore, ScratchFile, StorageError};
use crate::models::{ObjectUri, SourceDocument, StorageOrigin};

/// How a backend wants to receive remote content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentAccess {
    /// The backend's service reads the object directly; nothing is downloaded.
    RemoteReference,
    /// Download to a scratch file with the matching extension.
    LocalFile,
    /// Download into memory.
    InMemory,
}

/// Document content handed to an extraction backend.
///
/// Dropping a `Scratch` source deletes its file.
#[derive(Debug)]
pub enum ContentSource {
    Path(PathBuf),
    Scratch(ScratchFile),
    Bytes(Vec<u8>),
    Remote(ObjectUri),
}

impl ContentSource {
    /// Local file backing this source, if any.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            ContentSource::Path(p) => Some(p),
            ContentSource::Scratch(s) => Some(s.path()),
            ContentSource::Bytes(_) | ContentSource::Remote(_) => None,
        }
    }

    pub fn remote_uri(&self) -> Option<&ObjectUri> {
        match self {
            ContentSource::Remote(uri) => Some(uri),
            _ => None,
        }
    }

    /// Raw bytes of the content. Fails for remote references.
    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match self {
            ContentSource::Bytes(b) => Ok(b.clone()),
            ContentSource::Remote(uri) => Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                format!("{} has not been downloaded", uri),
            )),
            local => match local.local_path() {
                Some(path) => tokio::fs::read(path).await,
                None => Ok(Vec::new()),
            },
        }
    }
}

/// Fetches remote documents according to the backend's access mode.
#[derive(Clone)]
pub struct RemoteFetcher {
    store: Arc<dyn ObjectStore>,
    scratch_dir: Option<PathBuf>,
}

impl RemoteFetcher {
    pub fn new(store: Arc<dyn ObjectStore>, scratch_dir: Option<PathBuf>) -> Self {
        Self { store, scratch_dir }
    }

    /// Size in bytes of the document, wherever it lives.
    pub async fn size(&self, doc: &SourceDocument) -> Result<u64, StorageError> {
        match &doc.origin {
            StorageOrigin::Local { path } => Ok(tokio::fs::metadata(path).await?.len()),
            StorageOrigin::Remote { uri } => self.store.size(uri).await,
        }
    }

    /// Prepare the document's content for a backend.
    ///
    /// Local documents are always passed by path.
    pub async fn acquire(
        &self,
        doc: &SourceDocument,
        access: ContentAccess,
    ) -> Result<ContentSource, StorageError> {
        let uri = match &doc.origin {
            StorageOrigin::Local { path } => return Ok(ContentSource::Path(PathBuf::from(path))),
            StorageOrigin::Remote { uri } => uri,
        };

        match access {
            ContentAccess::RemoteReference => Ok(ContentSource::Remote(uri.clone())),
            ContentAccess::InMemory => Ok(ContentSource::Bytes(self.store.download(uri).await?)),
            ContentAccess::LocalFile => {
                let content = self.store.download(uri).await?;
                let scratch =
                    ScratchFile::create(self.scratch_dir.as_deref(), doc.format.as_str(), &content)?;
                debug!("Staged {} at {}", uri, scratch.path().display());
                Ok(ContentSource::Scratch(scratch))
            }
        }
    }
}
