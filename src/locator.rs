//! Locator resolution: turns a caller-supplied string into a `SourceDocument`.

use std::path::Path;

use tracing::debug;

use crate::error::IngestError;
use crate::models::{DocumentFormat, ObjectUri, SourceDocument, StorageOrigin};

/// Resolve a local path or object-storage locator.
///
/// Both the `gs://` and public HTTPS storage forms canonicalize to the same
/// object. Formats outside the supported set fail here, before any fetch or
/// backend runs.
pub fn resolve(locator: &str) -> Result<SourceDocument, IngestError> {
    let locator = locator.trim();
    let remote = ObjectUri::parse(locator);

    let filename = match &remote {
        Some(uri) => uri.file_name().to_string(),
        None => Path::new(locator)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(locator)
            .to_string(),
    };

    let extension = Path::new(&filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();

    let format = DocumentFormat::from_extension(&extension)
        .ok_or(IngestError::UnsupportedFormat { extension })?;

    let origin = match remote {
        Some(uri) => StorageOrigin::Remote { uri },
        None => StorageOrigin::Local {
            path: locator.to_string(),
        },
    };

    debug!("Resolved {} as {} ({:?})", locator, format, origin);

    Ok(SourceDocument {
        locator: locator.to_string(),
        origin,
        format,
        filename,
    })
}
