//! Source document model: what was asked for and where it lives.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Scheme prefix for canonical object storage locators.
pub const GS_SCHEME: &str = "gs://";

/// Public HTTPS form of an object storage locator.
pub const PUBLIC_STORAGE_PREFIX: &str = "https://storage.googleapis.com/";

/// Closed set of formats the ingestion pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Tiff,
    Png,
    Jpg,
    Jpeg,
    Docx,
    Eml,
    Msg,
    Txt,
}

impl DocumentFormat {
    /// Every supported format, in the order they are reported to users.
    pub const ALL: [DocumentFormat; 9] = [
        DocumentFormat::Pdf,
        DocumentFormat::Tiff,
        DocumentFormat::Png,
        DocumentFormat::Jpg,
        DocumentFormat::Jpeg,
        DocumentFormat::Docx,
        DocumentFormat::Eml,
        DocumentFormat::Msg,
        DocumentFormat::Txt,
    ];

    /// Lower-case extension without the leading dot.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Tiff => "tiff",
            DocumentFormat::Png => "png",
            DocumentFormat::Jpg => "jpg",
            DocumentFormat::Jpeg => "jpeg",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Eml => "eml",
            DocumentFormat::Msg => "msg",
            DocumentFormat::Txt => "txt",
        }
    }

    /// Parse an extension (with or without the dot, any case).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.as_str() == ext)
    }

    /// Supported extensions rendered with their leading dot.
    pub fn supported_extensions() -> Vec<String> {
        Self::ALL.iter().map(|f| format!(".{}", f.as_str())).collect()
    }

    /// MIME type sent to OCR services and used for scratch files.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Tiff => "image/tiff",
            DocumentFormat::Png => "image/png",
            DocumentFormat::Jpg | DocumentFormat::Jpeg => "image/jpeg",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentFormat::Eml => "message/rfc822",
            DocumentFormat::Msg => "application/vnd.ms-outlook",
            DocumentFormat::Txt => "text/plain",
        }
    }

    pub fn category(&self) -> FileCategory {
        match self {
            DocumentFormat::Pdf | DocumentFormat::Docx => FileCategory::Document,
            DocumentFormat::Txt => FileCategory::Text,
            DocumentFormat::Tiff
            | DocumentFormat::Png
            | DocumentFormat::Jpg
            | DocumentFormat::Jpeg => FileCategory::Image,
            DocumentFormat::Eml | DocumentFormat::Msg => FileCategory::Email,
        }
    }

    /// Operations downstream consumers may run on this format.
    pub fn supported_operations(&self) -> &'static [&'static str] {
        match self {
            DocumentFormat::Pdf => &["ocr", "text_extraction", "structure_analysis"],
            DocumentFormat::Docx => &[
                "text_extraction",
                "structure_analysis",
                "metadata_extraction",
            ],
            DocumentFormat::Txt => &["text_extraction", "content_analysis"],
            DocumentFormat::Tiff
            | DocumentFormat::Png
            | DocumentFormat::Jpg
            | DocumentFormat::Jpeg => &["ocr", "text_extraction"],
            DocumentFormat::Eml | DocumentFormat::Msg => {
                &["email_parsing", "text_extraction", "header_extraction"]
            }
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse file family reported in metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Document,
    Text,
    Image,
    Email,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Document => "document",
            FileCategory::Text => "text",
            FileCategory::Image => "image",
            FileCategory::Email => "email",
        }
    }
}

/// Bucket + object name inside object storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectUri {
    pub bucket: String,
    pub name: String,
}

impl ObjectUri {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
        }
    }

    /// Parse either `gs://bucket/name` or the public HTTPS form.
    ///
    /// Returns `None` when the locator does not point into object storage or
    /// lacks a bucket or object name.
    pub fn parse(locator: &str) -> Option<Self> {
        let rest = locator
            .strip_prefix(GS_SCHEME)
            .or_else(|| locator.strip_prefix(PUBLIC_STORAGE_PREFIX))?;
        let (bucket, name) = rest.split_once('/')?;
        if bucket.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(bucket, name))
    }

    /// Last path segment of the object name.
    pub fn file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Object name prefix of the containing "directory", with trailing slash,
    /// or the empty string for objects at the bucket root.
    pub fn parent_prefix(&self) -> &str {
        match self.name.rfind('/') {
            Some(idx) => &self.name[..=idx],
            None => "",
        }
    }
}

impl fmt::Display for ObjectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", GS_SCHEME, self.bucket, self.name)
    }
}

/// Where a document's bytes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageOrigin {
    Local { path: String },
    Remote { uri: ObjectUri },
}

/// A document the caller asked to ingest, after locator resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Locator exactly as supplied.
    pub locator: String,
    pub origin: StorageOrigin,
    pub format: DocumentFormat,
    /// Display name (last path segment).
    pub filename: String,
}

impl SourceDocument {
    pub fn is_remote(&self) -> bool {
        matches!(self.origin, StorageOrigin::Remote { .. })
    }

    pub fn remote_uri(&self) -> Option<&ObjectUri> {
        match &self.origin {
            StorageOrigin::Remote { uri } => Some(uri),
            StorageOrigin::Local { .. } => None,
        }
    }

    /// Filename without its extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_extension("PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension(".Jpeg"), Some(DocumentFormat::Jpeg));
        assert_eq!(DocumentFormat::from_extension("xyz"), None);
        assert_eq!(DocumentFormat::from_extension(""), None);
    }

    #[test]
    fn test_supported_extensions_list() {
        let exts = DocumentFormat::supported_extensions();
        assert_eq!(exts.len(), 9);
        assert_eq!(exts[0], ".pdf");
        assert!(exts.contains(&".msg".to_string()));
    }

    #[test]
    fn test_categories() {
        assert_eq!(DocumentFormat::Tiff.category(), FileCategory::Image);
        assert_eq!(DocumentFormat::Docx.category(), FileCategory::Document);
        assert_eq!(DocumentFormat::Msg.category(), FileCategory::Email);
        assert_eq!(DocumentFormat::Txt.category(), FileCategory::Text);
    }

    #[test]
    fn test_object_uri_forms_are_equivalent() {
        let a = ObjectUri::parse("gs://deals/2024/deck.pdf").unwrap();
        let b = ObjectUri::parse("https://storage.googleapis.com/deals/2024/deck.pdf").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "gs://deals/2024/deck.pdf");
        assert_eq!(a.file_name(), "deck.pdf");
        assert_eq!(a.parent_prefix(), "2024/");
    }

    #[test]
    fn test_object_uri_rejects_incomplete() {
        assert!(ObjectUri::parse("gs://bucket-only").is_none());
        assert!(ObjectUri::parse("gs://bucket/").is_none());
        assert!(ObjectUri::parse("/tmp/file.pdf").is_none());
        assert_eq!(ObjectUri::new("b", "root.pdf").parent_prefix(), "");
    }
}
