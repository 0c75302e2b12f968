//! RFC822 (.eml) message text.

use std::sync::LazyLock;

use async_trait::async_trait;
use mail_parser::{MessageParser, MimeHeaders};
use regex::Regex;

use super::{BackendOutput, ExtractError, ExtractionBackend};
use crate::models::SourceDocument;
use crate::storage::{ContentAccess, ContentSource};

pub const METHOD: &str = "Email parser";

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

pub struct EmailExtractor;

#[async_trait]
impl ExtractionBackend for EmailExtractor {
    fn method(&self) -> &str {
        METHOD
    }

    fn content_access(&self) -> ContentAccess {
        ContentAccess::LocalFile
    }

    async fn extract(
        &self,
        source: &ContentSource,
        _document: &SourceDocument,
    ) -> Result<BackendOutput, ExtractError> {
        let raw = source.read_bytes().await?;
        Ok(BackendOutput {
            text: email_text(&raw)?,
            method: METHOD.to_string(),
        })
    }
}

/// Headers, body and an attachment listing of a raw message.
pub fn email_text(raw: &[u8]) -> Result<String, ExtractError> {
    let message = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| ExtractError::Parse("Failed to parse email".to_string()))?;

    let mut text = String::new();

    if let Some(subject) = message.subject() {
        text.push_str(&format!("Subject: {}\n", subject));
    }
    if let Some(from) = message.from().and_then(|addrs| addrs.first()) {
        let address = from.address().unwrap_or_default();
        match from.name() {
            Some(name) => text.push_str(&format!("From: {} <{}>\n", name, address)),
            None => text.push_str(&format!("From: {}\n", address)),
        }
    }
    let to: Vec<String> = message
        .to()
        .map(|addrs| {
            addrs
                .iter()
                .map(|addr| addr.address().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default();
    if !to.is_empty() {
        text.push_str(&format!("To: {}\n", to.join(", ")));
    }
    if let Some(date) = message.date() {
        text.push_str(&format!("Date: {}\n", date.to_rfc3339()));
    }

    text.push('\n');

    if let Some(body) = message.body_text(0) {
        text.push_str(&body);
    } else if let Some(html) = message.body_html(0) {
        let stripped = html
            .replace("<br>", "\n")
            .replace("<br/>", "\n")
            .replace("<br />", "\n")
            .replace("</p>", "\n\n")
            .replace("</div>", "\n");
        text.push_str(&HTML_TAG.replace_all(&stripped, ""));
    }

    let attachments: Vec<String> = message
        .attachments()
        .filter_map(|part| {
            part.attachment_name()
                .map(|name| format!("- {} ({} bytes)", name, part.contents().len()))
        })
        .collect();
    if !attachments.is_empty() {
        text.push_str("\n\n--- Attachments ---\n");
        text.push_str(&attachments.join("\n"));
        text.push('\n');
    }

    Ok(text)
}
