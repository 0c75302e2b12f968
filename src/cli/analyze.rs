//! Offline analysis of an existing text file.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;

use docingest::analysis::{
    analyze_content, extract_key_information, generate_metadata, QualityScorer,
};
use docingest::locator;
use docingest::models::{DocumentFormat, SourceDocument, StorageOrigin};
use docingest::Config;

const METHOD: &str = "Direct text reading";

pub async fn cmd_analyze(config: &Config, file: &Path) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {} as UTF-8 text", file.display()))?;

    let path = file.to_string_lossy().to_string();
    // Anything that isn't a supported extension is analyzed as plain text.
    let document = locator::resolve(&path).unwrap_or_else(|_| SourceDocument {
        locator: path.clone(),
        origin: StorageOrigin::Local { path: path.clone() },
        format: DocumentFormat::Txt,
        filename: file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.clone()),
    });

    let started = Instant::now();
    let document_analysis = analyze_content(&text, &document.filename);
    let quality_metrics = QualityScorer::new(config.quality).score(&text);
    let content_analysis = extract_key_information(&text, document.format, &document.filename);
    let file_metadata = generate_metadata(
        &document,
        text.len() as u64,
        METHOD,
        started.elapsed(),
        &text,
    );

    let report = serde_json::json!({
        "document_analysis": document_analysis,
        "content_analysis": content_analysis,
        "quality_metrics": quality_metrics,
        "file_metadata": file_metadata,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
