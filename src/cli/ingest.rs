//! Document ingestion command.

use console::style;

use docingest::{Config, Ingestor, SessionContext};

/// Ingest each locator in order, printing one JSON record per document.
pub async fn cmd_ingest(config: &Config, locators: &[String], text_only: bool) -> anyhow::Result<()> {
    let ingestor = Ingestor::from_config(config);
    let mut session = SessionContext::new();
    let mut failed = 0;

    for locator in locators {
        let result = ingestor.ingest(locator, &mut session).await;

        if result.is_success() {
            eprintln!("{} {}", style("✓").green(), locator);
        } else {
            failed += 1;
            eprintln!(
                "{} {}: {}",
                style("✗").red(),
                locator,
                style(result.error.as_deref().unwrap_or("unknown error")).dim()
            );
        }

        if !text_only {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    if text_only {
        if let Some(text) = session.cumulative_text() {
            println!("{}", text);
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} documents failed", failed, locators.len());
    }
    Ok(())
}
