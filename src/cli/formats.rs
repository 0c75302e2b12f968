//! Supported format listing.

use console::style;

use docingest::models::DocumentFormat;
use docingest::{Config, Ingestor};

pub fn cmd_formats(config: &Config) -> anyhow::Result<()> {
    let ingestor = Ingestor::from_config(config);

    println!("\n{}", style("Supported Formats").bold());
    println!("{}", "-".repeat(78));

    for format in DocumentFormat::ALL {
        let backend = ingestor
            .registry()
            .get(format)
            .map(|b| b.method().to_string())
            .unwrap_or_else(|| "none".to_string());
        println!(
            "  {:<7} {:<10} {:<28} {}",
            style(format!(".{}", format.as_str())).cyan(),
            format.category().as_str(),
            backend,
            style(format.supported_operations().join(", ")).dim()
        );
    }
    println!();
    Ok(())
}
