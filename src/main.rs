//! docingest - ingest documents and print their analysis as JSON.
//!
//! Results go to stdout so they can be piped; logs and status lines go to
//! stderr.

mod cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log directives used when `RUST_LOG` is unset. HTTP client internals stay
/// at warn even with `-v` so Document AI polling does not flood the output.
fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "docingest=info,reqwest=warn,hyper=warn"
    } else {
        "docingest=warn"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials and processor ids are commonly kept in .env
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(cli::is_verbose())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    cli::run().await
}
