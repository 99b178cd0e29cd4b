//! clientdesk entry point
//!
//! Sets up logging, then delegates everything to the CLI module.

use clientdesk::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("clientdesk=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = cli::run().await {
        tracing::error!(code = e.code_str(), "{}", e.message());
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
