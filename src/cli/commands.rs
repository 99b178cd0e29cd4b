//! CLI command implementations

use std::sync::Arc;

use tracing::info;

use crate::http_server::{AppState, HttpServer, HttpServerConfig};
use crate::store::{Store, StoreConfig};
use crate::views::Views;

use super::args::{Cli, Command};
use super::errors::CliResult;

/// Parse arguments and run the selected command
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli).await
}

/// Run an already parsed command line
pub async fn run_command(cli: Cli) -> CliResult<()> {
    let store_config = cli.store.to_config();

    match cli.command {
        Command::Serve { http } => serve(&store_config, http.to_config()).await,
        Command::InitSchema => init_schema(&store_config).await,
    }
}

/// Connect, compile views, and serve until shutdown
pub async fn serve(store_config: &StoreConfig, http_config: HttpServerConfig) -> CliResult<()> {
    let views = Views::new()?;
    let store = Store::connect(store_config).await?;

    let state = Arc::new(AppState::new(store.clone(), views));
    let served = HttpServer::new(http_config, state).start().await;

    store.close().await;
    served?;
    Ok(())
}

/// Apply the DDL bootstrap and exit
pub async fn init_schema(store_config: &StoreConfig) -> CliResult<()> {
    let store = Store::connect(store_config).await?;
    let applied = store.apply_schema().await;
    store.close().await;
    applied?;

    info!("schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_schema_in_memory() {
        init_schema(&StoreConfig::in_memory()).await.unwrap();
    }

    #[tokio::test]
    async fn test_serve_requires_database() {
        let err = serve(&StoreConfig::default(), HttpServerConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.code_str(), "CLI_STORE_ERROR");
    }
}
