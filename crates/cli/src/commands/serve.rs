//! Serve command handler.

use clap::Args;
use gems_core::config::AppConfig;
use gems_knowledge::QueryPipeline;
use std::sync::Arc;

/// Run the HTTP API
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to bind (default: 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (default: $PORT or 8080)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    /// Execute the serve command.
    pub async fn execute(&self, mut config: AppConfig) -> anyhow::Result<()> {
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        let pipeline = Arc::new(QueryPipeline::from_config(&config)?);
        gems_server::start_server(config, pipeline).await
    }
}
