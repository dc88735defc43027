use anyhow::Context;
use clap::Parser;
use hearth_adaptor_web::{ChatServer, ChatServerConfig};
use hearth_core::utils::logger::init_logging;
use hearth_core::{load_env, AgentRouter, HearthConfig, KeywordTable, Responder, ResponderConfig};
use hearth_provider_anthropic::AnthropicClient;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "run-hearth-ui", about = "Serve the Hearth property and tenancy assistant")]
struct Cli {
    #[arg(long, env = "HEARTH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Bind host (overrides HEARTH_UI_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides HEARTH_UI_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Keyword table JSON (overrides HEARTH_KEYWORDS_FILE)
    #[arg(long)]
    keywords: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so clap can see its values
    load_env()?;
    let cli = Cli::parse();
    std::env::set_var("HEARTH_LOG_LEVEL", &cli.log_level);
    init_logging(&cli.log_level)?;

    let mut config = HearthConfig::from_env();
    if let Some(host) = cli.host {
        config.ui.host = host;
    }
    if let Some(port) = cli.port {
        config.ui.port = port;
    }
    if cli.keywords.is_some() {
        config.keywords_file = cli.keywords;
    }
    config.require_api_key()?;

    let table = match &config.keywords_file {
        Some(path) => KeywordTable::from_file(path)
            .with_context(|| format!("loading keyword table from {}", path.display()))?,
        None => KeywordTable::default(),
    };
    let router = AgentRouter::new(table);

    let client = AnthropicClient::from_config(&config.model)?;
    let responder = Responder::new(Arc::new(client), ResponderConfig::from(&config.model))?;

    let server = ChatServer::new(ChatServerConfig::from(config.ui.clone()), router, responder);
    let addr = server.start().await?;

    tracing::info!(model = %config.model.model, "Hearth ready");
    println!("Hearth UI: http://{}/", addr);

    let mut term =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()).ok();
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = async {
            match term.as_mut() {
                Some(s) => { s.recv().await; }
                None => std::future::pending::<()>().await,
            }
        } => {},
    }
    tracing::info!("shutting down");
    Ok(())
}
