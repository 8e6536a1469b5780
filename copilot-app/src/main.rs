use anyhow::Result;
use clap::Parser;
use copilot_app::cli::Cli;
use copilot_app::config::Config;
use copilot_tools::{RetryPolicy, ToolRegistry, WorkspaceDispatcher};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stdout carries only the JSON result
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load_or_default(&cli.config)?;
    config.apply_env()?;
    config.apply_overrides(cli.base_url.clone(), cli.token.clone());
    config.tools.validate()?;
    debug!("Using config {:?}", config.endpoint());

    let policy = RetryPolicy::from_config(&config.tools)?;
    let dispatcher = Arc::new(WorkspaceDispatcher::new(policy));

    let Some(request) = cli.command.into_request() else {
        let registry = ToolRegistry::with_codebase_tools(dispatcher);
        println!("{}", serde_json::to_string_pretty(&registry.schemas())?);
        return Ok(());
    };

    info!("Sending {} to {}", request.route(), config.workspace.base_url);
    let result = dispatcher.dispatch(&config.endpoint(), request).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
