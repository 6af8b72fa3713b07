//! `parley` binary: resolve configuration, wire the runtime, serve HTTP.

use std::error::Error;

use clap::Parser;
use parley::{CliArgs, api, runtime};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = CliArgs::parse().load_config()?;

    runtime::init_tracing(&config.logging.level);

    let credentials = runtime::credentials_from_env(&config.provider.credential_env_prefix);
    let state = runtime::build_state(&config, credentials)?;
    tracing::info!(
        credentials = state.orchestrator.pool().len(),
        model = %config.provider.model,
        directive_policy = %config.chat.directive_policy,
        "parley runtime ready"
    );

    let router = api::create_router(state, &config.server.cors_origins);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(addr = %config.server.bind, "API server listening");

    api::serve(listener, router).await?;
    Ok(())
}
