use kitchen_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env is optional)
    dotenv::dotenv().ok();

    // 2. Configuration and logging
    let config = Config::from_env()?;
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Kitchen server starting"
    );

    // 3. Database, migrations, bootstrap admin
    let state = ServerState::initialize(&config).await?;

    // 4. Serve until ctrl-c / SIGTERM
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
