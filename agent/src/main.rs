use anyhow::Context;
use ertdrive_core::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ertdrive_agent::init_tracing();

    let config = AppConfig::load_with_env().context("failed to load configuration")?;
    ertdrive_agent::run(config).await?;
    Ok(())
}
