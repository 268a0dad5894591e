//! Docpipe API server binary.

use docpipe_api::setup;
use docpipe_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;
    config.validate()?;

    docpipe_infra::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    let app = setup::initialize_app(&config).await?;
    setup::start_server(&config, app).await
}
