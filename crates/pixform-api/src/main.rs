use pixform_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    pixform_api::telemetry::init_telemetry();

    // Load configuration
    let config = Config::from_env()?;

    // Create folders, build state and routes
    let (_state, router) = pixform_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    pixform_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
