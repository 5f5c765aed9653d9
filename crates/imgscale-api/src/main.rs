use imgscale_core::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, storage, routes)
    let (_state, router) = imgscale_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    imgscale_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
