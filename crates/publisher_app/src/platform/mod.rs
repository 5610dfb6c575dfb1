//! Process entry: configuration, logging and the publishing pipeline.

mod config;
mod logging;
mod persistence;
mod pipeline;

use anyhow::Context;
use publisher_logging::{publish_error, publish_info};

use self::config::AppConfig;

pub fn run() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    logging::initialize(&config.logs_dir);
    publish_info!("Publishing to {}", config.publish.target);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let outcome = runtime.block_on(pipeline::run(&config));
    if let Err(err) = &outcome {
        publish_error!("{err:#}");
    }
    outcome
}
