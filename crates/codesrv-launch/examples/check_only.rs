use color_eyre::Result;
use tracing_subscriber::prelude::*;

async fn run() -> Result<()> {
    let config = codesrv_launch::builder().build()?;
    let client = codesrv_launch::client()?;

    let freshness = codesrv_launch::check(
        &client,
        &config.bin_path(),
        config.listing_url(),
        config.artifact_key(),
    )
    .await?;

    println!(
        "{}: exists={} fresh={}",
        config.bin_path().display(),
        freshness.exists,
        freshness.is_fresh
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::Registry::default()
        .with(tracing_error::ErrorLayer::default())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_timer(tracing_subscriber::fmt::time::uptime()))
        .init();

    run().await?;

    Ok(())
}
