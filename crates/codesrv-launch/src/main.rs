use codesrv_launch::{status, Error};
use color_eyre::{eyre::Context, Result};
use tracing_subscriber::prelude::*;

async fn run() -> Result<()> {
    let config = codesrv_launch::builder()
        .build()
        .wrap_err("failed to build launcher configuration")?;

    let launched = match codesrv_launch::run(&config).await {
        Ok(launched) => launched,
        Err(e) => {
            match &e {
                Error::KeyNotFound { key, url } => {
                    status::fatal(&format!("No {key} found in response from {url}."))
                }
                Error::PortTaken { port } => status::fatal(&format!("Port {port} is taken.")),
                _ => {}
            }
            return Err(e.into());
        }
    };

    // Stay attached so the children's exit statuses get logged.
    launched.wait().await;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::Registry::default()
        .with(tracing_error::ErrorLayer::default())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_timer(tracing_subscriber::fmt::time::uptime()))
        .with(tracing_subscriber::filter::FilterFn::new(|m| {
            !m.target().contains("hyper")
        }))
        .init();

    run().await?;

    Ok(())
}
