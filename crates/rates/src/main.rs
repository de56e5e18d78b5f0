use std::{sync::Arc, time::Duration};

use transfer::{TracingLogger, TransferFutureExt, TransferStreamExt, poll_every};

use crate::{client::RatesClient, error::Result};

mod client;
mod error;
mod model;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "rates={level},transfer={level}",
            level = settings.app.level
        ))
        .init();

    transfer::logger::install(Arc::new(TracingLogger))?;
    transfer::config::init(settings.transfer.clone())?;

    let client = RatesClient::new(&settings.rates)?;
    let client = &client;
    let base = settings.rates.base.as_str();
    let compare = settings.rates.compare.as_str();

    if settings.once {
        client
            .quote(base, compare)
            .unfold_with_status(
                |quote| tracing::info!(%quote, "rates fetched"),
                |status, error| tracing::error!(%status, %error, "rates fetch failed"),
            )
            .await;
        return Ok(());
    }

    tracing::info!(
        base,
        compare,
        interval_secs = settings.rates.interval_secs,
        "polling rates"
    );
    poll_every(Duration::from_secs(settings.rates.interval_secs), move || {
        client.quote(base, compare)
    })
    .unfold_until(
        shutdown_signal(),
        |quote| tracing::info!(%quote, "rates updated"),
        |error| tracing::warn!(%error, "rates poll failed"),
    )
    .await;

    tracing::info!("stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
}
