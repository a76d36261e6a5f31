//! chartdesk - interactive trading-chart engine for the signal dashboard.
//!
//! Headless driver: loads the configured chart, fetches candles, drawings
//! and signals once, and reports what the surface would display.

use std::time::Duration;

use anyhow::{Context, Result};
use chartdesk_api::{ApiClient, DrawingsApi, SignalsApi};
use chartdesk_config::Config;
use chartdesk_core::Timeframe;
use chartdesk_data::RemoteCandles;

use chartdesk::{ChartSession, LoadState, RecordingFactory, SessionConfig, SurfaceOptions};

async fn run() -> Result<()> {
    env_logger::init();

    let config = Config::load_default();
    log::info!(
        "starting chartdesk against {} ({} {})",
        config.api.base_url,
        config.general.default_symbol,
        config.general.default_timeframe
    );

    let client = ApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
        &config.api.user_agent,
    )
    .context("failed to build API client")?;

    let timeframe = Timeframe::from_label(&config.general.default_timeframe).unwrap_or_else(|| {
        log::warn!(
            "unknown timeframe {:?} in config, falling back to {}",
            config.general.default_timeframe,
            Timeframe::BASE.label()
        );
        Timeframe::BASE
    });

    let mut session = ChartSession::new(
        RemoteCandles::new(client.clone()),
        DrawingsApi::new(client.clone()),
        RecordingFactory,
        SessionConfig {
            symbol: config.general.default_symbol.clone(),
            timeframe,
            surface: SurfaceOptions {
                width: config.chart.width,
                height: config.chart.height,
            },
            target_candles: config.chart.target_candles,
            signal_overlay_limit: config.chart.signal_overlay_limit,
        },
    );

    session.refresh_candles().await;
    session.refresh_drawings().await;

    let signals_api = SignalsApi::new(client);
    match signals_api
        .recent(Some(session.store().symbol()), 50)
        .await
    {
        Ok(signals) => session.apply_signals(&signals),
        Err(err) => log::warn!("signals feed unavailable: {err}"),
    }

    match session.load_state() {
        LoadState::Ready => {
            println!(
                "{} {}: {} base candles loaded, {} drawings, {} signal overlays",
                session.store().symbol(),
                session.store().timeframe().label(),
                session.base_candles().len(),
                session.store().drawings().len(),
                session.entry_signals().len(),
            );
        }
        LoadState::NoData => println!(
            "{}: no chart data available",
            session.store().symbol()
        ),
        LoadState::Failed(message) => anyhow::bail!("chart data failed to load: {message}"),
        LoadState::Loading => unreachable!("fetch completed"),
    }

    if let Some(message) = session.drawings_error() {
        println!("warning: drawings unavailable: {message}");
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
