use std::time::Duration;

use anyhow::Result;
use finnhub_client::FinnhubClient;
use tokio::signal::unix::SignalKind;
use tokio::time::{self, MissedTickBehavior};

mod aggregator;
mod config;
mod notifier;
mod report;
mod run;

use config::BotConfig;
use notifier::TelegramNotifier;
use run::{build_report, INDEX_SYMBOL};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env, init tracing
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    tracing::info!("Starting index heatmap bot");

    // 2. Load configuration; missing required vars fail here, loudly.
    let config = BotConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Index: {}", INDEX_SYMBOL);
    tracing::info!("  Refresh interval: {} seconds", config.refresh_interval_seconds);
    tracing::info!(
        "  Batch size: {} (pause {:?} between batches)",
        aggregator::BATCH_SIZE,
        aggregator::BATCH_PAUSE
    );

    // 3. Construct the collaborators once; config is immutable from here.
    let market = FinnhubClient::new(config.finnhub_api_key.clone());
    let notifier = TelegramNotifier::new(
        config.telegram_bot_token.clone(),
        config.telegram_chat_id.clone(),
    );
    tracing::info!("Telegram notifier ready");

    // Main loop with graceful shutdown (SIGINT + SIGTERM). The first tick
    // fires immediately; Delay keeps runs serialized so a slow run never
    // overlaps the next one.
    let mut interval = time::interval(Duration::from_secs(config.refresh_interval_seconds));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sigterm = tokio::signal::unix::signal(SignalKind::terminate())?;
    let shutdown = async {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM");
            }
        }
    };
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = run_cycle(&market, &notifier).await {
                    tracing::error!("Heatmap run failed: {e:#}");
                    // Best effort; if even this fails there is only the log.
                    if let Err(send_err) = notifier
                        .send_message(&format!("Heatmap run failed: {e:#}"))
                        .await
                    {
                        tracing::error!("Could not report failure to Telegram: {send_err:#}");
                    }
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received, exiting gracefully...");
                break;
            }
        }
    }

    tracing::info!("Heatmap bot shut down.");
    Ok(())
}

/// One scheduled run: fetch, aggregate, render, deliver.
async fn run_cycle(market: &FinnhubClient, notifier: &TelegramNotifier) -> Result<()> {
    let started = std::time::Instant::now();
    tracing::info!("Starting heatmap run...");

    let output = build_report(market).await?;
    let caption = report::format_summary(&output.stats, output.records.len(), chrono::Utc::now());

    notifier
        .send_document("heatmap.svg", output.image.into_bytes(), &caption)
        .await?;

    tracing::info!(
        "Run complete in {:.1}s: {} symbols, avg {:+.2}%",
        started.elapsed().as_secs_f64(),
        output.records.len(),
        output.stats.average_return
    );
    Ok(())
}
