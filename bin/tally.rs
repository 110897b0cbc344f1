use std::{str::FromStr, time::Instant};

use anyhow::Context;
use jemallocator::Jemalloc;
use log::{error, info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
};
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use tally::{EventProcessor, LedgerEvent, MemoryStore, Settings};

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings =
        Settings::new().context("Failed to load config.yaml. Please ensure it exists and is valid")?;

    let level = LevelFilter::from_str(&settings.log_level).unwrap_or(LevelFilter::Info);
    SimpleLogger::new()
        .with_level(level)
        .init()
        .context("Failed to initialize logger")?;

    let cancellation_token = CancellationToken::new();

    let shutdown_token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal (Ctrl+C), stopping after the current event...");
            shutdown_token.cancel();
        }
    });

    let processor = run_indexer(&settings, cancellation_token).await?;

    let store = processor.store();
    let balancer = processor.balancer();
    let priced = store
        .token_prices()
        .filter(|p| p.price > bigdecimal::BigDecimal::from(0))
        .count();
    info!(
        "Indexed {} pools ({} finalized), {} priced tokens, total liquidity {}",
        balancer.pool_count,
        balancer.finalized_pool_count,
        priced,
        balancer.total_liquidity.normalized()
    );

    if let Some(path) = &settings.indexer.snapshot_path {
        let snapshot = serde_json::to_vec_pretty(store).context("Failed to serialize snapshot")?;
        tokio::fs::write(path, snapshot)
            .await
            .with_context(|| format!("Failed to write snapshot to {}", path))?;
        info!("Snapshot written to {}", path);
    }

    Ok(())
}

async fn run_indexer(
    settings: &Settings,
    cancellation_token: CancellationToken,
) -> anyhow::Result<EventProcessor<MemoryStore>> {
    let assets = settings.reference_assets();
    info!(
        "Network {:?}: USD anchor {}, WETH anchor {}",
        settings.network,
        assets.usd(),
        assets.weth()
    );

    let mut processor = EventProcessor::new(MemoryStore::default(), assets)?;

    let file = File::open(&settings.indexer.events_path)
        .await
        .with_context(|| format!("Failed to open {}", settings.indexer.events_path))?;
    let mut lines = BufReader::new(file).lines();

    let started = Instant::now();
    let mut line_number: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        if cancellation_token.is_cancelled() {
            warn!("Stopped at line {} on request", line_number);
            break;
        }

        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        let result =
            LedgerEvent::from_json(&line).and_then(|event| processor.process(&event));

        if let Err(e) = result {
            if settings.indexer.halt_on_error {
                return Err(e.context(format!("Halting at line {}", line_number)));
            }
            error!("Skipping line {}: {:#}", line_number, e);
        }

        if settings.indexer.progress_interval > 0
            && line_number % settings.indexer.progress_interval == 0
        {
            let stats = processor.stats();
            info!(
                "Progress: {} lines, {} applied, {} rejected, {:.1}s elapsed",
                line_number,
                stats.applied,
                stats.rejected,
                started.elapsed().as_secs_f64()
            );
        }
    }

    let stats = processor.stats();
    info!(
        "Finished {} lines in {:.1}s ({} applied, {} rejected)",
        line_number,
        started.elapsed().as_secs_f64(),
        stats.applied,
        stats.rejected
    );

    Ok(processor)
}
