use anyhow::Result;
use keywatch::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let tracks = models::Track::from_keywords(&app_config.tracks.keywords);

    let transport = ingress::IngressClient::new(
        &app_config.ingestion.endpoint,
        &app_config.ingestion.producer_token,
        app_config.ingestion.compression_gzip,
        app_config.ingestion.request_timeout_secs,
    )?;
    let publisher = Arc::new(publisher::TelemetryPublisher::new(transport));

    // Declare the asset hierarchy before any data flows. A failure leaves the
    // hierarchy inconsistent, so it aborts startup.
    let model = asset_model::build(&app_config.tracks.provider_name, &tracks);
    publisher.setup(&model).await?;
    tracing::info!(tracks = tracks.len(), "Asset hierarchy declared");

    let aggregator = Arc::new(aggregator::WindowedAggregator::new(
        &tracks,
        app_config.aggregation.window_secs,
        chrono::Utc::now(),
    ));

    let (event_tx, event_rx) = tokio::sync::mpsc::channel(app_config.events.queue_capacity);
    let source_handle = source::spawn_stdin(tracks.clone(), event_tx);
    let ingestor_handle = ingestor::spawn(event_rx, aggregator.clone());

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let scheduler_handle = scheduler::spawn(
        scheduler::SchedulerDeps {
            aggregator: aggregator.clone(),
            publisher: publisher.clone(),
            shutdown_rx,
        },
        scheduler::SchedulerConfig {
            flush_interval_ms: app_config.aggregation.flush_interval_ms,
        },
    );

    tracing::info!(
        version = version::VERSION,
        window_secs = app_config.aggregation.window_secs,
        "keywatch running"
    );

    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            Ok(s) => s,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                return shutdown(source_handle, ingestor_handle, shutdown_tx, scheduler_handle).await;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Received shutdown signal");
    shutdown(source_handle, ingestor_handle, shutdown_tx, scheduler_handle).await
}

/// Ordered shutdown: stop the source so the ingestor drains and exits, then
/// let the scheduler run its final flush before the process ends.
async fn shutdown(
    source_handle: tokio::task::JoinHandle<()>,
    ingestor_handle: tokio::task::JoinHandle<()>,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    scheduler_handle: tokio::task::JoinHandle<()>,
) -> Result<()> {
    source_handle.abort();
    let _ = ingestor_handle.await;
    let _ = shutdown_tx.send(());
    let _ = scheduler_handle.await;
    Ok(())
}
