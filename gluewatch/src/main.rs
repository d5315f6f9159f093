use std::future::Future;

use clap::Parser;
use gluewatch::cloudwatch::{CloudWatchContext, MetricsPublisher};
use gluewatch::engine::Forwarder;
use gluewatch::glue::{GlueApi, GlueContext};
use gluewatch::settings::{CliOptions, Settings};
use gluewatch::{metrics, Result};
use once_cell::sync::Lazy;
use prometheus::Registry;

static METRICS_REGISTRY: Lazy<Registry> = Lazy::new(|| {
    Registry::new_custom(Some("gluewatch".to_string()), None).expect("failed to create prometheus registry")
});

fn main() -> Result<()> {
    let subscriber = gluewatch::tracing::get_subscriber("gluewatch", "info", std::io::stdout);
    gluewatch::tracing::init_subscriber(subscriber);

    let main_span = tracing::trace_span!("main");
    let _main_span_guard = main_span.enter();

    let options = CliOptions::parse();
    let settings = Settings::load(&options)?;
    metrics::register_metrics(&METRICS_REGISTRY)?;

    start_runtime(async move {
        let glue = GlueContext::from_settings(&settings.glue).await;
        let publisher = CloudWatchContext::from_settings(&settings.cloudwatch).await;
        let forwarder = Forwarder::new(glue, publisher, &settings);

        match settings.engine.sweep_interval {
            None => run_sweep(&forwarder, settings.engine.log_self_metrics).await,
            Some(interval) => {
                tracing::info!(?interval, "repeating glue sweep on fixed interval");
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    if let Err(err) = run_sweep(&forwarder, settings.engine.log_self_metrics).await {
                        tracing::error!(error=?err, "glue sweep failed - retrying on next tick");
                    }
                }
            },
        }
    })
}

async fn run_sweep<G, P>(forwarder: &Forwarder<G, P>, log_self_metrics: bool) -> Result<()>
where
    G: GlueApi,
    P: MetricsPublisher,
{
    let outcome = forwarder.sweep().await?;
    if outcome.has_failures() {
        tracing::warn!(nr_failures=%outcome.failures.len(), "{}", outcome);
    } else {
        tracing::info!(
            jobs_seen=%outcome.jobs_seen, jobs_skipped=%outcome.jobs_skipped,
            points_published=%outcome.points_published, "{}", outcome
        );
    }

    if log_self_metrics {
        let exposition = metrics::render_metrics(&METRICS_REGISTRY)?;
        tracing::info!(%exposition, "gluewatch self metrics");
    }

    Ok(())
}

#[tracing::instrument(level = "trace", skip(future))]
fn start_runtime<F>(future: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(future)
}
