use crate::render;
use crate::OutputFormat;
use chrono::{DateTime, Utc};
use freightdash_core::analytics::{Dashboard, DashboardCache, DashboardInputs, DashboardStatus};
use freightdash_core::client::DashboardSource;
use freightdash_core::domain::load::LoadQuery;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub loads_limit: u32,
    pub window_days: u32,
    pub calls_limit: u32,
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct DashboardReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub window_days: u32,
    pub status: &'a DashboardStatus,
    pub dashboard: &'a Dashboard,
}

/// Fetches the three sources concurrently. A failed source is reported and left absent
/// so the remaining charts still render.
pub async fn fetch_inputs(
    source: &dyn DashboardSource,
    opts: &DashboardOptions,
) -> (DashboardInputs, Vec<String>) {
    let query = LoadQuery::with_limit(opts.loads_limit);
    let (loads, analytics, recent) = tokio::join!(
        source.fetch_loads(&query),
        source.fetch_call_analytics(opts.window_days),
        source.fetch_recent_calls(opts.calls_limit),
    );

    let mut errors = Vec::new();
    let inputs = DashboardInputs {
        loads: settle("loads", loads, &mut errors).map(Arc::from),
        analytics: settle("call analytics", analytics, &mut errors).map(Arc::new),
        recent_calls: settle("recent calls", recent, &mut errors).map(Arc::from),
    };
    (inputs, errors)
}

fn settle<T>(what: &str, result: anyhow::Result<T>, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::warn!(source = what, error = %format!("{err:#}"), "dashboard source unavailable");
            errors.push(format!("{what}: {err:#}"));
            None
        }
    }
}

pub async fn run_once(source: &dyn DashboardSource, opts: &DashboardOptions) -> anyhow::Result<()> {
    let mut cache = DashboardCache::new();
    let (inputs, errors) = fetch_inputs(source, opts).await;
    let dashboard = cache.get(&inputs);
    let status = DashboardStatus::from_inputs(&inputs, &errors);
    tracing::info!(
        loads = dashboard.loads.load_count,
        outcomes = dashboard.calls.outcomes.len(),
        failed_sources = errors.len(),
        "dashboard assembled"
    );
    print_dashboard(&dashboard, &status, opts)
}

/// Re-fetches on an interval and prints only when the assembled series change. Stops on
/// Ctrl-C, including while a fetch is in flight.
pub async fn watch(
    source: &dyn DashboardSource,
    opts: &DashboardOptions,
    refresh_secs: u64,
) -> anyhow::Result<()> {
    watch_until(source, opts, refresh_secs, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    })
    .await
}

async fn watch_until(
    source: &dyn DashboardSource,
    opts: &DashboardOptions,
    refresh_secs: u64,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    anyhow::ensure!(refresh_secs >= 1, "refresh interval must be at least 1 second");

    let mut cache = DashboardCache::new();
    let mut shown: Option<(Arc<Dashboard>, DashboardStatus)> = None;
    let mut interval = tokio::time::interval(Duration::from_secs(refresh_secs));
    // One listener for the whole loop; it is only polled until it first completes.
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            () = &mut shutdown => {
                tracing::info!("stopping dashboard refresh");
                return Ok(());
            }
        }

        let (inputs, errors) = tokio::select! {
            fetched = fetch_inputs(source, opts) => fetched,
            () = &mut shutdown => {
                tracing::info!("stopping dashboard refresh during fetch");
                return Ok(());
            }
        };
        let dashboard = cache.get(&inputs);
        let status = DashboardStatus::from_inputs(&inputs, &errors);

        let unchanged = shown
            .as_ref()
            .is_some_and(|(prev, prev_status)| Arc::ptr_eq(prev, &dashboard) && *prev_status == status);
        if unchanged {
            tracing::debug!("dashboard unchanged since last refresh");
            continue;
        }

        print_dashboard(&dashboard, &status, opts)?;
        shown = Some((dashboard, status));
    }
}

fn print_dashboard(
    dashboard: &Dashboard,
    status: &DashboardStatus,
    opts: &DashboardOptions,
) -> anyhow::Result<()> {
    match opts.format {
        OutputFormat::Json => {
            let report = DashboardReport {
                generated_at: Utc::now(),
                window_days: opts.window_days,
                status,
                dashboard,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print!("{}", render::render_dashboard(dashboard, status, opts.window_days)),
    }
    Ok(())
}
