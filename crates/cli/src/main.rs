use clap::{Parser, Subcommand, ValueEnum};
use freightdash_core::client::HttpDashboardClient;
use freightdash_core::domain::call::{DEFAULT_WINDOW_DAYS, MAX_RECENT_CALLS, MAX_WINDOW_DAYS};
use freightdash_core::domain::load::MAX_SEARCH_LIMIT;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod dashboard;
mod loads;
mod render;

#[derive(Debug, Parser)]
#[command(name = "freightdash", about = "Load and call analytics for the freight dashboard API")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch loads, call analytics and recent calls and print the chart series.
    Dashboard {
        /// Number of loads to aggregate.
        #[arg(long, default_value_t = MAX_SEARCH_LIMIT)]
        loads_limit: u32,

        /// Trailing window for call analytics, in days (1..=90).
        #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WINDOW_DAYS)))]
        window_days: u32,

        /// Number of recent calls to list.
        #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_RECENT_CALLS)))]
        calls_limit: u32,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Keep refreshing every N seconds, printing only when the series change.
        #[arg(long)]
        refresh_secs: Option<u64>,
    },

    /// Search the load registry.
    SearchLoads(loads::SearchArgs),

    /// Look up a single load by id.
    GetLoad {
        load_id: String,
    },

    /// Register a new load.
    CreateLoad(loads::CreateArgs),

    /// Check that the API is reachable.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = freightdash_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let client = HttpDashboardClient::from_settings(&settings)?;

    let result = match args.command {
        Command::Dashboard {
            loads_limit,
            window_days,
            calls_limit,
            format,
            refresh_secs,
        } => {
            let opts = dashboard::DashboardOptions {
                loads_limit,
                window_days,
                calls_limit,
                format,
            };
            match refresh_secs {
                Some(secs) => dashboard::watch(&client, &opts, secs).await,
                None => dashboard::run_once(&client, &opts).await,
            }
        }
        Command::SearchLoads(search) => loads::search(&client, search).await,
        Command::GetLoad { load_id } => loads::get(&client, &load_id).await,
        Command::CreateLoad(create) => loads::create(&client, create).await,
        Command::Health => {
            use freightdash_core::client::DashboardSource;
            client.health().await.map(|()| println!("ok"))
        }
    };

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %format!("{err:#}"), "command failed");
    }
    result
}

fn init_sentry(settings: &freightdash_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
