use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{bail, Context};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pool_dashboard::api::{self, AppState};
use pool_dashboard::config::Config;
use pool_dashboard::render;
use pool_dashboard::services::{Dashboard, Status};
use pool_dashboard::sources::SubgraphClient;

#[derive(Parser, Debug)]
#[command(version, about = "Top Uniswap V3 pools by TVL, served as a live dashboard")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Fetch once, print the pool cards and exit
    #[arg(long)]
    once: bool,
}

async fn run_once(dashboard: Arc<Dashboard>) -> anyhow::Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Querying subgraph…");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let status = dashboard.refresh().await;
    spinner.finish_and_clear();

    print!("{}", render::render_text(&dashboard.snapshot()));

    match status {
        Some(Status::Error) => bail!("fetch failed"),
        _ => Ok(()),
    }
}

#[tokio::main(worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pool_dashboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load(&args.config)?;
    tracing::info!("✓ Configuration loaded");

    let source = Arc::new(SubgraphClient::new(&config.subgraph));
    let dashboard = Dashboard::new(source);

    if args.once {
        return run_once(dashboard).await;
    }

    // first fetch cycle starts with the process
    dashboard.spawn_refresh();

    let state = Arc::new(AppState { dashboard });
    let app = api::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("✓ Dashboard ready on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
