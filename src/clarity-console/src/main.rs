//! Clarity trial console: admin backend for limited-time free HD playback
//! campaigns.
//!
//! Main entry point: loads configuration, builds the campaign registry and
//! serves the console API.

use clap::Parser;
use clarity_core::config::AppConfig;
use clarity_management::{management_router, ManagementState};
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "clarity-console")]
#[command(about = "Admin backend for clarity trial campaigns")]
#[command(version)]
struct Cli {
    /// Optional TOML config file
    #[arg(long, env = "CLARITY_TRIAL_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port (overrides config)
    #[arg(long, env = "CLARITY_TRIAL__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Start with an empty registry instead of the demo campaigns
    #[arg(long, default_value_t = false)]
    no_demo_data: bool,

    /// Disable the user blacklist section
    #[arg(long, default_value_t = false)]
    no_blacklist: bool,

    /// Disable the approval workflow
    #[arg(long, default_value_t = false)]
    no_approval: bool,

    /// Reject drafts whose end date precedes the start date
    #[arg(long, default_value_t = false)]
    enforce_date_order: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clarity_console=info,clarity_management=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Clarity trial console starting up");

    // Load configuration
    let mut config = AppConfig::load_from(cli.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if cli.no_demo_data {
        config.registry.seed_demo_data = false;
    }
    if cli.no_blacklist {
        config.features.blacklist = false;
    }
    if cli.no_approval {
        config.features.approval_workflow = false;
    }
    if cli.enforce_date_order {
        config.validation.enforce_date_order = true;
    }

    info!(
        http_port = config.api.http_port,
        blacklist = config.features.blacklist,
        approval_workflow = config.features.approval_workflow,
        enforce_date_order = config.validation.enforce_date_order,
        seed_demo_data = config.registry.seed_demo_data,
        "Configuration loaded"
    );

    let state = ManagementState::from_config(&config);
    info!(campaigns = state.registry.len(), "Campaign registry ready");

    let app = management_router(state).layer(CorsLayer::permissive());

    let addr = SocketAddr::new(config.api.host.parse()?, config.api.http_port);
    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
