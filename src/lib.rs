pub mod api;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;
pub mod uploads;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub use config::Config;
use models::user::UserRole;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;

    init_tracing(&config.general.log_level, config.general.log_json);

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("serve" | "-s" | "--serve") => run_server(config).await,

        Some("init" | "--init") => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }

        Some("promote") => {
            let Some(username) = args.get(2) else {
                println!("Usage: herodex promote <username>");
                return Ok(());
            };
            cmd_promote(&config, username).await
        }

        Some("help" | "-h" | "--help") => {
            print_help();
            Ok(())
        }

        Some(other) => {
            println!("Unknown command: {other}");
            println!();
            print_help();
            Ok(())
        }
    }
}

fn init_tracing(log_level: &str, json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    info!("Herodex v{} starting...", env!("CARGO_PKG_VERSION"));

    let prometheus_handle = if config.server.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    let port = config.server.port;
    let state = api::create_app_state_from_config(config, prometheus_handle).await?;
    let app = api::router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🌐 Web Server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn cmd_promote(config: &Config, username: &str) -> anyhow::Result<()> {
    let store = db::Store::with_pool_options(&config.general.database_path, 1, 1).await?;

    if store.set_user_role(username, UserRole::Admin).await? {
        println!("✓ {username} is now an admin");
    } else {
        println!("No user named '{username}'");
    }
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

fn print_help() {
    println!("Herodex - hero catalogue with abilities, comments and feedback");
    println!();
    println!("USAGE:");
    println!("  herodex [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("  serve             Run the web server (default)");
    println!("  init              Write a default config.toml");
    println!("  promote <user>    Give an existing user the admin role");
    println!("  help              Show this help");
    println!();
    println!("ENVIRONMENT:");
    println!("  DATABASE_URL        Overrides general.database_path");
    println!("  PORT                Overrides server.port");
    println!("  HERODEX_PUBLIC_DIR  Overrides general.public_path");
    println!("  RUST_LOG            Overrides general.log_level");
}
