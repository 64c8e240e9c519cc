//! # Songvault Server
//!
//! Stores uploaded songs in PostgreSQL and streams them back for inline
//! playback.
//!
//! ## Endpoints
//!
//! - `POST /api/upload`: multipart upload, one row per `audio` field
//! - `GET /api/songs`: `[{id, name}]`, ascending by id
//! - `GET /api/audio/{id}`: the stored bytes
//! - `DELETE /api/songs/{id}`
//! - `GET /ping`, `GET /health`

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use songvault_config::{Config, ConfigLoad, ConfigLoader};
use songvault_core::{
    SongService,
    database::{PoolSettings, PostgresDatabase, SongRepository},
};
use songvault_server::{AppState, create_app};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "songvault-server")]
#[command(about = "Song upload and streaming server backed by PostgreSQL")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to a songvault.toml (overrides SONGVAULT_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
    /// Verify the database is reachable and exit
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_runtime_config(&cli.serve)?;

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&config).await,
        Some(Command::Db(DbCommand::Check)) => run_db_check(&config).await,
        None => run_server(config).await,
    }
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Arc<Config>> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path);
    }

    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    match &config.metadata.config_path {
        Some(path) => {
            info!(path = %path.display(), "loaded configuration file")
        }
        None => info!("no songvault.toml found; using environment only"),
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => warn!(
                message = %warning.message,
                hint = %hint,
                "configuration warning"
            ),
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }

    info!(
        database = %config.database.redacted_url(),
        db.max_connections = config.database.max_connections,
        audio.content_type_mode = %config.audio.content_type_mode,
        upload.staging_dir = %config.upload.staging_dir().display(),
        "configuration in effect"
    );

    Ok(Arc::new(config))
}

async fn connect_database(config: &Config) -> anyhow::Result<PostgresDatabase> {
    let settings = PoolSettings {
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..PoolSettings::default()
    };

    PostgresDatabase::new(&config.database.url, settings)
        .await
        .with_context(|| {
            format!(
                "failed to connect to PostgreSQL at {}",
                config.database.redacted_url()
            )
        })
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    let db = connect_database(config).await?;
    db.migrate().await.context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_db_check(config: &Config) -> anyhow::Result<()> {
    let db = connect_database(config).await?;
    db.songs()
        .ping()
        .await
        .context("database did not answer a trivial query")?;

    let stats = db.pool_stats();
    info!(
        pool.size = stats.size,
        pool.idle = stats.idle,
        pool.max = stats.max_size,
        "Database is reachable"
    );
    Ok(())
}

async fn run_server(config: Arc<Config>) -> anyhow::Result<()> {
    let db = connect_database(&config).await?;
    if config.database.auto_migrate {
        db.migrate().await.context("database migration failed")?;
    } else {
        info!(
            "automatic migrations disabled; run `songvault-server db migrate`"
        );
    }

    let songs = Arc::new(SongService::new(Arc::new(db.songs())));
    let state = AppState::new(songs, Arc::clone(&config));
    let app = create_app(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Starting Songvault server on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("Songvault server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("signal received, shutting down server gracefully");
}
