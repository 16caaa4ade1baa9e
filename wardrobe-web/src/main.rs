//! wardrobe-web - closet, capsule and outfit service
//!
//! Serves the JSON API, stores item photos under the root folder and keeps
//! per-user state in `wardrobe.db`. `create-user` and `rotate-token` issue
//! bearer tokens from the command line.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wardrobe_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use wardrobe_common::db::init_database;
use wardrobe_web::db::users;
use wardrobe_web::storage::{LocalObjectStore, MEDIA_ROUTE};
use wardrobe_web::{build_router, AppState};

/// Command-line arguments for wardrobe-web
#[derive(Parser, Debug)]
#[command(name = "wardrobe-web")]
#[command(about = "Closet, capsule and outfit service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "WARDROBE_PORT")]
    port: Option<u16>,

    /// Root folder holding the database and item photos
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, env = "WARDROBE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create an account and print its bearer token
    CreateUser {
        #[arg(long)]
        email: String,
    },
    /// Issue a new bearer token for an existing account
    RotateToken {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TomlConfig::load_or_default(args.config.as_deref());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "wardrobe_web={level},wardrobe_common={level},tower_http=info",
                    level = config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting wardrobe-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = RootFolderResolver::new("wardrobe-web")
        .with_cli_arg(args.root_folder.clone())
        .with_config(&config)
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());
    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    match args.command.unwrap_or(Command::Serve) {
        Command::CreateUser { email } => {
            if users::find_by_email(&pool, &email).await?.is_some() {
                bail!("User {} already exists; use rotate-token", email);
            }
            let (user, token) = users::create_user(&pool, &email).await?;
            info!("Created user {} ({})", user.email, user.guid);
            println!("{}", token);
            Ok(())
        }
        Command::RotateToken { email } => {
            let user = users::find_by_email(&pool, &email)
                .await?
                .with_context(|| format!("No user with email {}", email))?;
            let token = users::rotate_token(&pool, &user.guid).await?;
            info!("Rotated token for {}", user.email);
            println!("{}", token);
            Ok(())
        }
        Command::Serve => serve(args.port, &config, &initializer, pool).await,
    }
}

async fn serve(
    port: Option<u16>,
    config: &TomlConfig,
    initializer: &RootFolderInitializer,
    pool: sqlx::SqlitePool,
) -> Result<()> {
    let media_dir = initializer.media_path();
    let base_url = config
        .public_base_url
        .clone()
        .unwrap_or_else(|| MEDIA_ROUTE.to_string());
    info!("Item photos: {} (served as {})", media_dir.display(), base_url);

    let store = Arc::new(LocalObjectStore::new(media_dir.clone(), base_url));
    let state = AppState::new(pool, store).with_media_dir(media_dir);
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let host: std::net::IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid host address: {}", config.host))?;
    let addr = SocketAddr::new(host, port.unwrap_or(config.port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("wardrobe-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
