//! `courtbook` — badminton session roster server.

mod config;

use clap::{Parser, Subcommand};
use config::{CourtbookConfig, StorageBackend, ADMIN_PASSWORD_ENV};
use courtbook_gateway::{GatewayConfig, GatewayServer};
use courtbook_security::{RateLimiter, SharedSecret};
use courtbook_session::{FileSessionStore, InMemorySessionStore, SessionService, SessionStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "courtbook", about = "Courtbook — badminton session roster server")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "courtbook.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the current active session as JSON
    Current,
    /// List every stored session, newest first
    Sessions,
}

async fn open_store(config: &CourtbookConfig) -> anyhow::Result<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match config.storage.backend {
        StorageBackend::File => Arc::new(FileSessionStore::new(config.sessions_dir()).await?),
        StorageBackend::Memory => {
            warn!("Using in-memory storage; sessions are lost on exit");
            Arc::new(InMemorySessionStore::new())
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();
    let config = CourtbookConfig::load(&cli.config).await?;
    let sessions = open_store(&config).await?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let admin_secret =
                SharedSecret::new(config.admin_password(std::env::var(ADMIN_PASSWORD_ENV).ok()));
            if !admin_secret.is_configured() {
                warn!("No admin password configured; /api/admin/verify-password will return 500");
            }

            let rate_limiter = Arc::new(
                RateLimiter::new(
                    config.security.max_burst,
                    config.security.max_requests_per_second,
                )
                .with_idle_timeout(Duration::from_secs(config.security.idle_timeout_secs)),
            );
            if config.security.trust_forwarded_for {
                info!("Rate limiting keyed on X-Forwarded-For");
            }

            let gateway = GatewayConfig {
                cors_origins: config.server.cors_origins.clone(),
                rate_limiter: Some(rate_limiter),
                trust_forwarded_for: config.security.trust_forwarded_for,
                admin_secret,
            };

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!(
                addr = %addr,
                backend = ?config.storage.backend,
                "Courtbook API listening"
            );
            GatewayServer::serve(listener, sessions, gateway).await?;
        }
        Commands::Current => {
            let service = SessionService::new(sessions);
            match service.current_session().await? {
                Some(session) => println!("{}", serde_json::to_string_pretty(&session)?),
                None => println!("No active game session found."),
            }
        }
        Commands::Sessions => {
            let service = SessionService::new(sessions);
            let all = service.list_sessions().await?;
            if all.is_empty() {
                println!("No sessions stored in {}", config.sessions_dir().display());
            } else {
                for s in &all {
                    println!(
                        "{} {} {} {} @ {}  players {}/{}  standby {}/{}",
                        if s.is_active { "*" } else { " " },
                        s.id,
                        s.date,
                        s.time,
                        s.location,
                        s.players.len(),
                        s.max_players,
                        s.standby_players.len(),
                        s.max_standby_players,
                    );
                }
                println!("\nTotal: {} session(s)", all.len());
            }
        }
    }

    Ok(())
}
