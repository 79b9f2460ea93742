//! billgate server
//!
//! Payment core of the subscription-billing panel: gateway checkout,
//! payment webhook, and the notification/reminder workers.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use billgate_core::events::notification_event_channel;
use billgate_core::gate::{NotificationGate, RedisGateStore};
use billgate_core::ledger::{OrderLedger, PgOrderLedger};
use billgate_core::notifier::{LogNotifier, Notifier};
use billgate_core::processors::{NotificationSender, ReminderWorker};
use billgate_core::reminder::ReminderService;
use billgate_core::settlement::SettlementService;
use billgate_core::users::PgUserDirectory;
use billgate_gateway::client::GatewayClient;
use clap::Parser;
use config::{get_database_url, get_redis_url, load_config};
use server::{build_router, run_server};
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// billgate - subscription billing panel payment core
#[derive(Parser, Debug)]
#[command(name = "billgate-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./billgate.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:8080)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting billgate-server v{}", env!("CARGO_PKG_VERSION"));

    let file_config = load_config(&args.config).map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    let listen_addr = args.listen.unwrap_or(file_config.server.listen);
    tracing::info!("Configuration loaded from {:?}", args.config);

    let database_url = get_database_url().map_err(|e| {
        tracing::error!("DATABASE_URL environment variable not set");
        e
    })?;

    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    if args.migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed successfully");
    }

    let redis_client = redis::Client::open(get_redis_url()?.as_str())?;

    // Wiring: settlement emits events, the sender consumes them, and both
    // share the ledger; the gate store is the cross-instance dedup point.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (notification_tx, notification_rx) = notification_event_channel();

    let ledger: Arc<dyn OrderLedger> = Arc::new(PgOrderLedger::new(db_pool.clone()));
    let gate = NotificationGate::new(Arc::new(RedisGateStore::new(redis_client)));
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    let settlement = Arc::new(SettlementService::new(ledger.clone(), notification_tx));
    let gateway = Arc::new(GatewayClient::new(file_config.gateway.clone())?);

    let sender = NotificationSender::new(
        ledger.clone(),
        gate.clone(),
        notifier.clone(),
        notification_rx,
        shutdown_rx.clone(),
    );
    let sender_handle = tokio::spawn(sender.run());

    let worker = ReminderWorker::new(
        Arc::new(PgUserDirectory::new(db_pool.clone())),
        ReminderService::new(gate, notifier),
        Duration::from_secs(file_config.reminder.interval_secs),
        shutdown_rx,
    );
    let worker_handle = tokio::spawn(worker.run());

    let state = AppState {
        ledger,
        settlement,
        gateway,
        notify: Arc::new(file_config.notify.clone()),
    };
    let router = build_router(state);

    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Stop the processors and let them drain.
    let _ = shutdown_tx.send(true);
    let _ = sender_handle.await;
    let _ = worker_handle.await;

    tracing::info!("Closing database connections...");
    db_pool.close().await;
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
