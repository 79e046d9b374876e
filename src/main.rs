use std::sync::Arc;

use tokio::sync::broadcast;

use honorboard::aggregator::FetchSettings;
use honorboard::api::router::create_router;
use honorboard::chain::ChainBalances;
use honorboard::config::AppConfig;
use honorboard::db::{self, PgStore};
use honorboard::models::TransactionInserted;
use honorboard::services::run_transaction_listener;
use honorboard::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);
    let metrics_handle = honorboard::metrics::init_metrics();

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    // --- Live refresh feed: pg_notify → broadcast → per-wallet watchers ---
    let (tx_events, _) = broadcast::channel::<TransactionInserted>(256);
    {
        let pool = pool.clone();
        let events = tx_events.clone();
        tokio::spawn(async move {
            run_transaction_listener(pool, events).await;
        });
    }

    if config.camly_contract.is_none() {
        tracing::warn!("CAMLY_CONTRACT is not set; CAMLY on-chain balance will read as zero");
    }

    let http = reqwest::Client::builder()
        .timeout(config.query_timeout())
        .build()?;
    let balances = ChainBalances::from_config(&config, http);

    let store = Arc::new(PgStore::new(pool));
    let settings = FetchSettings::from_config(&config);
    tracing::info!(
        query_timeout_ms = config.query_timeout_ms,
        post_reaction_concurrency = settings.post_reaction_concurrency,
        refresh_debounce_ms = config.refresh_debounce_ms,
        "Aggregation settings loaded"
    );

    let state = AppState {
        social: store.clone(),
        transactions: store.clone(),
        principals: store,
        balances: Arc::new(balances),
        settings,
        tx_events,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
