use std::sync::Arc;

use tokio::net::TcpListener;
use todo_memo_server::{
    config::{Config, StoreConfig},
    MemoryStore, MongoStore, SharedStore,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the variables may come from the shell.
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    let store: SharedStore = match &config.store {
        StoreConfig::Memory => {
            warn!("using the in-memory store, todos are lost on exit");
            Arc::new(MemoryStore::new())
        }
        StoreConfig::Mongo(mongo) => match MongoStore::connect(mongo).await {
            Ok(store) => Arc::new(store),
            Err(err) => {
                error!(error = %err, "failed to connect to MongoDB");
                return Err(err.into());
            }
        },
    };

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "listening");

    todo_memo_server::serve(listener, Arc::clone(&store), shutdown_signal()).await?;
    store.shutdown().await;
    info!("server stopped");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_memo_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
