use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use venu_api::{app, state::AppState};
use venu_core::{AggregateCache, ReviewStore, ReviewWriter};
use venu_store::{Config, DbClient, PgReviewStore, RedisClient};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "venu_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Venu reviews API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let redis = RedisClient::new(&config.redis.url)
        .await
        .expect("Failed to connect to Redis");

    let store: Arc<dyn ReviewStore> = Arc::new(PgReviewStore::new(db.pool.clone()));
    let cache: Arc<dyn AggregateCache> = Arc::new(redis);
    let writer = ReviewWriter::new(store, Some(cache), config.review.clone());

    let state = AppState {
        reviews: Arc::new(writer),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app(state))
        .await
        .expect("Server error");
}
