// src/main.rs
use std::sync::{Arc, Mutex};
use std::time::Duration;

use calcache::api::start_api_server;
use calcache::cache::RedisCache;
use calcache::config::ApiConfig;
use calcache::db::operation_store::SqliteStore;
use calcache::db::schema_init::SchemaInitializer;
use calcache::resolver::Resolver;
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = ApiConfig::from_env();

    info!(db_path = %config.db_path, "Initializing database");
    let db_conn = Arc::new(Mutex::new(
        rusqlite::Connection::open(&config.db_path).expect("Failed to open database"),
    ));
    {
        let conn = db_conn.lock().unwrap();
        SchemaInitializer::init(&conn).expect("Failed to initialize schema");
    }
    let store = SqliteStore::new(Arc::clone(&db_conn));

    info!(url = %config.redis_url, ttl = config.redis_ttl, "Connecting to Redis");
    let cache = RedisCache::new(&config.redis_url)
        .await
        .expect("Failed to connect to Redis");

    let resolver = Arc::new(Resolver::new(
        Arc::new(cache),
        Arc::new(store),
        Duration::from_secs(config.redis_ttl),
    ));

    info!(addr = %config.bind_addr(), "Starting API server");
    start_api_server(&config, resolver).await
}
