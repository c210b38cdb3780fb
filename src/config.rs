// src/config.rs
use std::env;

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub redis_url: String,
    pub redis_ttl: u64,
    pub db_path: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("BACKEND_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .expect("BACKEND_PORT must be a valid u16");
        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string());
        let redis_ttl = env::var("REDIS_TTL")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .expect("REDIS_TTL must be a number of seconds");
        let db_path = env::var("DB_PATH").unwrap_or_else(|_| "operations.db".to_string());
        Self {
            host,
            port,
            redis_url,
            redis_ttl,
            db_path,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
