// src/db/schema_init.rs
use rusqlite::{Connection, Result as SqlResult};
use tracing::info;

pub struct SchemaInitializer;

impl SchemaInitializer {
    /// Apply the schema. Runs once at process startup, outside the
    /// request path; safe to repeat since every statement is IF NOT
    /// EXISTS.
    pub fn init(db_conn: &Connection) -> SqlResult<()> {
        info!("Initializing database schema");
        let schema_sql = include_str!("schema.sql");
        db_conn.execute_batch(schema_sql)?;
        info!("Database schema initialized");
        Ok(())
    }
}
