//! Durable result store keyed by the canonical operation triple.
//!
//! One row per unique (op, a, b). Computations upsert with the triple as
//! conflict target, so a replayed computation refreshes the row in place
//! instead of duplicating it; rows are never deleted from here.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use thiserror::Error;

use crate::calc::Operation;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// One persisted result row.
#[derive(Debug, Clone, Serialize)]
pub struct OperationRecord {
    pub op: Operation,
    pub a: f64,
    pub b: f64,
    pub result: f64,
    pub created_at: String,
}

/// Durable store contract: exact-match lookup plus a conflict-replacing
/// upsert on (op, a, b).
#[async_trait]
pub trait OperationStore: Send + Sync {
    async fn find(&self, op: Operation, a: f64, b: f64) -> Result<Option<OperationRecord>>;
    async fn upsert(&self, op: Operation, a: f64, b: f64, result: f64) -> Result<OperationRecord>;
}

/// SQLite-backed store. The connection is shared behind a mutex; sqlite
/// serializes writers anyway, so one connection is enough here.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

fn map_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<OperationRecord> {
    let op: String = row.get(0)?;
    let op = Operation::parse(&op).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(OperationRecord {
        op,
        a: row.get(1)?,
        b: row.get(2)?,
        result: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[async_trait]
impl OperationStore for SqliteStore {
    async fn find(&self, op: Operation, a: f64, b: f64) -> Result<Option<OperationRecord>> {
        let conn = self.conn.lock().unwrap();
        let record = conn
            .query_row(
                "SELECT op, a, b, result, created_at FROM operations
                 WHERE op = ?1 AND a = ?2 AND b = ?3 LIMIT 1",
                params![op.as_str(), a, b],
                map_record,
            )
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(record)
    }

    async fn upsert(&self, op: Operation, a: f64, b: f64, result: f64) -> Result<OperationRecord> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        // Conflict updates result only; created_at keeps the insert time.
        let record = conn
            .query_row(
                "INSERT INTO operations (op, a, b, result, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (op, a, b) DO UPDATE SET result = excluded.result
                 RETURNING op, a, b, result, created_at",
                params![op.as_str(), a, b, result, now],
                map_record,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(record)
    }
}
