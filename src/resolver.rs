// src/resolver.rs
// Tiered lookup/compute/populate pipeline: expiring cache, then durable
// store, then the evaluator with write-back into both tiers.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::cache::{CacheError, ResultCache};
use crate::calc::{self, CalcError, CalcKey, Operation};
use crate::db::operation_store::{OperationStore, StoreError};

/// Resolution failures. Domain errors pass through unchanged so the HTTP
/// layer can tell them apart from collaborator failures.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Calc(#[from] CalcError),
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Which tier answered a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Store,
    Computed,
}

/// A resolved request: the numeric answer plus its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    pub result: f64,
    pub source: Source,
}

/// Tiered resolver. Collaborators are injected at construction so tests
/// substitute in-process doubles for redis and sqlite.
pub struct Resolver {
    cache: Arc<dyn ResultCache>,
    store: Arc<dyn OperationStore>,
    cache_ttl: Duration,
}

impl Resolver {
    pub fn new(
        cache: Arc<dyn ResultCache>,
        store: Arc<dyn OperationStore>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            store,
            cache_ttl,
        }
    }

    /// Resolve one request: cache, then store (promoting the hit back into
    /// the cache), then compute with write-back. On the compute path the
    /// store write strictly precedes the cache write, so an interrupted
    /// request can leave the cache cold but never ahead of the store.
    ///
    /// Concurrent identical requests may each reach the compute step and
    /// upsert the same key; the upsert is idempotent and values are
    /// deterministic per key, so last-write-wins is acceptable.
    pub async fn resolve(&self, op: &str, a: &str, b: &str) -> Result<Resolution, ResolveError> {
        let a = calc::parse_operand(a)?;
        let b = calc::parse_operand(b)?;
        let op = Operation::parse(op)?;
        let key = CalcKey::new(op, a, b).cache_key();

        if let Some(value) = self.cache.get(&key).await? {
            debug!(key = %key, "cache hit");
            return Ok(Resolution {
                result: value,
                source: Source::Cache,
            });
        }

        if let Some(record) = self.store.find(op, a, b).await? {
            debug!(key = %key, "store hit, promoting to cache");
            self.cache.set(&key, record.result, self.cache_ttl).await?;
            return Ok(Resolution {
                result: record.result,
                source: Source::Store,
            });
        }

        let result = calc::evaluate(op, a, b)?;
        debug!(key = %key, result, "computed fresh result");
        self.store.upsert(op, a, b, result).await?;
        self.cache.set(&key, result, self.cache_ttl).await?;
        Ok(Resolution {
            result,
            source: Source::Computed,
        })
    }
}
