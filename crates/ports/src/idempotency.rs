//! Settlement idempotency contract
//!
//! Settlement events arrive at-least-once. Processed matrix ids are
//! recorded here so a redelivered event is skipped instead of double-posted.

use async_trait::async_trait;

#[async_trait]
pub trait SettlementIdempotencyStore: Send + Sync {
    async fn is_processed(&self, matrix_id: &str) -> bool;

    async fn mark_processed(&self, matrix_id: &str);
}
