//! Domain-change event publication contract

use async_trait::async_trait;
use hubadmin_events::ParticipantChangedEvent;

/// Publishes one event per successful mutating governance action.
/// Fire-and-forget from the caller's perspective; delivery guarantees
/// belong to the messaging layer.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: ParticipantChangedEvent);
}
