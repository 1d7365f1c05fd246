//! Participant persistence contract
//!
//! Backed by a document store out of scope here. There are no transactions:
//! `store` replaces the whole record, guarded only by the optimistic
//! `version` token on the participant.

use async_trait::async_trait;
use hubadmin_participant::Participant;

use crate::error::RepositoryError;

#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    async fn fetch_where_id(&self, participant_id: &str) -> Option<Participant>;

    /// Bulk fetch; missing ids are simply absent from the result
    async fn fetch_where_ids(&self, participant_ids: &[String]) -> Vec<Participant>;

    async fn fetch_where_name(&self, name: &str) -> Option<Participant>;

    async fn fetch_all(&self) -> Vec<Participant>;

    /// Filtered listing: exact id, case-insensitive name substring,
    /// active-state equality. All filters optional.
    async fn search(
        &self,
        id: Option<&str>,
        name: Option<&str>,
        active: Option<bool>,
    ) -> Vec<Participant>;

    /// Insert a new record; fails if the id already exists
    async fn create(&self, participant: &Participant) -> Result<(), RepositoryError>;

    /// Replace an existing record. Fails with `VersionConflict` when the
    /// stored version differs from the caller's snapshot.
    async fn store(&self, participant: &Participant) -> Result<(), RepositoryError>;
}
