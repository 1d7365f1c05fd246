//! In-memory collaborator implementations
//!
//! Used for local wiring and tests. State lives behind `RwLock`s that can be
//! inspected and programmed from test code; the repository and ledger carry
//! failure-injection toggles for exercising the integrity-failure paths.

use async_trait::async_trait;
use hubadmin_core::{Amount, Currency, Privilege};
use hubadmin_events::ParticipantChangedEvent;
use hubadmin_participant::{AccountType, Participant};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use crate::audit::{AuditEntry, AuditLog};
use crate::authorization::AuthorizationService;
use crate::configuration::ConfigurationProvider;
use crate::error::{LedgerError, RepositoryError};
use crate::idempotency::SettlementIdempotencyStore;
use crate::ledger::{JournalEntryRequest, LedgerAccount, LedgerService};
use crate::publisher::EventPublisher;
use crate::repository::ParticipantRepository;

/// Participant store over a `RwLock<HashMap>` with optimistic versioning
#[derive(Default)]
pub struct InMemoryParticipantRepository {
    records: RwLock<HashMap<String, Participant>>,
    fail_next_create: AtomicBool,
    fail_next_store: AtomicBool,
}

impl InMemoryParticipantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create` call report a storage failure
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    /// Make the next `store` call report a storage failure
    pub fn fail_next_store(&self) {
        self.fail_next_store.store(true, Ordering::SeqCst);
    }

    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn fetch_where_id(&self, participant_id: &str) -> Option<Participant> {
        self.records.read().unwrap().get(participant_id).cloned()
    }

    async fn fetch_where_ids(&self, participant_ids: &[String]) -> Vec<Participant> {
        let records = self.records.read().unwrap();
        participant_ids
            .iter()
            .filter_map(|id| records.get(id).cloned())
            .collect()
    }

    async fn fetch_where_name(&self, name: &str) -> Option<Participant> {
        self.records
            .read()
            .unwrap()
            .values()
            .find(|participant| participant.name == name)
            .cloned()
    }

    async fn fetch_all(&self) -> Vec<Participant> {
        self.records.read().unwrap().values().cloned().collect()
    }

    async fn search(
        &self,
        id: Option<&str>,
        name: Option<&str>,
        active: Option<bool>,
    ) -> Vec<Participant> {
        let name_filter = name.map(|n| n.to_lowercase());
        self.records
            .read()
            .unwrap()
            .values()
            .filter(|participant| id.map_or(true, |id| participant.id == id))
            .filter(|participant| {
                name_filter
                    .as_deref()
                    .map_or(true, |n| participant.name.to_lowercase().contains(n))
            })
            .filter(|participant| {
                active.map_or(true, |active| participant.is_active == active)
            })
            .cloned()
            .collect()
    }

    async fn create(&self, participant: &Participant) -> Result<(), RepositoryError> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::StorageFailure);
        }
        let mut records = self.records.write().unwrap();
        if records.contains_key(&participant.id) {
            return Err(RepositoryError::StorageFailure);
        }
        records.insert(participant.id.clone(), participant.clone());
        Ok(())
    }

    async fn store(&self, participant: &Participant) -> Result<(), RepositoryError> {
        if self.fail_next_store.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::StorageFailure);
        }
        let mut records = self.records.write().unwrap();
        match records.get(&participant.id) {
            None => return Err(RepositoryError::StorageFailure),
            Some(existing) if existing.version != participant.version => {
                return Err(RepositoryError::VersionConflict);
            }
            Some(_) => {}
        }
        let mut stored = participant.clone();
        stored.version += 1;
        records.insert(stored.id.clone(), stored);
        Ok(())
    }
}

/// Ledger double: accounts with programmable balances, recorded postings,
/// and toggles for the upstream-failure and count-mismatch paths
#[derive(Default)]
pub struct InMemoryLedgerService {
    accounts: RwLock<HashMap<String, LedgerAccount>>,
    entries: RwLock<Vec<(String, JournalEntryRequest)>>,
    token: RwLock<Option<String>>,
    next_account: AtomicU64,
    next_entry: AtomicU64,
    fail_account_creation: AtomicBool,
    fail_journal_posting: AtomicBool,
    truncate_batch_response: AtomicBool,
}

impl InMemoryLedgerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create_account` call fail
    pub fn fail_account_creation(&self) {
        self.fail_account_creation.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent journal posting fail
    pub fn fail_journal_posting(&self) {
        self.fail_journal_posting.store(true, Ordering::SeqCst);
    }

    /// Make the next batched posting return one id fewer than requested
    pub fn truncate_next_batch_response(&self) {
        self.truncate_batch_response.store(true, Ordering::SeqCst);
    }

    /// Overwrite an account's posted balances
    pub fn set_account_balance(&self, account_id: &str, debit: Amount, credit: Amount) {
        let mut accounts = self.accounts.write().unwrap();
        if let Some(account) = accounts.get_mut(account_id) {
            account.posted_debit_balance = debit;
            account.posted_credit_balance = credit;
        }
    }

    pub fn journal_entries(&self) -> Vec<(String, JournalEntryRequest)> {
        self.entries.read().unwrap().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    fn record_entry(&self, entry: &JournalEntryRequest) -> String {
        let id = entry.requested_id.clone().unwrap_or_else(|| {
            format!("je-{}", self.next_entry.fetch_add(1, Ordering::SeqCst) + 1)
        });
        self.entries
            .write()
            .unwrap()
            .push((id.clone(), entry.clone()));
        id
    }
}

#[async_trait]
impl LedgerService for InMemoryLedgerService {
    async fn set_token(&self, access_token: &str) {
        *self.token.write().unwrap() = Some(access_token.to_string());
    }

    async fn create_account(
        &self,
        requested_id: Option<&str>,
        owner_id: &str,
        account_type: AccountType,
        currency: &Currency,
    ) -> Result<String, LedgerError> {
        if self.fail_account_creation.load(Ordering::SeqCst) {
            return Err(LedgerError::AccountCreationFailed(
                "ledger unavailable".to_string(),
            ));
        }
        let id = requested_id.map(str::to_string).unwrap_or_else(|| {
            format!("la-{}", self.next_account.fetch_add(1, Ordering::SeqCst) + 1)
        });
        self.accounts.write().unwrap().insert(
            id.clone(),
            LedgerAccount {
                id: id.clone(),
                owner_id: owner_id.to_string(),
                account_type,
                currency: currency.clone(),
                posted_debit_balance: Amount::ZERO,
                posted_credit_balance: Amount::ZERO,
            },
        );
        Ok(id)
    }

    async fn get_account(&self, account_id: &str) -> Result<LedgerAccount, LedgerError> {
        self.accounts
            .read()
            .unwrap()
            .get(account_id)
            .cloned()
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.to_string()))
    }

    async fn get_accounts(
        &self,
        account_ids: &[String],
    ) -> Result<Vec<LedgerAccount>, LedgerError> {
        let accounts = self.accounts.read().unwrap();
        account_ids
            .iter()
            .map(|id| {
                accounts
                    .get(id)
                    .cloned()
                    .ok_or_else(|| LedgerError::AccountNotFound(id.clone()))
            })
            .collect()
    }

    async fn create_journal_entry(
        &self,
        entry: &JournalEntryRequest,
    ) -> Result<String, LedgerError> {
        if self.fail_journal_posting.load(Ordering::SeqCst) {
            return Err(LedgerError::JournalPostingFailed(
                "ledger unavailable".to_string(),
            ));
        }
        Ok(self.record_entry(entry))
    }

    async fn create_journal_entries(
        &self,
        batch: &[JournalEntryRequest],
    ) -> Result<Vec<String>, LedgerError> {
        if self.fail_journal_posting.load(Ordering::SeqCst) {
            return Err(LedgerError::JournalPostingFailed(
                "ledger unavailable".to_string(),
            ));
        }
        let mut ids: Vec<String> = batch.iter().map(|entry| self.record_entry(entry)).collect();
        if self.truncate_batch_response.swap(false, Ordering::SeqCst) {
            ids.pop();
        }
        Ok(ids)
    }
}

/// Role/privilege table, or a blanket allow for tests that exercise the
/// post-authorization paths
pub struct StaticAuthorizationService {
    allow_all: bool,
    grants: RwLock<HashMap<String, HashSet<Privilege>>>,
}

impl StaticAuthorizationService {
    pub fn new() -> Self {
        Self {
            allow_all: false,
            grants: RwLock::new(HashMap::new()),
        }
    }

    pub fn allow_all() -> Self {
        Self {
            allow_all: true,
            grants: RwLock::new(HashMap::new()),
        }
    }

    pub fn grant(&self, role_id: &str, privilege: Privilege) {
        self.grants
            .write()
            .unwrap()
            .entry(role_id.to_string())
            .or_default()
            .insert(privilege);
    }
}

impl Default for StaticAuthorizationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthorizationService for StaticAuthorizationService {
    async fn role_has_privilege(&self, role_id: &str, privilege: Privilege) -> bool {
        if self.allow_all {
            return true;
        }
        self.grants
            .read()
            .unwrap()
            .get(role_id)
            .is_some_and(|privileges| privileges.contains(&privilege))
    }
}

/// Collects audit records for assertions
#[derive(Default)]
pub struct InMemoryAuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().unwrap().clone()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn record(&self, entry: AuditEntry) {
        self.entries.write().unwrap().push(entry);
    }
}

/// Collects published domain events for assertions
#[derive(Default)]
pub struct InMemoryEventPublisher {
    events: RwLock<Vec<ParticipantChangedEvent>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ParticipantChangedEvent> {
        self.events.read().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: ParticipantChangedEvent) {
        self.events.write().unwrap().push(event);
    }
}

/// Fixed currency list, replaceable mid-test to exercise reloads
pub struct StaticConfigurationProvider {
    currencies: RwLock<Vec<Currency>>,
}

impl StaticConfigurationProvider {
    pub fn new(currencies: Vec<Currency>) -> Self {
        Self {
            currencies: RwLock::new(currencies),
        }
    }

    pub fn set_currencies(&self, currencies: Vec<Currency>) {
        *self.currencies.write().unwrap() = currencies;
    }
}

#[async_trait]
impl ConfigurationProvider for StaticConfigurationProvider {
    async fn currency_list(&self) -> Vec<Currency> {
        self.currencies.read().unwrap().clone()
    }
}

/// Processed-matrix-id set
#[derive(Default)]
pub struct InMemorySettlementIdempotencyStore {
    processed: RwLock<HashSet<String>>,
}

impl InMemorySettlementIdempotencyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettlementIdempotencyStore for InMemorySettlementIdempotencyStore {
    async fn is_processed(&self, matrix_id: &str) -> bool {
        self.processed.read().unwrap().contains(matrix_id)
    }

    async fn mark_processed(&self, matrix_id: &str) {
        self.processed
            .write()
            .unwrap()
            .insert(matrix_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_repository_create_and_fetch() {
        let repository = InMemoryParticipantRepository::new();
        let participant = Participant::new("p1", "Alpha Bank", "alice");

        repository.create(&participant).await.unwrap();

        let fetched = repository.fetch_where_id("p1").await.unwrap();
        assert_eq!(fetched.name, "Alpha Bank");
        assert!(repository.fetch_where_name("Alpha Bank").await.is_some());
        assert!(repository.fetch_where_id("p2").await.is_none());
    }

    #[tokio::test]
    async fn test_repository_rejects_duplicate_create() {
        let repository = InMemoryParticipantRepository::new();
        let participant = Participant::new("p1", "Alpha Bank", "alice");
        repository.create(&participant).await.unwrap();

        let duplicate = Participant::new("p1", "Beta Bank", "alice");
        assert_eq!(
            repository.create(&duplicate).await,
            Err(RepositoryError::StorageFailure)
        );
    }

    #[tokio::test]
    async fn test_repository_store_bumps_version() {
        let repository = InMemoryParticipantRepository::new();
        let mut participant = Participant::new("p1", "Alpha Bank", "alice");
        repository.create(&participant).await.unwrap();

        participant.approved = true;
        repository.store(&participant).await.unwrap();

        let stored = repository.fetch_where_id("p1").await.unwrap();
        assert_eq!(stored.version, participant.version + 1);
        assert!(stored.approved);
    }

    #[tokio::test]
    async fn test_repository_store_detects_version_conflict() {
        let repository = InMemoryParticipantRepository::new();
        let participant = Participant::new("p1", "Alpha Bank", "alice");
        repository.create(&participant).await.unwrap();

        // First writer wins
        let first = repository.fetch_where_id("p1").await.unwrap();
        let second = repository.fetch_where_id("p1").await.unwrap();
        repository.store(&first).await.unwrap();

        assert_eq!(
            repository.store(&second).await,
            Err(RepositoryError::VersionConflict)
        );
    }

    #[tokio::test]
    async fn test_repository_failure_injection_is_one_shot() {
        let repository = InMemoryParticipantRepository::new();
        let participant = Participant::new("p1", "Alpha Bank", "alice");
        repository.create(&participant).await.unwrap();

        repository.fail_next_store();
        assert_eq!(
            repository.store(&participant).await,
            Err(RepositoryError::StorageFailure)
        );
        repository.store(&participant).await.unwrap();
    }

    #[tokio::test]
    async fn test_repository_search_filters() {
        let repository = InMemoryParticipantRepository::new();
        let mut alpha = Participant::new("p1", "Alpha Bank", "alice");
        alpha.is_active = true;
        let beta = Participant::new("p2", "Beta Bank", "alice");
        repository.create(&alpha).await.unwrap();
        repository.create(&beta).await.unwrap();

        assert_eq!(repository.search(None, Some("alpha"), None).await.len(), 1);
        assert_eq!(repository.search(None, Some("bank"), None).await.len(), 2);
        assert_eq!(repository.search(None, None, Some(true)).await.len(), 1);
        assert_eq!(repository.search(Some("p2"), None, None).await.len(), 1);
    }

    #[tokio::test]
    async fn test_ledger_account_lifecycle() {
        let ledger = InMemoryLedgerService::new();
        let id = ledger
            .create_account(None, "p1", AccountType::Settlement, &Currency::Usd)
            .await
            .unwrap();

        ledger.set_account_balance(
            &id,
            Amount::new(dec!(100)).unwrap(),
            Amount::new(dec!(600)).unwrap(),
        );

        let account = ledger.get_account(&id).await.unwrap();
        assert_eq!(account.balance(), dec!(500));
        assert_eq!(account.account_type, AccountType::Settlement);
    }

    #[tokio::test]
    async fn test_ledger_batch_is_order_preserving() {
        let ledger = InMemoryLedgerService::new();
        let entry = |requested: &str| JournalEntryRequest {
            requested_id: Some(requested.to_string()),
            owner_id: "p1".to_string(),
            currency: Currency::Usd,
            amount: Amount::new(dec!(10)).unwrap(),
            pending: false,
            debited_account_id: "a".to_string(),
            credited_account_id: "b".to_string(),
        };

        let ids = ledger
            .create_journal_entries(&[entry("one"), entry("two")])
            .await
            .unwrap();
        assert_eq!(ids, vec!["one".to_string(), "two".to_string()]);
        assert_eq!(ledger.journal_entries().len(), 2);
    }

    #[tokio::test]
    async fn test_ledger_truncated_batch_response() {
        let ledger = InMemoryLedgerService::new();
        ledger.truncate_next_batch_response();

        let entry = JournalEntryRequest {
            requested_id: None,
            owner_id: "p1".to_string(),
            currency: Currency::Usd,
            amount: Amount::new(dec!(10)).unwrap(),
            pending: false,
            debited_account_id: "a".to_string(),
            credited_account_id: "b".to_string(),
        };

        let ids = ledger
            .create_journal_entries(&[entry.clone(), entry])
            .await
            .unwrap();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn test_authorization_grants() {
        let authorization = StaticAuthorizationService::new();
        authorization.grant("ops-admin", Privilege::CreateParticipant);

        assert!(
            authorization
                .role_has_privilege("ops-admin", Privilege::CreateParticipant)
                .await
        );
        assert!(
            !authorization
                .role_has_privilege("ops-admin", Privilege::ApproveParticipant)
                .await
        );
        assert!(
            !authorization
                .role_has_privilege("viewer", Privilege::CreateParticipant)
                .await
        );

        let open = StaticAuthorizationService::allow_all();
        assert!(
            open.role_has_privilege("anyone", Privilege::ApproveNdcChangeRequest)
                .await
        );
    }

    #[tokio::test]
    async fn test_idempotency_store() {
        let store = InMemorySettlementIdempotencyStore::new();
        assert!(!store.is_processed("sm-1").await);
        store.mark_processed("sm-1").await;
        assert!(store.is_processed("sm-1").await);
    }
}
