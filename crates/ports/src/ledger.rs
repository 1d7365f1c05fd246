//! External double-entry ledger contract
//!
//! The ledger service owns all account balances; this side only requests
//! accounts and postings and caches balance snapshots. Batched postings are
//! atomic and order-preserving, so a returned id list shorter than the
//! request is an integrity fault, never a partial success.

use async_trait::async_trait;
use hubadmin_core::{Amount, Currency};
use hubadmin_participant::AccountType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Snapshot of a ledger account as returned by the ledger service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerAccount {
    pub id: String,
    pub owner_id: String,
    pub account_type: AccountType,
    pub currency: Currency,
    pub posted_debit_balance: Amount,
    pub posted_credit_balance: Amount,
}

impl LedgerAccount {
    /// Net balance: posted credits minus posted debits
    pub fn balance(&self) -> Decimal {
        self.posted_credit_balance.value() - self.posted_debit_balance.value()
    }
}

/// One requested double-entry posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryRequest {
    /// Caller-supplied entry id; the ledger assigns one when absent
    pub requested_id: Option<String>,
    pub owner_id: String,
    pub currency: Currency,
    pub amount: Amount,
    pub pending: bool,
    pub debited_account_id: String,
    pub credited_account_id: String,
}

#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Forward the caller's bearer token so subsequent calls act under the
    /// caller's identity instead of the service identity.
    async fn set_token(&self, access_token: &str);

    async fn create_account(
        &self,
        requested_id: Option<&str>,
        owner_id: &str,
        account_type: AccountType,
        currency: &Currency,
    ) -> Result<String, LedgerError>;

    async fn get_account(&self, account_id: &str) -> Result<LedgerAccount, LedgerError>;

    async fn get_accounts(&self, account_ids: &[String]) -> Result<Vec<LedgerAccount>, LedgerError>;

    async fn create_journal_entry(
        &self,
        entry: &JournalEntryRequest,
    ) -> Result<String, LedgerError>;

    /// Atomic multi-entry posting; returned ids preserve request order
    async fn create_journal_entries(
        &self,
        batch: &[JournalEntryRequest],
    ) -> Result<Vec<String>, LedgerError>;
}
