//! Global configuration contract
//!
//! The bootstrap client subscribes to configuration changes and tells the
//! governance service to refresh its cached currency list through
//! `ParticipantService::reload_configuration`.

use async_trait::async_trait;
use hubadmin_core::Currency;

#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    /// Currencies the hub currently clears
    async fn currency_list(&self) -> Vec<Currency>;
}
