//! HubAdmin ports - contracts for the external collaborators
//!
//! The governance aggregate talks to seven out-of-scope services. Their
//! contracts live here as `async_trait` traits; the real transports (HTTP,
//! Kafka, gRPC, document store) are implemented elsewhere. The `memory`
//! module provides in-memory implementations for local wiring and tests,
//! with failure-injection toggles for the integrity-failure paths.

pub mod audit;
pub mod authorization;
pub mod configuration;
pub mod error;
pub mod idempotency;
pub mod ledger;
pub mod memory;
pub mod publisher;
pub mod repository;

pub use audit::{AuditEntry, AuditLabel, AuditLog};
pub use authorization::AuthorizationService;
pub use configuration::ConfigurationProvider;
pub use error::{LedgerError, RepositoryError};
pub use idempotency::SettlementIdempotencyStore;
pub use ledger::{JournalEntryRequest, LedgerAccount, LedgerService};
pub use publisher::EventPublisher;
pub use repository::ParticipantRepository;
