//! Audit-trail contract
//!
//! Fire-and-forget: a failed audit call is the transport's problem, the
//! governance service neither retries nor escalates it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A key/value pair attached to an audit record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLabel {
    pub key: String,
    pub value: String,
}

impl AuditLabel {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One auditable action, successful or failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: String,
    pub success: bool,
    pub user_id: String,
    pub role: String,
    pub app_id: String,
    pub labels: Vec<AuditLabel>,
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, entry: AuditEntry);
}
