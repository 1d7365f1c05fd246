//! Authorization contract
//!
//! Role resolution happened upstream; this side only asks whether one of
//! the caller's platform roles carries a privilege. Callers OR across the
//! roles in the security context.

use async_trait::async_trait;
use hubadmin_core::Privilege;

#[async_trait]
pub trait AuthorizationService: Send + Sync {
    async fn role_has_privilege(&self, role_id: &str, privilege: Privilege) -> bool;
}
