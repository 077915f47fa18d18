/// Audit query service
///
/// Reading the audit log is admin-only; entries expose who changed what and
/// when across every entity. Appending entries is not a service operation at
/// all: the mutating services write them inside their own transactions.

use sqlx::PgPool;

use crate::error::ServiceResult;
use crate::models::audit::{AuditFilter, AuditRecord};
use crate::models::user::User;
use crate::rbac::{self, Operation};

#[derive(Debug, Clone)]
pub struct AuditService {
    db: PgPool,
}

impl AuditService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Queries the audit log, newest first. Admin only.
    pub async fn list(&self, actor: &User, filter: &AuditFilter) -> ServiceResult<Vec<AuditRecord>> {
        rbac::authorize(actor, Operation::ViewAudit)?;
        Ok(AuditRecord::list(&self.db, filter).await?)
    }

    /// Counts matching entries for pagination. Admin only.
    pub async fn count(&self, actor: &User, filter: &AuditFilter) -> ServiceResult<i64> {
        rbac::authorize(actor, Operation::ViewAudit)?;
        Ok(AuditRecord::count(&self.db, filter).await?)
    }
}
