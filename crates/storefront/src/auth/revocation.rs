//! [`RevocationList`]: token ids that were signed out before expiring.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

/// Thread-safe set of revoked token ids, each kept until its expiry.
#[derive(Clone, Debug, Default)]
pub struct RevocationList {
    inner: Arc<RwLock<HashMap<Uuid, i64>>>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke `jti` until `exp`. Entries already past expiry are pruned.
    pub async fn revoke(&self, jti: Uuid, exp: i64, now: i64) {
        let mut lock = self.inner.write().await;
        lock.retain(|_, e| *e > now);
        lock.insert(jti, exp);
    }

    pub async fn is_revoked(&self, jti: &Uuid) -> bool {
        self.inner.read().await.contains_key(jti)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn revoke_and_check() {
        let list = RevocationList::new();
        let jti = Uuid::new_v4();
        assert!(!list.is_revoked(&jti).await);
        list.revoke(jti, 200, 100).await;
        assert!(list.is_revoked(&jti).await);
    }

    #[tokio::test]
    async fn expired_entries_are_pruned() {
        let list = RevocationList::new();
        let old = Uuid::new_v4();
        list.revoke(old, 150, 100).await;
        list.revoke(Uuid::new_v4(), 500, 200).await;
        assert_eq!(list.len().await, 1);
        assert!(!list.is_revoked(&old).await);
    }
}
