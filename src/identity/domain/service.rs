use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};
use crate::core::library::{LibraryError, LibraryResult, Role};
use crate::gateway::{PrincipalsSnapshot, SnapshotStore};
use crate::identity::domain::PrincipalRegistry;
use crate::identity::domain::model::PrincipalEntity;

// Default accounts seeded into an empty store, one per role. Kept for
// compatibility with deployments that expect these sign-ins to exist.
pub(crate) fn default_principals() -> Vec<PrincipalEntity> {
    vec![
        PrincipalEntity::new("admin", "admin123", "admin@library.com", Role::Administrator),
        PrincipalEntity::new("librarian", "lib123", "librarian@library.com", Role::Curator),
        PrincipalEntity::new("member", "member123", "member@library.com", Role::Requester),
    ]
}

pub(crate) struct PrincipalRegistryImpl {
    principals: RwLock<Vec<PrincipalEntity>>,
    snapshot_store: Arc<dyn SnapshotStore>,
}

impl PrincipalRegistryImpl {
    pub(crate) fn new(snapshot_store: Arc<dyn SnapshotStore>, initial: Vec<PrincipalEntity>) -> Self {
        Self {
            principals: RwLock::new(initial),
            snapshot_store,
        }
    }
}

#[async_trait]
impl PrincipalRegistry for PrincipalRegistryImpl {
    async fn authenticate(&self, username: &str, password: &str) -> LibraryResult<PrincipalEntity> {
        let principals = self.principals.read().await;
        principals.iter()
            .find(|principal| principal.username == username && principal.validate_password(password))
            .cloned()
            .ok_or_else(|| LibraryError::invalid_credentials("invalid username or password"))
    }

    async fn register(&self, principal: &PrincipalEntity) -> LibraryResult<PrincipalEntity> {
        let mut principals = self.principals.write().await;
        if principals.iter().any(|existing| existing.username == principal.username) {
            return Err(LibraryError::duplicate_key(
                format!("principal {} already exists", principal.username).as_str()));
        }

        principals.push(principal.clone());
        let snapshot = PrincipalsSnapshot::new(principals.clone());
        if let Err(err) = self.snapshot_store.save_principals(&snapshot).await {
            warn!("principal commit failed, rolling back in-memory change: {}", err);
            principals.pop();
            return Err(LibraryError::persistence(
                format!("principal commit failed: {}", err).as_str(), true));
        }
        info!("registered principal {} as {}", principal.username, principal.role);
        Ok(principal.clone())
    }

    async fn find_principal(&self, username: &str) -> LibraryResult<PrincipalEntity> {
        self.principals.read().await.iter()
            .find(|principal| principal.username == username)
            .cloned()
            .ok_or_else(|| LibraryError::not_found(
                format!("principal {} not found", username).as_str()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::core::library::{LibraryError, Role};
    use crate::gateway::memory::MemorySnapshotStore;
    use crate::gateway::SnapshotStore;
    use crate::identity::domain::PrincipalRegistry;
    use crate::identity::domain::model::PrincipalEntity;
    use crate::identity::domain::service::{default_principals, PrincipalRegistryImpl};

    fn build_registry() -> (Arc<MemorySnapshotStore>, PrincipalRegistryImpl) {
        let store = Arc::new(MemorySnapshotStore::new());
        let registry = PrincipalRegistryImpl::new(store.clone(), default_principals());
        (store, registry)
    }

    #[tokio::test]
    async fn test_should_authenticate_default_accounts() {
        let (_, registry) = build_registry();
        let admin = registry.authenticate("admin", "admin123").await.expect("should authenticate");
        assert!(admin.is_role(Role::Administrator));
        let librarian = registry.authenticate("librarian", "lib123").await.expect("should authenticate");
        assert!(librarian.is_role(Role::Curator));
        let member = registry.authenticate("member", "member123").await.expect("should authenticate");
        assert!(member.is_role(Role::Requester));
    }

    #[tokio::test]
    async fn test_should_reject_bad_credentials() {
        let (_, registry) = build_registry();
        let res = registry.authenticate("admin", "wrong").await;
        assert!(matches!(res, Err(LibraryError::InvalidCredentials { message: _ })));
        let res = registry.authenticate("ghost", "admin123").await;
        assert!(matches!(res, Err(LibraryError::InvalidCredentials { message: _ })));
    }

    #[tokio::test]
    async fn test_should_register_and_find_principal() {
        let (store, registry) = build_registry();
        let bob = PrincipalEntity::new("bob", "secret", "bob@library.com", Role::Requester);
        let _ = registry.register(&bob).await.expect("should register");

        let found = registry.find_principal("bob").await.expect("should find");
        assert_eq!(bob, found);
        let snapshot = store.load_principals().await.expect("should load");
        assert!(snapshot.principals.iter().any(|principal| principal.username == "bob"));
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_username() {
        let (_, registry) = build_registry();
        let dup = PrincipalEntity::new("admin", "other", "other@library.com", Role::Requester);
        let res = registry.register(&dup).await;
        assert!(matches!(res, Err(LibraryError::DuplicateKey { message: _ })));
    }

    #[tokio::test]
    async fn test_should_roll_back_register_when_commit_fails() {
        let (store, registry) = build_registry();
        store.set_fail_saves(true);
        let bob = PrincipalEntity::new("bob", "secret", "bob@library.com", Role::Requester);
        let res = registry.register(&bob).await;
        assert!(matches!(res, Err(LibraryError::Persistence { message: _, rolled_back: true })));
        assert!(registry.find_principal("bob").await.is_err());
    }
}
