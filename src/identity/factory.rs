use std::sync::Arc;
use tracing::info;
use crate::core::library::LibraryResult;
use crate::gateway::{PrincipalsSnapshot, SnapshotStore};
use crate::identity::domain::PrincipalRegistry;
use crate::identity::domain::context::IdentityContext;
use crate::identity::domain::service::{default_principals, PrincipalRegistryImpl};

// Builds the registry from the last durable snapshot. An empty store gets the
// default accounts seeded and committed before the registry is handed out.
pub async fn create_principal_registry(snapshot_store: Arc<dyn SnapshotStore>) -> LibraryResult<Arc<dyn PrincipalRegistry>> {
    let snapshot = snapshot_store.load_principals().await?;
    let principals = if snapshot.principals.is_empty() {
        let seeded = default_principals();
        snapshot_store.save_principals(&PrincipalsSnapshot::new(seeded.clone())).await?;
        info!("seeded {} default principals", seeded.len());
        seeded
    } else {
        snapshot.principals
    };
    Ok(Arc::new(PrincipalRegistryImpl::new(snapshot_store, principals)))
}

pub fn create_identity_context(registry: Arc<dyn PrincipalRegistry>) -> IdentityContext {
    IdentityContext::new(registry)
}
