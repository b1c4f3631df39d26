use std::sync::Arc;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::core::library::LibraryResult;
use crate::gateway::SnapshotStore;

// Builds the catalog service from the last durable snapshot; a missing
// snapshot yields an empty catalog.
pub async fn create_catalog_service(snapshot_store: Arc<dyn SnapshotStore>) -> LibraryResult<Arc<dyn CatalogService>> {
    let snapshot = snapshot_store.load_catalog().await?;
    Ok(Arc::new(CatalogServiceImpl::new(snapshot_store, snapshot.books)))
}
