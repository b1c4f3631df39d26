use std::sync::Arc;
use crate::catalog::domain::CatalogService;
use crate::core::library::LibraryResult;
use crate::gateway::SnapshotStore;
use crate::requests::domain::RequestService;
use crate::requests::domain::service::RequestServiceImpl;

pub async fn create_request_service(catalog_service: Arc<dyn CatalogService>,
                                    snapshot_store: Arc<dyn SnapshotStore>) -> LibraryResult<Arc<dyn RequestService>> {
    let snapshot = snapshot_store.load_requests().await?;
    Ok(Arc::new(RequestServiceImpl::new(catalog_service, snapshot_store, snapshot.requests)))
}
