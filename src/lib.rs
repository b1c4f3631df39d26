//! Lending and request workflow engine for a small library catalog: book
//! lifecycle rules, issue/return, due-date arithmetic and the borrow-request
//! approval state machine, with durable snapshots behind a narrow gateway.

pub mod books;
pub mod catalog;
pub mod core;
pub mod gateway;
pub mod identity;
pub mod lending;
pub mod requests;
pub mod utils;

use std::sync::Arc;
use crate::catalog::domain::CatalogService;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::gateway::SnapshotStoreKind;
use crate::identity::domain::PrincipalRegistry;
use crate::identity::domain::context::IdentityContext;
use crate::requests::domain::RequestService;

/// LibraryContext wires the services once per process and hands out shared
/// handles. There is no ambient global state; anything that needs the catalog
/// or the registry receives it from here.
pub struct LibraryContext {
    pub config: Configuration,
    pub catalog_service: Arc<dyn CatalogService>,
    pub request_service: Arc<dyn RequestService>,
    pub principal_registry: Arc<dyn PrincipalRegistry>,
}

impl LibraryContext {
    pub async fn new(config: &Configuration, kind: SnapshotStoreKind) -> LibraryResult<Self> {
        let snapshot_store = gateway::factory::create_snapshot_store(config, kind);
        let principal_registry = identity::factory::create_principal_registry(snapshot_store.clone()).await?;
        let catalog_service = catalog::factory::create_catalog_service(snapshot_store.clone()).await?;
        let request_service = requests::factory::create_request_service(
            catalog_service.clone(), snapshot_store).await?;
        Ok(Self {
            config: config.clone(),
            catalog_service,
            request_service,
            principal_registry,
        })
    }

    // one session per caller; each holds its own signed-in principal
    pub fn open_session(&self) -> IdentityContext {
        identity::factory::create_identity_context(self.principal_registry.clone())
    }
}
