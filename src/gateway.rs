pub mod factory;
pub mod file;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;
use crate::core::library::LibraryResult;
use crate::identity::domain::model::PrincipalEntity;
use crate::requests::domain::model::RequestEntity;

// Snapshots are plain versioned records, never live object graphs. The
// version field lets a future format change detect old files.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub version: u32,
    pub books: Vec<BookEntity>,
}

impl CatalogSnapshot {
    pub fn new(books: Vec<BookEntity>) -> Self {
        Self { version: SNAPSHOT_VERSION, books }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PrincipalsSnapshot {
    pub version: u32,
    pub principals: Vec<PrincipalEntity>,
}

impl PrincipalsSnapshot {
    pub fn new(principals: Vec<PrincipalEntity>) -> Self {
        Self { version: SNAPSHOT_VERSION, principals }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RequestsSnapshot {
    pub version: u32,
    pub requests: Vec<RequestEntity>,
}

impl RequestsSnapshot {
    pub fn new(requests: Vec<RequestEntity>) -> Self {
        Self { version: SNAPSHOT_VERSION, requests }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

// SnapshotStore is the durability collaborator of the engine. Loads return an
// empty snapshot when nothing was saved before, missing state is not an
// error. Saves may fail and the services roll back their in-memory mutation
// when one does.
#[async_trait]
pub trait SnapshotStore: Sync + Send {
    async fn load_catalog(&self) -> LibraryResult<CatalogSnapshot>;

    async fn save_catalog(&self, snapshot: &CatalogSnapshot) -> LibraryResult<()>;

    async fn load_principals(&self) -> LibraryResult<PrincipalsSnapshot>;

    async fn save_principals(&self, snapshot: &PrincipalsSnapshot) -> LibraryResult<()>;

    async fn load_requests(&self) -> LibraryResult<RequestsSnapshot>;

    async fn save_requests(&self, snapshot: &RequestsSnapshot) -> LibraryResult<()>;
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SnapshotStoreKind {
    File,
    Memory,
}
