use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use tokio::sync::RwLock;
use crate::core::library::{LibraryError, LibraryResult};
use crate::gateway::{CatalogSnapshot, PrincipalsSnapshot, RequestsSnapshot, SnapshotStore};

// MemorySnapshotStore keeps snapshots in process memory. It backs tests and
// any deployment that does not want durable state. Saves can be switched to
// fail so callers can exercise their rollback paths.
pub struct MemorySnapshotStore {
    catalog: RwLock<CatalogSnapshot>,
    principals: RwLock<PrincipalsSnapshot>,
    requests: RwLock<RequestsSnapshot>,
    fail_saves: AtomicBool,
    fail_request_saves: AtomicBool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self {
            catalog: RwLock::new(CatalogSnapshot::empty()),
            principals: RwLock::new(PrincipalsSnapshot::empty()),
            requests: RwLock::new(RequestsSnapshot::empty()),
            fail_saves: AtomicBool::new(false),
            fail_request_saves: AtomicBool::new(false),
        }
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    // fails only request saves, catalog and principal saves keep working
    pub fn set_fail_request_saves(&self, fail: bool) {
        self.fail_request_saves.store(fail, Ordering::SeqCst);
    }

    fn check_save(&self, what: &str) -> LibraryResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LibraryError::persistence(
                format!("simulated save failure for {}", what).as_str(), false));
        }
        Ok(())
    }
}

impl Default for MemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load_catalog(&self) -> LibraryResult<CatalogSnapshot> {
        Ok(self.catalog.read().await.clone())
    }

    async fn save_catalog(&self, snapshot: &CatalogSnapshot) -> LibraryResult<()> {
        self.check_save("catalog")?;
        *self.catalog.write().await = snapshot.clone();
        Ok(())
    }

    async fn load_principals(&self) -> LibraryResult<PrincipalsSnapshot> {
        Ok(self.principals.read().await.clone())
    }

    async fn save_principals(&self, snapshot: &PrincipalsSnapshot) -> LibraryResult<()> {
        self.check_save("principals")?;
        *self.principals.write().await = snapshot.clone();
        Ok(())
    }

    async fn load_requests(&self) -> LibraryResult<RequestsSnapshot> {
        Ok(self.requests.read().await.clone())
    }

    async fn save_requests(&self, snapshot: &RequestsSnapshot) -> LibraryResult<()> {
        self.check_save("requests")?;
        if self.fail_request_saves.load(Ordering::SeqCst) {
            return Err(LibraryError::persistence("simulated save failure for requests", false));
        }
        *self.requests.write().await = snapshot.clone();
        Ok(())
    }
}
