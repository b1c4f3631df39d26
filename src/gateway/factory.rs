use std::sync::Arc;
use crate::core::domain::Configuration;
use crate::gateway::{SnapshotStore, SnapshotStoreKind};
use crate::gateway::file::FileSnapshotStore;
use crate::gateway::memory::MemorySnapshotStore;

pub fn create_snapshot_store(config: &Configuration, kind: SnapshotStoreKind) -> Arc<dyn SnapshotStore> {
    match kind {
        SnapshotStoreKind::File => {
            Arc::new(FileSnapshotStore::new(config.data_dir.as_str()))
        }
        SnapshotStoreKind::Memory => {
            Arc::new(MemorySnapshotStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::domain::Configuration;
    use crate::gateway::{SnapshotStore, SnapshotStoreKind};
    use crate::gateway::factory::create_snapshot_store;

    #[tokio::test]
    async fn test_should_create_memory_store() {
        let store = create_snapshot_store(&Configuration::new("test"), SnapshotStoreKind::Memory);
        assert_eq!(0, store.load_catalog().await.expect("should load").books.len());
    }
}
