use std::path::PathBuf;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use crate::core::library::{LibraryError, LibraryResult};
use crate::gateway::{CatalogSnapshot, PrincipalsSnapshot, RequestsSnapshot, SnapshotStore};

const CATALOG_FILE: &str = "books.json";
const PRINCIPALS_FILE: &str = "users.json";
const REQUESTS_FILE: &str = "requests.json";

// FileSnapshotStore keeps each snapshot as a json file under a data
// directory. Writes go to a temp file first and rename into place so a crash
// mid-write cannot truncate the previous snapshot.
pub struct FileSnapshotStore {
    data_dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(data_dir: &str) -> Self {
        Self { data_dir: PathBuf::from(data_dir) }
    }

    async fn read_snapshot<T: DeserializeOwned>(&self, file_name: &str) -> LibraryResult<Option<T>> {
        let path = self.data_dir.join(file_name);
        if !path.exists() {
            return Ok(None);
        }
        let raw = tokio::fs::read_to_string(path.as_path()).await?;
        let snapshot = serde_json::from_str(raw.as_str())?;
        Ok(Some(snapshot))
    }

    async fn write_snapshot<T: Serialize>(&self, file_name: &str, snapshot: &T) -> LibraryResult<()> {
        tokio::fs::create_dir_all(self.data_dir.as_path()).await?;
        let raw = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.data_dir.join(format!("{}.tmp", file_name));
        let path = self.data_dir.join(file_name);
        tokio::fs::write(tmp.as_path(), raw).await?;
        if let Err(err) = tokio::fs::rename(tmp.as_path(), path.as_path()).await {
            warn!("failed to move snapshot {} into place: {}", file_name, err);
            return Err(LibraryError::from(err));
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load_catalog(&self) -> LibraryResult<CatalogSnapshot> {
        Ok(self.read_snapshot(CATALOG_FILE).await?.unwrap_or_else(CatalogSnapshot::empty))
    }

    async fn save_catalog(&self, snapshot: &CatalogSnapshot) -> LibraryResult<()> {
        self.write_snapshot(CATALOG_FILE, snapshot).await
    }

    async fn load_principals(&self) -> LibraryResult<PrincipalsSnapshot> {
        Ok(self.read_snapshot(PRINCIPALS_FILE).await?.unwrap_or_else(PrincipalsSnapshot::empty))
    }

    async fn save_principals(&self, snapshot: &PrincipalsSnapshot) -> LibraryResult<()> {
        self.write_snapshot(PRINCIPALS_FILE, snapshot).await
    }

    async fn load_requests(&self) -> LibraryResult<RequestsSnapshot> {
        Ok(self.read_snapshot(REQUESTS_FILE).await?.unwrap_or_else(RequestsSnapshot::empty))
    }

    async fn save_requests(&self, snapshot: &RequestsSnapshot) -> LibraryResult<()> {
        self.write_snapshot(REQUESTS_FILE, snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::BookEntity;
    use crate::gateway::{CatalogSnapshot, RequestsSnapshot, SnapshotStore, SNAPSHOT_VERSION};
    use crate::gateway::file::FileSnapshotStore;
    use crate::requests::domain::model::RequestEntity;

    fn store_in(dir: &tempfile::TempDir) -> FileSnapshotStore {
        FileSnapshotStore::new(dir.path().to_str().expect("utf8 path"))
    }

    #[tokio::test]
    async fn test_should_load_empty_catalog_when_no_snapshot_exists() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let store = store_in(&dir);
        let snapshot = store.load_catalog().await.expect("should load");
        assert_eq!(0, snapshot.books.len());
        assert_eq!(SNAPSHOT_VERSION, snapshot.version);
    }

    #[tokio::test]
    async fn test_should_round_trip_catalog_snapshot() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let store = store_in(&dir);

        let mut book = BookEntity::new("isbn1", "title", "author", "genre");
        let now = chrono::Utc::now().naive_utc();
        book.issue_to("bob", now, now + chrono::Duration::days(14));
        let available = BookEntity::new("isbn2", "other", "author", "genre");

        let snapshot = CatalogSnapshot::new(vec![book, available]);
        store.save_catalog(&snapshot).await.expect("should save");
        let loaded = store.load_catalog().await.expect("should load");
        assert_eq!(snapshot, loaded);
    }

    #[tokio::test]
    async fn test_should_round_trip_requests_snapshot() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        let store = store_in(&dir);

        let snapshot = RequestsSnapshot::new(vec![RequestEntity::new("isbn1", "bob")]);
        store.save_requests(&snapshot).await.expect("should save");
        let loaded = store.load_requests().await.expect("should load");
        assert_eq!(snapshot, loaded);
    }

    #[tokio::test]
    async fn test_should_fail_on_corrupt_snapshot() {
        let dir = tempfile::tempdir().expect("should create tempdir");
        tokio::fs::write(dir.path().join("books.json"), "not json").await.expect("should write");
        let store = store_in(&dir);
        assert!(store.load_catalog().await.is_err());
    }
}
