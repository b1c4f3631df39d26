use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};
use crate::catalog::domain::CatalogService;
use crate::core::library::{LibraryError, LibraryResult, RequestStatus};
use crate::gateway::{RequestsSnapshot, SnapshotStore};
use crate::requests::domain::RequestService;
use crate::requests::domain::model::RequestEntity;

// RequestServiceImpl keeps requests in creation order behind one write lock.
// The lock is held across the state transition and its snapshot commit, and
// across the catalog issue during approval, so no reader observes an
// approved request whose book was never issued.
pub(crate) struct RequestServiceImpl {
    requests: RwLock<Vec<RequestEntity>>,
    catalog_service: Arc<dyn CatalogService>,
    snapshot_store: Arc<dyn SnapshotStore>,
}

impl RequestServiceImpl {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>,
                      snapshot_store: Arc<dyn SnapshotStore>,
                      initial: Vec<RequestEntity>) -> Self {
        Self {
            requests: RwLock::new(initial),
            catalog_service,
            snapshot_store,
        }
    }

    async fn commit(&self, requests: &[RequestEntity]) -> LibraryResult<()> {
        let snapshot = RequestsSnapshot::new(requests.to_vec());
        if let Err(err) = self.snapshot_store.save_requests(&snapshot).await {
            warn!("request commit failed, rolling back in-memory change: {}", err);
            return Err(LibraryError::persistence(
                format!("request commit failed: {}", err).as_str(), true));
        }
        Ok(())
    }
}

#[async_trait]
impl RequestService for RequestServiceImpl {
    async fn create_request(&self, isbn: &str, requester: &str) -> LibraryResult<RequestEntity> {
        // the book must exist, but it may well be on loan right now
        let _ = self.catalog_service.find_book(isbn).await?;

        let mut requests = self.requests.write().await;
        let duplicate = requests.iter().any(|request| {
            request.isbn == isbn && request.requester == requester && request.is_pending()
        });
        if duplicate {
            return Err(LibraryError::duplicate_pending(
                format!("{} already has a pending request for isbn {}", requester, isbn).as_str()));
        }

        let request = RequestEntity::new(isbn, requester);
        requests.push(request.clone());
        if let Err(err) = self.commit(requests.as_slice()).await {
            requests.pop();
            return Err(err);
        }
        info!("created request {} for isbn {}", request.request_id, isbn);
        Ok(request)
    }

    async fn approve_request(&self, request_id: &str, loan_days: i64) -> LibraryResult<RequestEntity> {
        let mut requests = self.requests.write().await;
        let index = requests.iter().position(|request| request.request_id == request_id)
            .ok_or_else(|| LibraryError::not_found(
                format!("request with id {} not found", request_id).as_str()))?;
        if !requests[index].is_pending() {
            return Err(LibraryError::request_not_pending(
                format!("request with id {} is already {}", request_id, requests[index].status).as_str()));
        }

        // re-check availability by attempting the issue; on failure the
        // request stays pending and the underlying cause surfaces so the
        // caller can retry later or reject
        let isbn = requests[index].isbn.to_string();
        let requester = requests[index].requester.to_string();
        let _ = self.catalog_service.issue_book(isbn.as_str(), requester.as_str(), loan_days).await?;

        requests[index].status = RequestStatus::Approved;
        if let Err(err) = self.commit(requests.as_slice()).await {
            // undo both halves: the status flip and the issue it caused
            requests[index].status = RequestStatus::Pending;
            if let Err(undo_err) = self.catalog_service.return_book(isbn.as_str()).await {
                warn!("could not undo issue of {} after failed request commit: {}", isbn, undo_err);
            }
            return Err(err);
        }
        info!("approved request {} for isbn {}", request_id, isbn);
        Ok(requests[index].clone())
    }

    async fn reject_request(&self, request_id: &str) -> LibraryResult<RequestEntity> {
        let mut requests = self.requests.write().await;
        let index = requests.iter().position(|request| request.request_id == request_id)
            .ok_or_else(|| LibraryError::not_found(
                format!("request with id {} not found", request_id).as_str()))?;
        if !requests[index].is_pending() {
            return Err(LibraryError::request_not_pending(
                format!("request with id {} is already {}", request_id, requests[index].status).as_str()));
        }

        requests[index].status = RequestStatus::Rejected;
        if let Err(err) = self.commit(requests.as_slice()).await {
            requests[index].status = RequestStatus::Pending;
            return Err(err);
        }
        info!("rejected request {}", request_id);
        Ok(requests[index].clone())
    }

    async fn pending_requests(&self) -> LibraryResult<Vec<RequestEntity>> {
        Ok(self.requests.read().await.iter()
            .filter(|request| request.is_pending())
            .cloned()
            .collect())
    }

    async fn requests_by(&self, requester: &str) -> LibraryResult<Vec<RequestEntity>> {
        Ok(self.requests.read().await.iter()
            .filter(|request| request.requester == requester)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::books::domain::model::BookEntity;
    use crate::catalog::domain::CatalogService;
    use crate::catalog::domain::service::CatalogServiceImpl;
    use crate::core::library::{LibraryError, RequestStatus};
    use crate::gateway::memory::MemorySnapshotStore;
    use crate::requests::domain::RequestService;
    use crate::requests::domain::service::RequestServiceImpl;

    async fn build_services() -> (Arc<MemorySnapshotStore>, Arc<dyn CatalogService>, RequestServiceImpl) {
        let store = Arc::new(MemorySnapshotStore::new());
        let catalog_svc: Arc<dyn CatalogService> = Arc::new(CatalogServiceImpl::new(store.clone(), vec![]));
        let _ = catalog_svc.add_book(&BookEntity::new("isbn1", "title", "author", "genre"))
            .await.expect("should add book");
        let request_svc = RequestServiceImpl::new(catalog_svc.clone(), store.clone(), vec![]);
        (store, catalog_svc, request_svc)
    }

    #[tokio::test]
    async fn test_should_create_request_for_existing_book() {
        let (_, _, request_svc) = build_services().await;
        let request = request_svc.create_request("isbn1", "bob").await.expect("should create");
        assert_eq!(RequestStatus::Pending, request.status);
        assert_eq!(1, request_svc.pending_requests().await.expect("should list").len());
    }

    #[tokio::test]
    async fn test_should_reject_request_for_missing_book() {
        let (_, _, request_svc) = build_services().await;
        let res = request_svc.create_request("nope", "bob").await;
        assert!(matches!(res, Err(LibraryError::NotFound { message: _ })));
        assert_eq!(0, request_svc.pending_requests().await.expect("should list").len());
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_pending_request() {
        let (_, _, request_svc) = build_services().await;
        let _ = request_svc.create_request("isbn1", "bob").await.expect("should create");
        let res = request_svc.create_request("isbn1", "bob").await;
        assert!(matches!(res, Err(LibraryError::DuplicatePending { message: _ })));

        // a different requester may still ask for the same book
        let _ = request_svc.create_request("isbn1", "alice").await.expect("should create");
        assert_eq!(2, request_svc.pending_requests().await.expect("should list").len());
    }

    #[tokio::test]
    async fn test_should_allow_request_while_book_is_on_loan() {
        let (_, catalog_svc, request_svc) = build_services().await;
        let _ = catalog_svc.issue_book("isbn1", "alice", 14).await.expect("should issue");
        let request = request_svc.create_request("isbn1", "bob").await.expect("should create");
        assert!(request.is_pending());
    }

    #[tokio::test]
    async fn test_should_approve_and_issue_book() {
        let (_, catalog_svc, request_svc) = build_services().await;
        let request = request_svc.create_request("isbn1", "bob").await.expect("should create");

        let approved = request_svc.approve_request(request.request_id.as_str(), 14)
            .await.expect("should approve");
        assert_eq!(RequestStatus::Approved, approved.status);

        let book = catalog_svc.find_book("isbn1").await.expect("should return book");
        assert_eq!(Some("bob"), book.holder());
    }

    #[tokio::test]
    async fn test_should_keep_request_pending_when_issue_fails() {
        let (_, catalog_svc, request_svc) = build_services().await;
        let request = request_svc.create_request("isbn1", "bob").await.expect("should create");
        // someone else grabs the book between request and approval
        let _ = catalog_svc.issue_book("isbn1", "alice", 14).await.expect("should issue");

        let res = request_svc.approve_request(request.request_id.as_str(), 14).await;
        assert!(matches!(res, Err(LibraryError::AlreadyOnLoan { message: _ })));
        assert_eq!(1, request_svc.pending_requests().await.expect("should list").len());

        // rejecting the stuck request still works
        let rejected = request_svc.reject_request(request.request_id.as_str())
            .await.expect("should reject");
        assert_eq!(RequestStatus::Rejected, rejected.status);
    }

    #[tokio::test]
    async fn test_should_refuse_transitions_out_of_terminal_states() {
        let (_, _, request_svc) = build_services().await;
        let request = request_svc.create_request("isbn1", "bob").await.expect("should create");
        let _ = request_svc.reject_request(request.request_id.as_str()).await.expect("should reject");

        let res = request_svc.approve_request(request.request_id.as_str(), 14).await;
        assert!(matches!(res, Err(LibraryError::RequestNotPending { message: _ })));
        let res = request_svc.reject_request(request.request_id.as_str()).await;
        assert!(matches!(res, Err(LibraryError::RequestNotPending { message: _ })));
    }

    #[tokio::test]
    async fn test_should_fail_on_unknown_request_id() {
        let (_, _, request_svc) = build_services().await;
        assert!(matches!(request_svc.approve_request("missing", 14).await,
            Err(LibraryError::NotFound { message: _ })));
        assert!(matches!(request_svc.reject_request("missing").await,
            Err(LibraryError::NotFound { message: _ })));
    }

    #[tokio::test]
    async fn test_should_project_requests_in_creation_order() {
        let (_, catalog_svc, request_svc) = build_services().await;
        let _ = catalog_svc.add_book(&BookEntity::new("isbn2", "other", "author", "genre"))
            .await.expect("should add book");

        let first = request_svc.create_request("isbn1", "bob").await.expect("should create");
        let second = request_svc.create_request("isbn2", "bob").await.expect("should create");
        let _ = request_svc.create_request("isbn1", "alice").await.expect("should create");

        let mine = request_svc.requests_by("bob").await.expect("should list");
        assert_eq!(vec![first.request_id.to_string(), second.request_id.to_string()],
                   mine.iter().map(|request| request.request_id.to_string()).collect::<Vec<_>>());

        let pending = request_svc.pending_requests().await.expect("should list");
        assert_eq!(3, pending.len());
        assert_eq!(first.request_id, pending[0].request_id);
    }

    #[tokio::test]
    async fn test_should_roll_back_create_when_commit_fails() {
        let (store, _, request_svc) = build_services().await;
        store.set_fail_request_saves(true);

        let res = request_svc.create_request("isbn1", "bob").await;
        assert!(matches!(res, Err(LibraryError::Persistence { message: _, rolled_back: true })));
        assert_eq!(0, request_svc.pending_requests().await.expect("should list").len());

        store.set_fail_request_saves(false);
        let _ = request_svc.create_request("isbn1", "bob").await.expect("should create");
    }

    #[tokio::test]
    async fn test_should_roll_back_approval_and_issue_when_commit_fails() {
        let (store, catalog_svc, request_svc) = build_services().await;
        let request = request_svc.create_request("isbn1", "bob").await.expect("should create");

        store.set_fail_request_saves(true);
        let res = request_svc.approve_request(request.request_id.as_str(), 14).await;
        assert!(matches!(res, Err(LibraryError::Persistence { message: _, rolled_back: true })));

        // the request is pending again and the book was handed back
        assert_eq!(1, request_svc.pending_requests().await.expect("should list").len());
        let book = catalog_svc.find_book("isbn1").await.expect("should return book");
        assert!(!book.is_on_loan());
    }
}
