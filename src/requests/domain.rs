pub mod model;
pub mod service;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::requests::domain::model::RequestEntity;

/// RequestService owns all borrow requests and drives the
/// Pending -> Approved / Pending -> Rejected state machine. Approval performs
/// the actual issue against the catalog; rejection has no catalog side
/// effect. Resolved requests are terminal and stay around as an audit trail.
#[async_trait]
pub trait RequestService: Sync + Send {
    // availability is deliberately not checked here; it can change before
    // approval, which re-checks by attempting the issue
    async fn create_request(&self, isbn: &str, requester: &str) -> LibraryResult<RequestEntity>;

    async fn approve_request(&self, request_id: &str, loan_days: i64) -> LibraryResult<RequestEntity>;

    async fn reject_request(&self, request_id: &str) -> LibraryResult<RequestEntity>;

    async fn pending_requests(&self) -> LibraryResult<Vec<RequestEntity>>;

    async fn requests_by(&self, requester: &str) -> LibraryResult<Vec<RequestEntity>>;
}
