use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::library::RequestStatus;
use crate::utils::date::serializer;

// RequestEntity abstracts one borrow request awaiting resolution. Requests are
// an audit trail, they are resolved but never deleted. The id is a uuid rather
// than a wall-clock stamp so concurrent requests can never collide.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RequestEntity {
    pub request_id: String,
    pub isbn: String,
    pub requester: String,
    #[serde(with = "serializer")]
    pub requested_at: NaiveDateTime,
    pub status: RequestStatus,
}

impl RequestEntity {
    pub fn new(isbn: &str, requester: &str) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            isbn: isbn.to_string(),
            requester: requester.to_string(),
            requested_at: Utc::now().naive_utc(),
            status: RequestStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}
