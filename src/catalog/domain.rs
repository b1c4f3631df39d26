pub mod service;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;
use crate::core::library::LibraryResult;

// CatalogStats backs the dashboard counters.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub available: usize,
    pub issued: usize,
}

/// CatalogService owns the in-memory catalog of books and mediates every
/// lifecycle mutation. Each successful mutation is committed through the
/// snapshot store before the caller sees success; a failed commit rolls the
/// mutation back and surfaces as a persistence error.
#[async_trait]
pub trait CatalogService: Sync + Send {
    async fn add_book(&self, book: &BookEntity) -> LibraryResult<BookEntity>;

    async fn remove_book(&self, isbn: &str) -> LibraryResult<()>;

    async fn find_book(&self, isbn: &str) -> LibraryResult<BookEntity>;

    // keyword search over title/author/isbn; empty keyword returns the full
    // catalog; results come back in isbn order so a fixed catalog state
    // always lists the same way
    async fn search_books(&self, keyword: &str) -> LibraryResult<Vec<BookEntity>>;

    async fn all_books(&self) -> LibraryResult<Vec<BookEntity>>;

    async fn available_books(&self) -> LibraryResult<Vec<BookEntity>>;

    async fn issued_books(&self) -> LibraryResult<Vec<BookEntity>>;

    async fn issue_book(&self, isbn: &str, holder: &str, loan_days: i64) -> LibraryResult<BookEntity>;

    async fn return_book(&self, isbn: &str) -> LibraryResult<BookEntity>;

    // self-service return, fails unless holder matches the recorded holder
    async fn return_book_for_holder(&self, isbn: &str, holder: &str) -> LibraryResult<BookEntity>;

    async fn stats(&self) -> LibraryResult<CatalogStats>;
}
