use std::collections::BTreeMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use crate::books::domain::model::BookEntity;
use crate::catalog::domain::{CatalogService, CatalogStats};
use crate::core::library::{LibraryError, LibraryResult};
use crate::gateway::{CatalogSnapshot, SnapshotStore};
use crate::lending;

// CatalogServiceImpl keeps the catalog in a BTreeMap keyed by isbn so
// listings come back in a stable order. A single write lock is held across
// the in-memory mutation and the snapshot commit; readers never observe a
// state that a failed commit would roll back.
pub(crate) struct CatalogServiceImpl {
    books: RwLock<BTreeMap<String, BookEntity>>,
    snapshot_store: Arc<dyn SnapshotStore>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(snapshot_store: Arc<dyn SnapshotStore>, initial: Vec<BookEntity>) -> Self {
        let books = initial.into_iter()
            .map(|book| (book.isbn.to_string(), book))
            .collect();
        Self {
            books: RwLock::new(books),
            snapshot_store,
        }
    }

    // Applies a mutation to a copy of the catalog and commits the copy. Only
    // after a successful commit does the copy replace the live state, so a
    // commit failure leaves memory exactly as it was.
    async fn mutate<F>(&self, apply: F) -> LibraryResult<BookEntity>
    where
        F: FnOnce(&mut BTreeMap<String, BookEntity>) -> LibraryResult<BookEntity>,
    {
        let mut guard = self.books.write().await;
        let mut next = guard.clone();
        let changed = apply(&mut next)?;
        let snapshot = CatalogSnapshot::new(next.values().cloned().collect());
        if let Err(err) = self.snapshot_store.save_catalog(&snapshot).await {
            warn!("catalog commit failed, rolling back in-memory change: {}", err);
            return Err(LibraryError::persistence(
                format!("catalog commit failed: {}", err).as_str(), true));
        }
        *guard = next;
        Ok(changed)
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, book: &BookEntity) -> LibraryResult<BookEntity> {
        let added = self.mutate(|books| {
            if books.contains_key(book.isbn.as_str()) {
                return Err(LibraryError::duplicate_key(
                    format!("book with isbn {} already exists", book.isbn).as_str()));
            }
            // new entries always start available
            let entry = BookEntity::new(book.isbn.as_str(), book.title.as_str(),
                                        book.author.as_str(), book.genre.as_str());
            books.insert(entry.isbn.to_string(), entry.clone());
            Ok(entry)
        }).await?;
        info!("added book {}", added.isbn);
        Ok(added)
    }

    async fn remove_book(&self, isbn: &str) -> LibraryResult<()> {
        let removed = self.mutate(|books| {
            let book = books.remove(isbn).ok_or_else(|| LibraryError::not_found(
                format!("book with isbn {} not found", isbn).as_str()))?;
            if book.is_on_loan() {
                return Err(LibraryError::item_on_loan(
                    format!("book with isbn {} is on loan and cannot be removed", isbn).as_str()));
            }
            Ok(book)
        }).await?;
        info!("removed book {}", removed.isbn);
        Ok(())
    }

    async fn find_book(&self, isbn: &str) -> LibraryResult<BookEntity> {
        self.books.read().await.get(isbn).cloned().ok_or_else(|| LibraryError::not_found(
            format!("book with isbn {} not found", isbn).as_str()))
    }

    async fn search_books(&self, keyword: &str) -> LibraryResult<Vec<BookEntity>> {
        Ok(self.books.read().await.values()
            .filter(|book| book.matches_keyword(keyword))
            .cloned()
            .collect())
    }

    async fn all_books(&self) -> LibraryResult<Vec<BookEntity>> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn available_books(&self) -> LibraryResult<Vec<BookEntity>> {
        Ok(self.books.read().await.values()
            .filter(|book| !book.is_on_loan())
            .cloned()
            .collect())
    }

    async fn issued_books(&self) -> LibraryResult<Vec<BookEntity>> {
        Ok(self.books.read().await.values()
            .filter(|book| book.is_on_loan())
            .cloned()
            .collect())
    }

    async fn issue_book(&self, isbn: &str, holder: &str, loan_days: i64) -> LibraryResult<BookEntity> {
        let holder = holder.to_string();
        let issued = self.mutate(move |books| {
            let book = books.get_mut(isbn).ok_or_else(|| LibraryError::not_found(
                format!("book with isbn {} not found", isbn).as_str()))?;
            if book.is_on_loan() {
                return Err(LibraryError::already_on_loan(
                    format!("book with isbn {} is already on loan", isbn).as_str()));
            }
            if loan_days <= 0 {
                return Err(LibraryError::invalid_duration(
                    format!("loan duration of {} days is not positive", loan_days).as_str()));
            }
            let now = Utc::now().naive_utc();
            book.issue_to(holder.as_str(), now, lending::compute_due_date(now, loan_days));
            Ok(book.clone())
        }).await?;
        info!("issued book {} for {} days", issued.isbn, loan_days);
        Ok(issued)
    }

    async fn return_book(&self, isbn: &str) -> LibraryResult<BookEntity> {
        let returned = self.mutate(|books| {
            let book = books.get_mut(isbn).ok_or_else(|| LibraryError::not_found(
                format!("book with isbn {} not found", isbn).as_str()))?;
            if !book.is_on_loan() {
                return Err(LibraryError::not_on_loan(
                    format!("book with isbn {} is not on loan", isbn).as_str()));
            }
            book.clear_loan();
            Ok(book.clone())
        }).await?;
        info!("returned book {}", returned.isbn);
        Ok(returned)
    }

    async fn return_book_for_holder(&self, isbn: &str, holder: &str) -> LibraryResult<BookEntity> {
        let holder = holder.to_string();
        let returned = self.mutate(move |books| {
            let book = books.get_mut(isbn).ok_or_else(|| LibraryError::not_found(
                format!("book with isbn {} not found", isbn).as_str()))?;
            if !book.is_on_loan() {
                return Err(LibraryError::not_on_loan(
                    format!("book with isbn {} is not on loan", isbn).as_str()));
            }
            if book.holder() != Some(holder.as_str()) {
                return Err(LibraryError::not_holder(
                    format!("book with isbn {} is not held by {}", isbn, holder).as_str()));
            }
            book.clear_loan();
            Ok(book.clone())
        }).await?;
        info!("returned book {} by its holder", returned.isbn);
        Ok(returned)
    }

    async fn stats(&self) -> LibraryResult<CatalogStats> {
        let books = self.books.read().await;
        let issued = books.values().filter(|book| book.is_on_loan()).count();
        Ok(CatalogStats {
            total: books.len(),
            available: books.len() - issued,
            issued,
        })
    }
}
