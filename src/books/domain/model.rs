use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::utils::date::serializer;

// LoanRecord captures the borrowed state of a book. It only exists while the
// book is checked out, so holder/issued/due are never set on an available book
// and always set together on a borrowed one.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LoanRecord {
    pub holder: String,
    #[serde(with = "serializer")]
    pub issued_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub due_at: NaiveDateTime,
}

// BookEntity abstracts one lendable book in the catalog, keyed by isbn.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BookEntity {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub loan: Option<LoanRecord>,
}

impl BookEntity {
    pub fn new(isbn: &str, title: &str, author: &str, genre: &str) -> Self {
        Self {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            loan: None,
        }
    }

    pub fn is_on_loan(&self) -> bool {
        self.loan.is_some()
    }

    pub fn holder(&self) -> Option<&str> {
        self.loan.as_ref().map(|loan| loan.holder.as_str())
    }

    pub fn due_at(&self) -> Option<NaiveDateTime> {
        self.loan.as_ref().map(|loan| loan.due_at)
    }

    pub fn issue_to(&mut self, holder: &str, issued_at: NaiveDateTime, due_at: NaiveDateTime) {
        self.loan = Some(LoanRecord {
            holder: holder.to_string(),
            issued_at,
            due_at,
        });
    }

    pub fn clear_loan(&mut self) {
        self.loan = None;
    }

    // keyword match over title, author and isbn; empty keyword matches all
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let lower = keyword.to_lowercase();
        self.title.to_lowercase().contains(lower.as_str())
            || self.author.to_lowercase().contains(lower.as_str())
            || self.isbn.to_lowercase().contains(lower.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::books::domain::model::BookEntity;

    #[tokio::test]
    async fn test_should_build_available_book() {
        let book = BookEntity::new("isbn1", "title", "author", "genre");
        assert_eq!("isbn1", book.isbn.as_str());
        assert!(!book.is_on_loan());
        assert_eq!(None, book.holder());
        assert_eq!(None, book.due_at());
    }

    #[tokio::test]
    async fn test_should_set_and_clear_loan_fields_together() {
        let mut book = BookEntity::new("isbn1", "title", "author", "genre");
        let now = Utc::now().naive_utc();
        book.issue_to("bob", now, now + Duration::days(14));
        assert!(book.is_on_loan());
        assert_eq!(Some("bob"), book.holder());
        assert_eq!(Some(now + Duration::days(14)), book.due_at());

        book.clear_loan();
        assert!(!book.is_on_loan());
        assert_eq!(None, book.holder());
        assert_eq!(None, book.due_at());
    }

    #[tokio::test]
    async fn test_should_match_keyword() {
        let book = BookEntity::new("978-0134685991", "Effective Java", "Joshua Bloch", "Programming");
        assert!(book.matches_keyword("effective"));
        assert!(book.matches_keyword("BLOCH"));
        assert!(book.matches_keyword("0134685991"));
        assert!(book.matches_keyword(""));
        assert!(!book.matches_keyword("smalltalk"));
    }
}
