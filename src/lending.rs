use chrono::{Duration, NaiveDateTime};
use crate::books::domain::model::BookEntity;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Signed days until the due date: positive means days remaining, zero means
/// due today, negative means days overdue. `None` when the book carries no
/// loan. Elapsed milliseconds are floored to whole days so a partial day past
/// due already reads as overdue, and a partial day remaining never does.
pub fn days_until_due(book: &BookEntity, now: NaiveDateTime) -> Option<i64> {
    let due_at = book.due_at()?;
    let millis = (due_at - now).num_milliseconds();
    Some(millis.div_euclid(MILLIS_PER_DAY))
}

pub fn is_overdue(book: &BookEntity, now: NaiveDateTime) -> bool {
    match book.due_at() {
        Some(due_at) => due_at < now,
        None => false,
    }
}

pub fn compute_due_date(now: NaiveDateTime, days: i64) -> NaiveDateTime {
    now + Duration::days(days)
}
