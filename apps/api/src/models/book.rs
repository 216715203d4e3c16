use chrono::{DateTime, Utc};
use serde::{de::IgnoredAny, Deserialize, Serialize};

use crate::models::{clamp_count, deserialize_some, merge, Resource};
use crate::store::Document;

const MAX_RATING: i64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingStatus {
    #[default]
    ToRead,
    Reading,
    Completed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub status: ReadingStatus,
    pub rating: Option<u8>,
    pub pages: u32,
    pub current_page: u32,
    pub notes: String,
    pub added_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReadingStatus>,
    /// Absent keeps the stored rating, `null` clears it.
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Server-managed; accepted so a fetched record can be sent back whole, then dropped.
    #[serde(default, skip_serializing)]
    pub id: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub added_at: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub started_at: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub finished_at: Option<IgnoredAny>,
}

impl Book {
    /// Reading progress in `[0.0, 1.0]`, or `None` when the page count is unknown.
    pub fn progress(&self) -> Option<f64> {
        (self.pages > 0).then(|| f64::from(self.current_page) / f64::from(self.pages))
    }

    fn transition(&mut self, status: ReadingStatus, now: DateTime<Utc>) {
        if status == self.status {
            return;
        }
        match status {
            ReadingStatus::ToRead => {
                self.started_at = None;
                self.finished_at = None;
            }
            ReadingStatus::Reading => {
                self.started_at.get_or_insert(now);
                self.finished_at = None;
            }
            ReadingStatus::Completed => {
                self.started_at.get_or_insert(now);
                self.finished_at = Some(now);
                self.current_page = self.pages;
            }
        }
        self.status = status;
    }
}

impl Resource for Book {
    const COLLECTION: &'static str = "books";
    const LABEL: &'static str = "Book";

    type Patch = BookPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, patch: BookPatch, now: DateTime<Utc>) -> Self {
        let mut book = Book {
            id,
            added_at: now,
            ..Default::default()
        };
        book.apply(patch, now);
        book
    }

    fn apply(&mut self, patch: BookPatch, now: DateTime<Utc>) {
        merge(&mut self.title, patch.title);
        merge(&mut self.author, patch.author);
        merge(&mut self.genre, patch.genre);
        merge(&mut self.notes, patch.notes);
        merge(&mut self.pages, patch.pages.map(clamp_count));
        merge(&mut self.current_page, patch.current_page.map(clamp_count));
        if let Some(rating) = patch.rating {
            self.rating = rating.map(|r| r.clamp(0, MAX_RATING) as u8);
        }
        if let Some(status) = patch.status {
            self.transition(status, now);
        }
        if self.pages > 0 {
            self.current_page = self.current_page.min(self.pages);
        }
    }

    fn collection(doc: &Document) -> &Vec<Self> {
        &doc.books
    }

    fn collection_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.books
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.author.as_str(), self.notes.as_str()]
    }

    fn category(&self) -> Option<&str> {
        Some(self.genre.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn book(pages: i64) -> Book {
        Book::create(
            "1".into(),
            BookPatch {
                title: Some("Dune".into()),
                pages: Some(pages),
                ..Default::default()
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_new_book_is_to_read() {
        let b = book(400);
        assert_eq!(b.status, ReadingStatus::ToRead);
        assert!(b.started_at.is_none());
        assert!(b.finished_at.is_none());
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_value(ReadingStatus::ToRead).unwrap();
        assert_eq!(json, "to-read");
    }

    #[test]
    fn test_reading_sets_started_at_once() {
        let mut b = book(400);
        let t1 = Utc::now();
        b.apply(
            BookPatch {
                status: Some(ReadingStatus::Reading),
                ..Default::default()
            },
            t1,
        );
        assert_eq!(b.started_at, Some(t1));
        b.apply(
            BookPatch {
                status: Some(ReadingStatus::Reading),
                ..Default::default()
            },
            t1 + Duration::days(1),
        );
        assert_eq!(b.started_at, Some(t1));
    }

    #[test]
    fn test_completed_sets_finished_and_last_page() {
        let mut b = book(400);
        let now = Utc::now();
        b.apply(
            BookPatch {
                status: Some(ReadingStatus::Completed),
                ..Default::default()
            },
            now,
        );
        assert_eq!(b.finished_at, Some(now));
        assert_eq!(b.current_page, 400);
        assert_eq!(b.progress(), Some(1.0));
    }

    #[test]
    fn test_back_to_read_clears_dates() {
        let mut b = book(100);
        b.apply(
            BookPatch {
                status: Some(ReadingStatus::Completed),
                ..Default::default()
            },
            Utc::now(),
        );
        b.apply(
            BookPatch {
                status: Some(ReadingStatus::ToRead),
                ..Default::default()
            },
            Utc::now(),
        );
        assert!(b.started_at.is_none());
        assert!(b.finished_at.is_none());
    }

    #[test]
    fn test_current_page_clamped_to_pages() {
        let mut b = book(300);
        b.apply(
            BookPatch {
                current_page: Some(999),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(b.current_page, 300);
        b.apply(
            BookPatch {
                current_page: Some(-5),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(b.current_page, 0);
    }

    #[test]
    fn test_rating_clamped() {
        let mut b = book(10);
        b.apply(
            BookPatch {
                rating: Some(Some(9)),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(b.rating, Some(5));
    }

    #[test]
    fn test_null_rating_clears_and_absent_keeps() {
        let mut b = book(10);
        b.apply(serde_json::from_str(r#"{"rating":4}"#).unwrap(), Utc::now());
        assert_eq!(b.rating, Some(4));

        b.apply(serde_json::from_str(r#"{"notes":"loved it"}"#).unwrap(), Utc::now());
        assert_eq!(b.rating, Some(4));

        b.apply(serde_json::from_str(r#"{"rating":null}"#).unwrap(), Utc::now());
        assert_eq!(b.rating, None);
    }

    #[test]
    fn test_progress_unknown_without_pages() {
        assert_eq!(book(0).progress(), None);
    }
}
