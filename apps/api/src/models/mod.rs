pub mod book;
pub mod event;
pub mod habit;
pub mod home;
pub mod note;
pub mod page;
pub mod settings;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::store::Document;

pub use book::{Book, BookPatch, ReadingStatus};
pub use event::{Event, EventPatch};
pub use habit::{Frequency, Habit, HabitPatch};
pub use home::{HomePatch, HomeSummary};
pub use note::{Note, NotePatch};
pub use page::{NotebookPage, NotebookPagePatch};
pub use settings::{Settings, SettingsPatch};

/// A record collection stored as one array in the persisted document.
///
/// Every collection shares the same contract: ids are assigned by the server,
/// callers only ever send an allow-listed `Patch`, and `apply` merges the
/// fields present in that patch while leaving every other field untouched.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Document key and URL path segment, e.g. `notes`.
    const COLLECTION: &'static str;
    /// Name used in not-found messages, e.g. `Note`.
    const LABEL: &'static str;

    type Patch: Serialize + DeserializeOwned + Send + Sync + 'static;

    fn id(&self) -> &str;

    /// Builds a record from the resource defaults with `patch` applied on top.
    fn create(id: String, patch: Self::Patch, now: DateTime<Utc>) -> Self;

    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    fn collection(doc: &Document) -> &Vec<Self>;

    fn collection_mut(doc: &mut Document) -> &mut Vec<Self>;

    /// Free-text fields searched by client-side filtering.
    fn search_text(&self) -> Vec<&str> {
        Vec::new()
    }

    fn category(&self) -> Option<&str> {
        None
    }

    fn tags(&self) -> &[String] {
        &[]
    }
}

/// An object with exactly one instance in the document (settings, home).
pub trait Singleton: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KEY: &'static str;

    type Patch: Serialize + DeserializeOwned + Send + Sync + 'static;

    fn apply(&mut self, patch: Self::Patch);

    fn get(doc: &Document) -> &Self;

    fn get_mut(doc: &mut Document) -> &mut Self;
}

/// Overwrites `field` only when the patch carries a value for it.
pub(crate) fn merge<T>(field: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *field = v;
    }
}

/// Converts a caller-supplied count into a stored one, clamping negatives to zero.
pub(crate) fn clamp_count(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// Distinguishes an explicit `null` from an absent field: absent stays `None`
/// through `#[serde(default)]`, `null` becomes `Some(None)`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Reads a calendar day from either `2024-06-03` or a full RFC 3339 timestamp
/// such as `2024-06-03T10:00:00.000Z`. Timestamps keep their own calendar day.
pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_date(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| format!("invalid date `{raw}`, expected YYYY-MM-DD or an RFC 3339 timestamp"))
}
