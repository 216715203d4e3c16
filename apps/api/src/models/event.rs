use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::IgnoredAny, Deserialize, Serialize};

use crate::models::{deserialize_date, merge, Resource};
use crate::store::Document;

/// A calendar entry. `time` is free text such as `14:00`; an empty string
/// means all day. Stored events may lack a date and still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: Option<NaiveDate>,
    pub time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Server-managed; accepted so a fetched record can be sent back whole, then dropped.
    #[serde(default, skip_serializing)]
    pub id: Option<IgnoredAny>,
}

impl Event {
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date == Some(date)
    }
}

impl Resource for Event {
    const COLLECTION: &'static str = "events";
    const LABEL: &'static str = "Event";

    type Patch = EventPatch;

    fn id(&self) -> &str {
        &self.id
    }

    /// Events created without a date land on the current UTC day.
    fn create(id: String, patch: EventPatch, now: DateTime<Utc>) -> Self {
        let mut event = Event {
            id,
            date: Some(now.date_naive()),
            ..Default::default()
        };
        event.apply(patch, now);
        event
    }

    fn apply(&mut self, patch: EventPatch, _now: DateTime<Utc>) {
        merge(&mut self.title, patch.title);
        merge(&mut self.description, patch.description);
        merge(&mut self.date, patch.date.map(Some));
        merge(&mut self.time, patch.time.map(|t| t.trim().to_string()));
    }

    fn collection(doc: &Document) -> &Vec<Self> {
        &doc.events
    }

    fn collection_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.events
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}
