use chrono::{DateTime, Utc};
use serde::{de::IgnoredAny, Deserialize, Serialize};

use crate::models::{merge, Resource};
use crate::store::Document;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Server-managed; accepted so a fetched record can be sent back whole, then dropped.
    #[serde(default, skip_serializing)]
    pub id: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<IgnoredAny>,
}

impl Resource for Note {
    const COLLECTION: &'static str = "notes";
    const LABEL: &'static str = "Note";

    type Patch = NotePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, patch: NotePatch, now: DateTime<Utc>) -> Self {
        let mut note = Note {
            id,
            created_at: now,
            updated_at: now,
            ..Default::default()
        };
        note.apply(patch, now);
        note
    }

    /// `updatedAt` moves only when the patch actually changes something.
    fn apply(&mut self, patch: NotePatch, now: DateTime<Utc>) {
        let before = self.clone();
        merge(&mut self.title, patch.title);
        merge(&mut self.content, patch.content);
        merge(&mut self.category, patch.category);
        if *self != before {
            self.updated_at = now;
        }
    }

    fn collection(doc: &Document) -> &Vec<Self> {
        &doc.notes
    }

    fn collection_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.notes
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.content.as_str()]
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }
}
