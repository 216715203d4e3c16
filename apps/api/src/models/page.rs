use chrono::{DateTime, Utc};
use serde::{de::IgnoredAny, Deserialize, Serialize};

use crate::models::{merge, Resource};
use crate::store::Document;

/// A freeform notebook page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotebookPage {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NotebookPagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Server-managed; accepted so a fetched record can be sent back whole, then dropped.
    #[serde(default, skip_serializing)]
    pub id: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<IgnoredAny>,
}

impl Resource for NotebookPage {
    const COLLECTION: &'static str = "pages";
    const LABEL: &'static str = "Page";

    type Patch = NotebookPagePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, patch: NotebookPagePatch, now: DateTime<Utc>) -> Self {
        let mut page = NotebookPage {
            id,
            created_at: now,
            updated_at: now,
            ..Default::default()
        };
        page.apply(patch, now);
        page
    }

    fn apply(&mut self, patch: NotebookPagePatch, now: DateTime<Utc>) {
        let before = self.clone();
        merge(&mut self.title, patch.title);
        merge(&mut self.content, patch.content);
        merge(&mut self.category, patch.category);
        merge(&mut self.tags, patch.tags.map(normalize_tags));
        if *self != before {
            self.updated_at = now;
        }
    }

    fn collection(doc: &Document) -> &Vec<Self> {
        &doc.pages
    }

    fn collection_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.pages
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.content.as_str()]
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Trims tags and drops blanks and repeats, keeping first-seen order.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_normalized() {
        let page = NotebookPage::create(
            "1".into(),
            NotebookPagePatch {
                tags: Some(vec![" work ".into(), "".into(), "work".into(), "ideas".into()]),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(page.tags, vec!["work".to_string(), "ideas".to_string()]);
    }

    #[test]
    fn test_patch_without_tags_keeps_them() {
        let mut page = NotebookPage::create(
            "1".into(),
            NotebookPagePatch {
                tags: Some(vec!["a".into()]),
                ..Default::default()
            },
            Utc::now(),
        );
        page.apply(
            NotebookPagePatch {
                title: Some("Renamed".into()),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(page.tags, vec!["a".to_string()]);
        assert_eq!(page.title, "Renamed");
    }
}
