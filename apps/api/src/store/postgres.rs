use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::debug;

use crate::models::{
    Book, Event, Habit, HomeSummary, Note, NotebookPage, Resource, Settings, Singleton,
};
use crate::store::{Document, Store, StoreError};

/// Stores each top-level document key as one JSONB row in `hub_documents`.
/// `save` upserts every key inside a single transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn load(&self) -> Result<Document, StoreError> {
        let rows: Vec<(String, Value)> = sqlx::query_as("SELECT name, data FROM hub_documents")
            .fetch_all(&self.pool)
            .await?;
        debug!("Loaded {} document keys from PostgreSQL", rows.len());
        Ok(document_from_rows(rows)?)
    }

    async fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let rows = document_to_rows(doc)?;
        let mut tx = self.pool.begin().await?;
        for (name, data) in rows {
            sqlx::query(
                r#"
                INSERT INTO hub_documents (name, data, updated_at)
                VALUES ($1, $2, now())
                ON CONFLICT (name) DO UPDATE SET data = EXCLUDED.data, updated_at = now()
                "#,
            )
            .bind(name)
            .bind(data)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    fn describe(&self) -> String {
        "postgres table hub_documents".to_string()
    }
}

fn document_from_rows(rows: Vec<(String, Value)>) -> Result<Document, serde_json::Error> {
    let map: Map<String, Value> = rows.into_iter().collect();
    serde_json::from_value(Value::Object(map))
}

fn document_to_rows(doc: &Document) -> Result<Vec<(String, Value)>, serde_json::Error> {
    Ok(vec![
        (Note::COLLECTION.to_string(), serde_json::to_value(&doc.notes)?),
        (Habit::COLLECTION.to_string(), serde_json::to_value(&doc.habits)?),
        (Event::COLLECTION.to_string(), serde_json::to_value(&doc.events)?),
        (NotebookPage::COLLECTION.to_string(), serde_json::to_value(&doc.pages)?),
        (Book::COLLECTION.to_string(), serde_json::to_value(&doc.books)?),
        (Settings::KEY.to_string(), serde_json::to_value(&doc.settings)?),
        (HomeSummary::KEY.to_string(), serde_json::to_value(&doc.home)?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_cover_every_document_key() {
        let rows = document_to_rows(&Document::default()).unwrap();
        let mut names: Vec<_> = rows.iter().map(|(n, _)| n.as_str()).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["books", "events", "habits", "home", "notes", "pages", "settings"]
        );
    }

    #[test]
    fn test_missing_rows_load_as_defaults() {
        let doc = document_from_rows(vec![(
            "home".to_string(),
            json!({"pendingTasks": 4, "habitsToday": 1, "appointments": 0}),
        )])
        .unwrap();
        assert_eq!(doc.home.pending_tasks, 4);
        assert!(doc.notes.is_empty());
        assert_ne!(doc.home, HomeSummary::default());
    }

    #[test]
    fn test_row_names_match_document_keys() {
        let rows = document_to_rows(&Document::default()).unwrap();
        let Value::Object(map) = serde_json::to_value(Document::default()).unwrap() else {
            panic!("document should serialize as an object");
        };
        for (name, data) in rows {
            assert_eq!(map.get(&name), Some(&data), "row {name}");
        }
    }

    #[test]
    fn test_rows_roundtrip_through_document() {
        let mut doc = Document::default();
        doc.home.appointments = 2;
        let rows = document_to_rows(&doc).unwrap();
        assert_eq!(document_from_rows(rows).unwrap(), doc);
    }
}
