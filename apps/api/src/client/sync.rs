use tracing::debug;

use crate::client::{ApiClient, ClientError};
use crate::models::{Book, ReadingStatus, Resource};

/// Local filter over an already-fetched collection. Empty fields match
/// everything; text matching is case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub text: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl ListFilter {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn matches<R: Resource>(&self, record: &R) -> bool {
        let text_ok = match non_blank(&self.text) {
            None => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                record
                    .search_text()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        };
        let category_ok = match non_blank(&self.category) {
            None => true,
            Some(cat) => record
                .category()
                .is_some_and(|c| c.eq_ignore_ascii_case(cat)),
        };
        let tag_ok = match non_blank(&self.tag) {
            None => true,
            Some(tag) => record.tags().iter().any(|t| t.eq_ignore_ascii_case(tag)),
        };
        text_ok && category_ok && tag_ok
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// An in-memory copy of one collection kept in step with the server.
///
/// Local state changes only after the server answers, using the record the
/// server returned. A failed call leaves the list exactly as it was.
pub struct SyncedList<R: Resource> {
    client: ApiClient,
    items: Vec<R>,
}

impl<R: Resource> SyncedList<R> {
    /// Fetches the full collection once.
    pub async fn load(client: ApiClient) -> Result<Self, ClientError> {
        let items = client.list::<R>().await?;
        debug!("Loaded {} {}", items.len(), R::COLLECTION);
        Ok(Self { client, items })
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub async fn create(&mut self, patch: R::Patch) -> Result<&R, ClientError> {
        let record = self.client.create::<R>(&patch).await?;
        self.items.push(record);
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    pub async fn update(&mut self, id: &str, patch: R::Patch) -> Result<&R, ClientError> {
        let record = self.client.update::<R>(id, &patch).await?;
        match self.items.iter().position(|r| r.id() == id) {
            Some(index) => {
                self.items[index] = record;
                Ok(&self.items[index])
            }
            // Created elsewhere after our load.
            None => {
                self.items.push(record);
                let last = self.items.len() - 1;
                Ok(&self.items[last])
            }
        }
    }

    pub async fn remove(&mut self, id: &str) -> Result<R, ClientError> {
        let removed = self.client.delete::<R>(id).await?;
        self.items.retain(|r| r.id() != id);
        Ok(removed)
    }

    pub fn filter(&self, filter: &ListFilter) -> Vec<&R> {
        self.items.iter().filter(|r| filter.matches(*r)).collect()
    }
}

impl SyncedList<Book> {
    pub fn with_status(&self, status: ReadingStatus) -> Vec<&Book> {
        self.items.iter().filter(|b| b.status == status).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookPatch, Note, NotePatch, NotebookPage, NotebookPagePatch};
    use crate::routes::{build_router, tests::test_state};
    use tempfile::TempDir;

    async fn spawn_server() -> (ApiClient, TempDir) {
        let (state, dir) = test_state().await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        (ApiClient::new(format!("http://{addr}")).unwrap(), dir)
    }

    fn note(title: &str, category: &str) -> NotePatch {
        NotePatch {
            title: Some(title.into()),
            content: Some(format!("{title} body")),
            category: Some(category.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_appends_server_record() {
        let (client, _dir) = spawn_server().await;
        let mut notes = SyncedList::<Note>::load(client.clone()).await.unwrap();
        assert!(notes.items().is_empty());

        let id = notes.create(note("Shopping", "home")).await.unwrap().id.clone();
        assert_eq!(notes.items().len(), 1);

        let server_copy: Note = client.get(&id).await.unwrap();
        assert_eq!(notes.find(&id), Some(&server_copy));
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let (client, _dir) = spawn_server().await;
        let mut notes = SyncedList::<Note>::load(client).await.unwrap();
        let first = notes.create(note("a", "x")).await.unwrap().id.clone();
        notes.create(note("b", "x")).await.unwrap();

        notes
            .update(
                &first,
                NotePatch {
                    title: Some("renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(notes.items().len(), 2);
        assert_eq!(notes.items()[0].title, "renamed");
        assert_eq!(notes.items()[0].category, "x");
    }

    #[tokio::test]
    async fn test_remove_filters_out_record() {
        let (client, _dir) = spawn_server().await;
        let mut notes = SyncedList::<Note>::load(client.clone()).await.unwrap();
        let id = notes.create(note("a", "x")).await.unwrap().id.clone();

        let removed = notes.remove(&id).await.unwrap();
        assert_eq!(removed.id, id);
        assert!(notes.items().is_empty());
        assert!(client.list::<Note>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_leaves_state_untouched() {
        let (client, _dir) = spawn_server().await;
        let mut notes = SyncedList::<Note>::load(client).await.unwrap();
        notes.create(note("a", "x")).await.unwrap();
        let before = notes.items().to_vec();

        let result = notes.update("missing", NotePatch::default()).await;
        assert!(matches!(result, Err(ClientError::NotFound(ref m)) if m == "Note not found"));
        assert_eq!(notes.items(), before.as_slice());
    }

    #[tokio::test]
    async fn test_local_filtering() {
        let (client, _dir) = spawn_server().await;
        let mut pages = SyncedList::<NotebookPage>::load(client.clone()).await.unwrap();
        pages
            .create(NotebookPagePatch {
                title: Some("Trip plan".into()),
                category: Some("Travel".into()),
                tags: Some(vec!["summer".into()]),
                ..Default::default()
            })
            .await
            .unwrap();
        pages
            .create(NotebookPagePatch {
                title: Some("Recipes".into()),
                category: Some("Food".into()),
                tags: Some(vec!["dinner".into()]),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(pages.filter(&ListFilter::default()).len(), 2);
        assert_eq!(pages.filter(&ListFilter::text("TRIP")).len(), 1);
        let by_tag = pages.filter(&ListFilter {
            tag: Some("dinner".into()),
            ..Default::default()
        });
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].title, "Recipes");
        let none = pages.filter(&ListFilter {
            category: Some("travel".into()),
            tag: Some("dinner".into()),
            ..Default::default()
        });
        assert!(none.is_empty());

        let mut books = SyncedList::<Book>::load(client).await.unwrap();
        books
            .create(BookPatch {
                title: Some("Dune".into()),
                status: Some(ReadingStatus::Reading),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(books.with_status(ReadingStatus::Reading).len(), 1);
        assert!(books.with_status(ReadingStatus::Completed).is_empty());
    }
}
