use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    entities::document::{Collection, Document, FieldFilter, Fields, SortOrder},
    errors::StoreError,
};

/// Schemaless collections of JSON documents.
///
/// Ids and timestamps are assigned by the caller of `insert`/`merge`;
/// the store only persists them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn query(
        &self,
        collection: Collection,
        filter: Option<FieldFilter>,
        order: Option<SortOrder>,
    ) -> Result<Vec<Document>, StoreError>;

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError>;

    /// Creates a document and returns its generated id.
    async fn insert(
        &self,
        collection: Collection,
        fields: Fields,
        at: DateTime<Utc>,
    ) -> Result<String, StoreError>;

    /// Shallow-merges `fields` into an existing document.
    /// Returns `StoreError::Missing` when the document does not exist.
    async fn merge(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Removes a document. Deleting an absent id succeeds.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn DocumentStore>;

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }

    async fn query(
        &self,
        collection: Collection,
        filter: Option<FieldFilter>,
        order: Option<SortOrder>,
    ) -> Result<Vec<Document>, StoreError> {
        (**self).query(collection, filter, order).await
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        (**self).get(collection, id).await
    }

    async fn insert(
        &self,
        collection: Collection,
        fields: Fields,
        at: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        (**self).insert(collection, fields, at).await
    }

    async fn merge(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        (**self).merge(collection, id, fields, at).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        (**self).delete(collection, id).await
    }
}

pub fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_ids_are_unique_and_compact() {
        let first = new_document_id();
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, new_document_id());
    }
}
