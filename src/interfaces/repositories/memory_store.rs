use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::{
    entities::document::{Collection, Document, FieldFilter, Fields, SortOrder},
    errors::StoreError,
    repositories::document_store::{new_document_id, DocumentStore},
};

/// Access behaviour of a [`MemoryDocumentStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreRules {
    /// When false, ordered queries fail with `OrderingUnsupported`.
    pub ordered_queries: bool,
    /// When false, every write fails with `PermissionDenied`.
    pub writable: bool,
}

impl Default for StoreRules {
    fn default() -> Self {
        StoreRules {
            ordered_queries: true,
            writable: true,
        }
    }
}

/// In-process store used for local development and tests.
/// Unordered queries return documents in insertion order.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
    rules: RwLock<StoreRules>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: StoreRules) -> Self {
        MemoryDocumentStore {
            collections: RwLock::default(),
            rules: RwLock::new(rules),
        }
    }

    pub fn set_rules(&self, rules: StoreRules) {
        *self.rules.write() = rules;
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.collections.read().get(&collection).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    fn check_writable(&self, collection: Collection) -> Result<(), StoreError> {
        if self.rules.read().writable {
            Ok(())
        } else {
            Err(StoreError::PermissionDenied(format!(
                "writes to {} are not allowed",
                collection
            )))
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn query(
        &self,
        collection: Collection,
        filter: Option<FieldFilter>,
        order: Option<SortOrder>,
    ) -> Result<Vec<Document>, StoreError> {
        if order.is_some() && !self.rules.read().ordered_queries {
            return Err(StoreError::OrderingUnsupported(format!(
                "no index for ordered query on {}",
                collection
            )));
        }

        let collections = self.collections.read();
        let mut documents: Vec<Document> = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.as_ref().is_none_or(|f| f.matches(doc)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(SortOrder::CreatedAtDesc) = order {
            // Stable sort keeps later inserts first among equal timestamps.
            documents.reverse();
            documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        Ok(documents)
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned()))
    }

    async fn insert(
        &self,
        collection: Collection,
        fields: Fields,
        at: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        self.check_writable(collection)?;

        let id = new_document_id();
        self.collections
            .write()
            .entry(collection)
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
                created_at: at,
                updated_at: at,
            });
        Ok(id)
    }

    async fn merge(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.check_writable(collection)?;

        let mut collections = self.collections.write();
        let document = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or(StoreError::Missing)?;

        document.fields.extend(fields);
        document.updated_at = at;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.check_writable(collection)?;

        if let Some(docs) = self.collections.write().get_mut(&collection) {
            docs.retain(|doc| doc.id != id);
        }
        Ok(())
    }
}
