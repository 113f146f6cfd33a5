use std::marker::PhantomData;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use crate::{
    entities::{
        content::ContentEntity,
        document::{writable_fields, Collection, Document, FieldFilter, SortOrder},
        faq::Faq,
        language::Language,
        project::Project,
        service::Service,
        session::Session,
        translation::Translation,
    },
    errors::{DataError, Operation, StoreError},
    repositories::document_store::DocumentStore,
};

/// Uniform CRUD over the document store.
///
/// Reads are public. Every write requires an authenticated [`Session`] and
/// is rejected before the store is touched when there is none.
pub struct DataAccess<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> DataAccess<S> {
    pub fn new(store: S) -> Self {
        DataAccess { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All documents of `collection`, newest first.
    ///
    /// With a language only documents in that language are returned. When
    /// the store cannot order the query it is retried unordered with the
    /// same filter.
    #[tracing::instrument(skip(self))]
    pub async fn get_all<T: DeserializeOwned>(
        &self,
        collection: Collection,
        language: Option<Language>,
    ) -> Result<Vec<T>, DataError> {
        tracing::debug!("Fetching {}", collection);
        let filter = language.map(FieldFilter::language);

        let documents = match self
            .store
            .query(collection, filter.clone(), Some(SortOrder::CreatedAtDesc))
            .await
        {
            Ok(documents) => documents,
            Err(StoreError::OrderingUnsupported(reason)) => {
                tracing::info!("Ordered query failed for {}, trying unordered: {}", collection, reason);
                self.store
                    .query(collection, filter, None)
                    .await
                    .map_err(|e| self.failure(collection, Operation::Fetch, e))?
            }
            Err(e) => return Err(self.failure(collection, Operation::Fetch, e)),
        };

        let results = decode_all(collection, documents)?;
        tracing::debug!("Fetched {} {}", results.len(), collection);
        Ok(results)
    }

    /// A missing document is `Ok(None)`, not an error.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<T>, DataError> {
        let document = self
            .store
            .get(collection, id)
            .await
            .map_err(|e| self.failure(collection, Operation::Fetch, e))?;

        document
            .map(|doc| doc.decode().map_err(|e| DataError::malformed(collection, Operation::Fetch, e)))
            .transpose()
    }

    /// Stores `data` with fresh timestamps and returns the generated id.
    #[tracing::instrument(skip(self, session, data))]
    pub async fn add<P: Serialize>(
        &self,
        session: &Session,
        collection: Collection,
        data: &P,
    ) -> Result<String, DataError> {
        self.require_session(session, collection, Operation::Add)?;
        let fields = writable_fields(data)
            .map_err(|e| DataError::malformed(collection, Operation::Add, e))?;

        let id = self
            .store
            .insert(collection, fields, Utc::now())
            .await
            .map_err(|e| self.failure(collection, Operation::Add, e))?;

        tracing::info!("Added {} with ID: {}", collection, id);
        Ok(id)
    }

    /// Merges the set fields of `patch` into the document and re-stamps
    /// `updatedAt`. The updated document is not returned.
    #[tracing::instrument(skip(self, session, patch))]
    pub async fn update<P: Serialize>(
        &self,
        session: &Session,
        collection: Collection,
        id: &str,
        patch: &P,
    ) -> Result<(), DataError> {
        self.require_session(session, collection, Operation::Update)?;
        let fields = writable_fields(patch)
            .map_err(|e| DataError::malformed(collection, Operation::Update, e))?;

        match self.store.merge(collection, id, fields, Utc::now()).await {
            Ok(()) => {
                tracing::info!("Updated {} {}", collection, id);
                Ok(())
            }
            Err(StoreError::Missing) => Err(DataError::NotFound {
                collection,
                id: id.to_string(),
            }),
            Err(e) => Err(self.failure(collection, Operation::Update, e)),
        }
    }

    /// Removing an id that is already gone succeeds.
    #[tracing::instrument(skip(self, session))]
    pub async fn delete(
        &self,
        session: &Session,
        collection: Collection,
        id: &str,
    ) -> Result<(), DataError> {
        self.require_session(session, collection, Operation::Delete)?;

        self.store
            .delete(collection, id)
            .await
            .map_err(|e| self.failure(collection, Operation::Delete, e))?;

        tracing::info!("Deleted {} {}", collection, id);
        Ok(())
    }

    pub fn entity<E: ContentEntity>(&self) -> EntityApi<'_, S, E> {
        EntityApi {
            access: self,
            _entity: PhantomData,
        }
    }

    pub fn services(&self) -> EntityApi<'_, S, Service> {
        self.entity()
    }

    pub fn projects(&self) -> EntityApi<'_, S, Project> {
        self.entity()
    }

    pub fn faqs(&self) -> EntityApi<'_, S, Faq> {
        self.entity()
    }

    pub fn translations(&self) -> EntityApi<'_, S, Translation> {
        self.entity()
    }

    fn require_session(
        &self,
        session: &Session,
        collection: Collection,
        operation: Operation,
    ) -> Result<(), DataError> {
        if session.is_authenticated() {
            return Ok(());
        }
        tracing::warn!("Rejected {} on {}: no session", operation.verb(), collection);
        Err(DataError::unauthenticated(collection, operation))
    }

    fn failure(&self, collection: Collection, operation: Operation, err: StoreError) -> DataError {
        let err = DataError::from_store(collection, operation, err);
        if err.is_permission_denied() {
            tracing::warn!("{}", err);
        } else {
            tracing::error!("{}", err);
        }
        err
    }
}

fn decode_all<T: DeserializeOwned>(
    collection: Collection,
    documents: Vec<Document>,
) -> Result<Vec<T>, DataError> {
    documents
        .into_iter()
        .map(|doc| doc.decode().map_err(|e| DataError::malformed(collection, Operation::Fetch, e)))
        .collect()
}

/// Typed operations bound to the collection of one entity.
pub struct EntityApi<'a, S: DocumentStore, E: ContentEntity> {
    access: &'a DataAccess<S>,
    _entity: PhantomData<E>,
}

impl<S: DocumentStore, E: ContentEntity> EntityApi<'_, S, E> {
    pub async fn get_all(&self, language: Option<Language>) -> Result<Vec<E>, DataError> {
        self.access.get_all(E::COLLECTION, language).await
    }

    /// Every locale, for the admin workspace.
    pub async fn get_all_languages(&self) -> Result<Vec<E>, DataError> {
        self.access.get_all(E::COLLECTION, None).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<E>, DataError> {
        self.access.get_by_id(E::COLLECTION, id).await
    }

    pub async fn add(&self, session: &Session, draft: &E::New) -> Result<String, DataError> {
        draft.validate().map_err(|errors| DataError::Invalid {
            collection: E::COLLECTION,
            errors,
        })?;
        self.access.add(session, E::COLLECTION, draft).await
    }

    pub async fn update(&self, session: &Session, id: &str, patch: &E::Patch) -> Result<(), DataError> {
        patch.validate().map_err(|errors| DataError::Invalid {
            collection: E::COLLECTION,
            errors,
        })?;
        self.access.update(session, E::COLLECTION, id, patch).await
    }

    pub async fn delete(&self, session: &Session, id: &str) -> Result<(), DataError> {
        self.access.delete(session, E::COLLECTION, id).await
    }
}

impl<S: DocumentStore> EntityApi<'_, S, Translation> {
    pub async fn get_by_language(&self, language: Language) -> Result<Vec<Translation>, DataError> {
        self.get_all(Some(language)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::{
            document::Fields,
            service::{NewService, UpdateServiceRequest},
            token::{Claims, TokenType},
        },
        repositories::memory_store::MemoryDocumentStore,
    };
    use async_trait::async_trait;
    use chrono::DateTime;
    use mockall::mock;
    use serde_json::json;

    mock! {
        pub Store {}

        #[async_trait]
        impl DocumentStore for Store {
            async fn ping(&self) -> Result<(), StoreError>;
            async fn query(
                &self,
                collection: Collection,
                filter: Option<FieldFilter>,
                order: Option<SortOrder>,
            ) -> Result<Vec<Document>, StoreError>;
            async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError>;
            async fn insert(
                &self,
                collection: Collection,
                fields: Fields,
                at: DateTime<Utc>,
            ) -> Result<String, StoreError>;
            async fn merge(
                &self,
                collection: Collection,
                id: &str,
                fields: Fields,
                at: DateTime<Utc>,
            ) -> Result<(), StoreError>;
            async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
        }
    }

    fn admin_session() -> Session {
        Session::authenticated(Claims {
            sub: "admin-1".into(),
            email: "admin@voltage.si".into(),
            admin: true,
            token_type: TokenType::Access,
            exp: usize::MAX,
            iat: 0,
        })
    }

    fn service_draft(language: Language, title: &str, price: &str) -> NewService {
        NewService {
            title: title.into(),
            description: "Zamenjava in montaža vtičnic".into(),
            price: price.into(),
            materials: vec!["Vtičnice (Legrand)".into()],
            ..Service::blank_draft(language)
        }
    }

    fn service_document(id: &str, language: &str) -> Document {
        let mut fields = Fields::new();
        fields.insert("language".into(), json!(language));
        fields.insert("title".into(), json!("Montaža svetil"));
        Document {
            id: id.into(),
            fields,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[actix_rt::test]
    async fn writes_without_session_never_reach_the_store() {
        let mut store = MockStore::new();
        store.expect_insert().times(0);
        store.expect_merge().times(0);
        store.expect_delete().times(0);
        let access = DataAccess::new(store);
        let anonymous = Session::anonymous();

        let add = access
            .services()
            .add(&anonymous, &service_draft(Language::Sl, "Montaža vtičnic", "35€/vtičnica"))
            .await;
        let update = access
            .services()
            .update(&anonymous, "S1", &UpdateServiceRequest::default())
            .await;
        let delete = access.services().delete(&anonymous, "S1").await;

        for result in [add.map(|_| ()), update, delete] {
            let err = result.unwrap_err();
            assert!(err.is_permission_denied());
            assert!(err.to_string().contains("User not authenticated"));
        }
    }

    #[actix_rt::test]
    async fn unsupported_ordering_falls_back_to_unordered_filtered_query() {
        let mut store = MockStore::new();
        store
            .expect_query()
            .withf(|_, _, order| order.is_some())
            .times(1)
            .returning(|_, _, _| Err(StoreError::OrderingUnsupported("missing index".into())));
        store
            .expect_query()
            .withf(|collection, filter, order| {
                *collection == Collection::Services
                    && *filter == Some(FieldFilter::language(Language::En))
                    && order.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![service_document("S9", "en")]));
        let access = DataAccess::new(store);

        let services = access.services().get_all(Some(Language::En)).await.unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].id, "S9");
    }

    #[actix_rt::test]
    async fn store_permission_failure_is_distinct_from_operation_failure() {
        let mut store = MockStore::new();
        store
            .expect_query()
            .returning(|_, _, _| Err(StoreError::PermissionDenied("rules".into())));
        store
            .expect_get()
            .returning(|_, _| Err(StoreError::Backend("network unreachable".into())));
        let access = DataAccess::new(store);

        let denied = access.faqs().get_all(None).await.unwrap_err();
        assert!(matches!(denied, DataError::PermissionDenied { collection: Collection::Faqs, .. }));

        let failed = access.faqs().get_by_id("F1").await.unwrap_err();
        match failed {
            DataError::OperationFailed { collection, operation, message } => {
                assert_eq!(collection, Collection::Faqs);
                assert_eq!(operation, Operation::Fetch);
                assert!(message.contains("network unreachable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[actix_rt::test]
    async fn update_of_missing_document_is_not_found() {
        let mut store = MockStore::new();
        store.expect_merge().returning(|_, _, _, _| Err(StoreError::Missing));
        let access = DataAccess::new(store);

        let patch = UpdateServiceRequest {
            price: Some("40€/vtičnica".into()),
            ..Default::default()
        };
        let err = access.services().update(&admin_session(), "gone", &patch).await.unwrap_err();
        assert!(matches!(err, DataError::NotFound { .. }));
    }

    #[actix_rt::test]
    async fn invalid_draft_is_rejected_before_dispatch() {
        let mut store = MockStore::new();
        store.expect_insert().times(0);
        let access = DataAccess::new(store);

        let err = access
            .services()
            .add(&admin_session(), &Service::blank_draft(Language::Sl))
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Invalid { .. }));
    }

    #[actix_rt::test]
    async fn add_then_get_returns_input_with_server_fields() {
        let access = DataAccess::new(MemoryDocumentStore::new());
        let draft = service_draft(Language::Sl, "Montaža vtičnic", "35€/vtičnica");

        let id = access.services().add(&admin_session(), &draft).await.unwrap();
        let stored = access.services().get_by_id(&id).await.unwrap().unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.to_draft(), draft);
        assert!(stored.created_at.is_some());
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[actix_rt::test]
    async fn update_changes_only_patched_fields_and_advances_updated_at() {
        let access = DataAccess::new(MemoryDocumentStore::new());
        let session = admin_session();
        let id = access
            .services()
            .add(&session, &service_draft(Language::Sl, "Montaža vtičnic", "35€/vtičnica"))
            .await
            .unwrap();
        let before = access.services().get_by_id(&id).await.unwrap().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let patch = UpdateServiceRequest {
            price: Some("40€/vtičnica".into()),
            ..Default::default()
        };
        access.services().update(&session, &id, &patch).await.unwrap();
        let after = access.services().get_by_id(&id).await.unwrap().unwrap();

        assert_eq!(after.price, "40€/vtičnica");
        assert_eq!(after.title, before.title);
        assert_eq!(after.materials, before.materials);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
    }

    #[actix_rt::test]
    async fn translations_are_fetched_per_language() {
        let access = DataAccess::new(MemoryDocumentStore::new());
        let session = admin_session();
        for (language, value) in [(Language::Sl, "Storitve"), (Language::En, "Services")] {
            access
                .translations()
                .add(
                    &session,
                    &crate::entities::translation::NewTranslation {
                        language,
                        key: "navigation.services".into(),
                        value: value.into(),
                        context: None,
                    },
                )
                .await
                .unwrap();
        }

        let english = access.translations().get_by_language(Language::En).await.unwrap();
        assert_eq!(english.len(), 1);
        assert_eq!(english[0].value, "Services");
        assert_eq!(access.translations().get_all_languages().await.unwrap().len(), 2);
    }
}
