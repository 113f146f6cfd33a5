use serde::Serialize;

use crate::{
    domain::localization::Localizer,
    entities::{
        document::Collection,
        faq::Faq,
        language::Language,
        project::Project,
        service::Service,
    },
    errors::DataError,
    repositories::document_store::DocumentStore,
    use_cases::content::DataAccess,
};

/// Category value that disables the project filter.
pub const ALL_CATEGORIES: &str = "all";

const KNOWN_CATEGORIES: [&str; 3] = ["nove-instalacije", "pametni-sistemi", "varnostni-sistemi"];

/// A content load that failed, reported next to the (empty) result.
#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    pub collection: Collection,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
}

/// Services, projects and FAQs as loaded for one view.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentState {
    pub services: Vec<Service>,
    pub projects: Vec<Project>,
    pub faqs: Vec<Faq>,
    pub failures: Vec<LoadFailure>,
}

impl ContentState {
    /// Loads services, then projects, then FAQs, one query at a time.
    ///
    /// Each load stands alone: a failed one leaves its list empty and is
    /// recorded in `failures` while the others still populate. `None`
    /// loads every language.
    pub async fn load<S: DocumentStore>(access: &DataAccess<S>, language: Option<Language>) -> Self {
        let mut state = ContentState::default();

        match access.services().get_all(language).await {
            Ok(services) => state.services = services,
            Err(e) => state.record(Collection::Services, e),
        }
        match access.projects().get_all(language).await {
            Ok(projects) => state.projects = projects,
            Err(e) => state.record(Collection::Projects, e),
        }
        match access.faqs().get_all(language).await {
            Ok(faqs) => state.faqs = faqs,
            Err(e) => state.record(Collection::Faqs, e),
        }

        state
    }

    fn record(&mut self, collection: Collection, err: DataError) {
        tracing::warn!("Loading {} failed, continuing without it: {}", collection, err);
        self.failures.push(LoadFailure {
            collection,
            message: err.to_string(),
        });
    }

    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn failed(&self, collection: Collection) -> bool {
        self.failures.iter().any(|f| f.collection == collection)
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn projects_in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Project> + 'a {
        self.projects
            .iter()
            .filter(move |p| category == ALL_CATEGORIES || p.category == category)
    }

    /// Display name of a project category: well-known slugs first, then the
    /// title of the service with that id, else the "all projects" label.
    pub fn category_name(&self, category: &str, strings: &Localizer) -> String {
        if category != ALL_CATEGORIES && KNOWN_CATEGORIES.contains(&category) {
            return strings.t(&format!("portfolio.categories.{}", category));
        }
        match self.service(category) {
            Some(service) if category != ALL_CATEGORIES => service.title.clone(),
            _ => strings.t("portfolio.allProjects"),
        }
    }

    /// Filter options: "all" followed by one entry per loaded service.
    pub fn categories(&self, strings: &Localizer) -> Vec<CategoryOption> {
        std::iter::once(CategoryOption {
            id: ALL_CATEGORIES.to_string(),
            name: strings.t("portfolio.allProjects"),
        })
        .chain(self.services.iter().map(|s| CategoryOption {
            id: s.id.clone(),
            name: s.title.clone(),
        }))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use crate::{
        entities::{
            content::ContentEntity,
            document::{Document, FieldFilter, Fields, SortOrder},
            session::Session,
            token::{Claims, TokenType},
        },
        errors::StoreError,
        repositories::{
            document_store::DocumentStore,
            memory_store::{MemoryDocumentStore, StoreRules},
        },
    };

    /// Memory store whose queries take a while and count how many overlap.
    #[derive(Default)]
    struct SlowStore {
        inner: MemoryDocumentStore,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl DocumentStore for SlowStore {
        async fn ping(&self) -> Result<(), StoreError> {
            self.inner.ping().await
        }

        async fn query(
            &self,
            collection: Collection,
            filter: Option<FieldFilter>,
            order: Option<SortOrder>,
        ) -> Result<Vec<Document>, StoreError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            let result = self.inner.query(collection, filter, order).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }

        async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
            self.inner.get(collection, id).await
        }

        async fn insert(&self, collection: Collection, fields: Fields, at: DateTime<Utc>) -> Result<String, StoreError> {
            self.inner.insert(collection, fields, at).await
        }

        async fn merge(&self, collection: Collection, id: &str, fields: Fields, at: DateTime<Utc>) -> Result<(), StoreError> {
            self.inner.merge(collection, id, fields, at).await
        }

        async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
            self.inner.delete(collection, id).await
        }
    }

    fn session() -> Session {
        Session::authenticated(Claims {
            sub: "admin".into(),
            email: "admin@voltage.si".into(),
            admin: true,
            token_type: TokenType::Access,
            exp: usize::MAX,
            iat: 0,
        })
    }

    fn service(id: &str, title: &str) -> Service {
        let mut draft = Service::blank_draft(Language::Sl);
        draft.title = title.into();
        Service::from_draft(id.into(), draft, None, None)
    }

    fn project(id: &str, category: &str) -> Project {
        let mut draft = Project::blank_draft(Language::Sl);
        draft.title = format!("Projekt {}", id);
        draft.category = category.into();
        Project::from_draft(id.into(), draft, None, None)
    }

    #[test]
    fn category_names_follow_known_slugs_then_services() {
        let state = ContentState {
            services: vec![service("svc-1", "Montaža svetil")],
            ..Default::default()
        };
        let sl = Localizer::new(Language::Sl);

        assert_eq!(state.category_name("pametni-sistemi", &sl), "Pametni sistemi");
        assert_eq!(state.category_name("svc-1", &sl), "Montaža svetil");
        assert_eq!(state.category_name("unknown", &sl), "Vsa dela");
        assert_eq!(state.category_name(ALL_CATEGORIES, &sl), "Vsa dela");
    }

    #[test]
    fn all_category_disables_the_filter() {
        let state = ContentState {
            projects: vec![project("p1", "nove-instalacije"), project("p2", "svc-1")],
            ..Default::default()
        };

        assert_eq!(state.projects_in_category(ALL_CATEGORIES).count(), 2);
        let filtered: Vec<_> = state.projects_in_category("svc-1").map(|p| p.id.as_str()).collect();
        assert_eq!(filtered, vec!["p2"]);
    }

    #[actix_rt::test]
    async fn failed_load_is_reported_without_blocking_the_others() {
        let store = MemoryDocumentStore::new();
        // a services document without the required fields cannot be decoded
        store
            .insert(Collection::Services, Default::default(), chrono::Utc::now())
            .await
            .unwrap();
        let access = DataAccess::new(store);
        let mut faq = Faq::blank_draft(Language::Sl);
        faq.question = "Ali nudite garancijo?".into();
        faq.answer = "Da, do 5 let.".into();
        access.faqs().add(&session(), &faq).await.unwrap();

        let state = ContentState::load(&access, None).await;
        assert!(state.is_degraded());
        assert_eq!(state.failures.len(), 1);
        assert_eq!(state.failures[0].collection, Collection::Services);
        assert!(state.services.is_empty());
        assert_eq!(state.faqs.len(), 1);
    }

    #[actix_rt::test]
    async fn empty_collections_are_not_failures() {
        let store = MemoryDocumentStore::with_rules(StoreRules {
            ordered_queries: false,
            writable: true,
        });
        let access = DataAccess::new(store);

        let state = ContentState::load(&access, Some(Language::En)).await;
        assert!(state.failures.is_empty());
        assert!(state.projects.is_empty());
    }

    #[actix_rt::test]
    async fn collections_are_loaded_one_at_a_time() {
        let access = DataAccess::new(SlowStore::default());

        ContentState::load(&access, Some(Language::Sl)).await;

        assert_eq!(access.store().peak.load(Ordering::SeqCst), 1);
        assert_eq!(access.store().in_flight.load(Ordering::SeqCst), 0);
    }
}
