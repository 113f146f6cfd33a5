use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    entities::{faq::Faq, project::Project, service::Service},
    repositories::document_store::DocumentStore,
    use_cases::{
        content::DataAccess,
        content_state::{ContentState, LoadFailure},
        editor::Editor,
    },
};

/// Editors for every content type, holding all languages at once.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminWorkspace {
    pub services: Editor<Service>,
    pub projects: Editor<Project>,
    pub faqs: Editor<Faq>,
    pub failures: Vec<LoadFailure>,
    pub loaded_at: DateTime<Utc>,
}

impl AdminWorkspace {
    pub async fn load<S: DocumentStore>(access: &DataAccess<S>) -> Self {
        AdminWorkspace::from_state(ContentState::load(access, None).await)
    }

    fn from_state(state: ContentState) -> Self {
        AdminWorkspace {
            services: Editor::new(state.services),
            projects: Editor::new(state.projects),
            faqs: Editor::new(state.faqs),
            failures: state.failures,
            loaded_at: Utc::now(),
        }
    }

    /// Re-reads every collection. Open drafts are discarded.
    pub async fn reload<S: DocumentStore>(&mut self, access: &DataAccess<S>) {
        let state = ContentState::load(access, None).await;
        self.services.replace_items(state.services);
        self.projects.replace_items(state.projects);
        self.faqs.replace_items(state.faqs);
        self.failures = state.failures;
        self.loaded_at = Utc::now();
    }
}

pub type SharedWorkspace = Arc<Mutex<AdminWorkspace>>;

/// One workspace per admin subject, created on first use.
#[derive(Default)]
pub struct Workspaces {
    inner: DashMap<String, SharedWorkspace>,
}

impl Workspaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_load<S: DocumentStore>(
        &self,
        subject: &str,
        access: &DataAccess<S>,
    ) -> SharedWorkspace {
        if let Some(existing) = self.inner.get(subject) {
            return Arc::clone(existing.value());
        }

        let loaded = Arc::new(Mutex::new(AdminWorkspace::load(access).await));
        tracing::debug!("Opened admin workspace for {}", subject);
        // A concurrent first request may have won the race; keep its copy.
        Arc::clone(self.inner.entry(subject.to_string()).or_insert(loaded).value())
    }

    pub fn get(&self, subject: &str) -> Option<SharedWorkspace> {
        self.inner.get(subject).map(|entry| Arc::clone(entry.value()))
    }

    /// Drops the workspace. Returns whether one existed.
    pub fn close(&self, subject: &str) -> bool {
        self.inner.remove(subject).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
