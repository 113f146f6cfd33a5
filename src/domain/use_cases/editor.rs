use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    domain::localization::Localizer,
    entities::{
        content::{split_list, ContentEntity, DraftLists},
        faq::Faq,
        language::Language,
        project::Project,
        service::Service,
        session::Session,
    },
    errors::{DataError, EditorError},
    repositories::document_store::DocumentStore,
    use_cases::{content::DataAccess, workspace::AdminWorkspace},
};

/// An entity type the admin panel can edit.
pub trait Editable: ContentEntity {
    /// Prefix of the entity's admin strings, e.g. `admin.services`.
    const I18N_SCOPE: &'static str;

    fn editor_mut(workspace: &mut AdminWorkspace) -> &mut Editor<Self>;
}

impl Editable for Service {
    const I18N_SCOPE: &'static str = "admin.services";

    fn editor_mut(workspace: &mut AdminWorkspace) -> &mut Editor<Self> {
        &mut workspace.services
    }
}

impl Editable for Project {
    const I18N_SCOPE: &'static str = "admin.projects";

    fn editor_mut(workspace: &mut AdminWorkspace) -> &mut Editor<Self> {
        &mut workspace.projects
    }
}

impl Editable for Faq {
    const I18N_SCOPE: &'static str = "admin.faqs";

    fn editor_mut(workspace: &mut AdminWorkspace) -> &mut Editor<Self> {
        &mut workspace.faqs
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum EditorState<D> {
    Idle,
    Adding {
        draft: D,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Editing {
        id: String,
        draft: D,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    ConfirmingDelete {
        id: String,
    },
}

impl<D> EditorState<D> {
    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn draft(&self) -> Option<&D> {
        match self {
            EditorState::Adding { draft, .. } | EditorState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Message of the last failed commit of the open draft.
    pub fn error(&self) -> Option<&str> {
        match self {
            EditorState::Adding { error, .. } | EditorState::Editing { error, .. } => error.as_deref(),
            _ => None,
        }
    }
}

/// One row edit on a list field of the open draft.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEdit {
    pub field: String,
    #[serde(flatten)]
    pub op: ListOp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ListOp {
    Push { value: String },
    Insert { index: usize, value: String },
    Replace { index: usize, value: String },
    Remove { index: usize },
    Move { from: usize, to: usize },
    /// Replaces the whole list with delimiter-split text. Lossy for items
    /// that contain the delimiter.
    Paste {
        text: String,
        #[serde(default = "default_delimiter")]
        delimiter: char,
    },
}

fn default_delimiter() -> char {
    '\n'
}

impl ListOp {
    fn apply(self, field: &str, list: &mut Vec<String>) -> Result<(), EditorError> {
        let out_of_range = |index| EditorError::IndexOutOfRange {
            field: field.to_string(),
            index,
        };
        match self {
            ListOp::Push { value } => list.push(value),
            ListOp::Insert { index, value } => {
                if index > list.len() {
                    return Err(out_of_range(index));
                }
                list.insert(index, value);
            }
            ListOp::Replace { index, value } => {
                let slot = list.get_mut(index).ok_or_else(|| out_of_range(index))?;
                *slot = value;
            }
            ListOp::Remove { index } => {
                if index >= list.len() {
                    return Err(out_of_range(index));
                }
                list.remove(index);
            }
            ListOp::Move { from, to } => {
                if from >= list.len() {
                    return Err(out_of_range(from));
                }
                if to >= list.len() {
                    return Err(out_of_range(to));
                }
                let item = list.remove(from);
                list.insert(to, item);
            }
            ListOp::Paste { text, delimiter } => *list = split_list(&text, delimiter),
        }
        Ok(())
    }
}

/// Draft/entity editor for one entity type.
///
/// `items` is the local cache of the entity list. A draft is committed by
/// [`Editor::submit`], which writes through the data-access layer and only
/// then merges the result into `items`.
#[derive(Debug, Serialize)]
#[serde(bound = "")]
pub struct Editor<E: Editable> {
    items: Vec<E>,
    state: EditorState<E::New>,
}

impl<E: Editable> Editor<E> {
    pub fn new(items: Vec<E>) -> Self {
        Editor {
            items,
            state: EditorState::Idle,
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn state(&self) -> &EditorState<E::New> {
        &self.state
    }

    /// Swaps in a freshly loaded list and drops any open draft.
    pub fn replace_items(&mut self, items: Vec<E>) {
        self.items = items;
        self.state = EditorState::Idle;
    }

    /// A pending delete confirmation counts as busy, like an open draft.
    fn ensure_free(&self) -> Result<(), EditorError> {
        if !self.state.is_idle() {
            return Err(EditorError::Busy(E::COLLECTION));
        }
        Ok(())
    }

    fn ensure_known(&self, id: &str) -> Result<usize, EditorError> {
        self.items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| EditorError::UnknownEntity {
                collection: E::COLLECTION,
                id: id.to_string(),
            })
    }

    pub fn begin_add(&mut self, language: Language) -> Result<&E::New, EditorError> {
        self.ensure_free()?;
        self.state = EditorState::Adding {
            draft: E::blank_draft(language),
            error: None,
        };
        self.current_draft()
    }

    pub fn begin_edit(&mut self, id: &str) -> Result<&E::New, EditorError> {
        self.ensure_free()?;
        let index = self.ensure_known(id)?;
        self.state = EditorState::Editing {
            id: id.to_string(),
            draft: self.items[index].to_draft(),
            error: None,
        };
        self.current_draft()
    }

    fn current_draft(&self) -> Result<&E::New, EditorError> {
        self.state.draft().ok_or(EditorError::NoDraft(E::COLLECTION))
    }

    fn draft_mut(&mut self) -> Result<&mut E::New, EditorError> {
        match &mut self.state {
            EditorState::Adding { draft, .. } | EditorState::Editing { draft, .. } => Ok(draft),
            _ => Err(EditorError::NoDraft(E::COLLECTION)),
        }
    }

    /// Replaces the open draft wholesale.
    pub fn set_draft(&mut self, draft: E::New) -> Result<&E::New, EditorError> {
        *self.draft_mut()? = draft;
        self.current_draft()
    }

    pub fn edit_list(&mut self, edit: ListEdit) -> Result<&E::New, EditorError> {
        let draft = self.draft_mut()?;
        let list = draft
            .list_mut(&edit.field)
            .ok_or_else(|| EditorError::UnknownListField(edit.field.clone()))?;
        edit.op.apply(&edit.field, list)?;
        self.current_draft()
    }

    /// Commits the open draft.
    ///
    /// On failure the draft stays open with the localized error attached.
    pub async fn submit<S: DocumentStore>(
        &mut self,
        access: &DataAccess<S>,
        session: &Session,
        strings: &Localizer,
    ) -> Result<&E, EditorError> {
        let (id, draft) = match &self.state {
            EditorState::Adding { draft, .. } => (None, draft.clone()),
            EditorState::Editing { id, draft, .. } => (Some(id.clone()), draft.clone()),
            _ => return Err(EditorError::NoDraft(E::COLLECTION)),
        };
        let api = access.entity::<E>();

        let result = match &id {
            None => api.add(session, &draft).await,
            Some(id) => api
                .update(session, id, &<E::Patch as From<E::New>>::from(draft.clone()))
                .await
                .map(|()| id.clone()),
        };

        let committed_id = match result {
            Ok(committed_id) => committed_id,
            Err(err) => {
                let key = if id.is_none() { "errorAdding" } else { "errorUpdating" };
                self.set_error(failure_message::<E>(strings, key, &err));
                return Err(err.into());
            }
        };

        let now = Some(Utc::now());
        let index = match id {
            None => {
                self.items.insert(0, E::from_draft(committed_id, draft, now, now));
                0
            }
            Some(id) => {
                let existing = self.items.iter().position(|item| item.id() == id);
                let created_at = existing.and_then(|i| self.items[i].created_at());
                let entity = E::from_draft(id, draft, created_at, now);
                match existing {
                    Some(i) => {
                        self.items[i] = entity;
                        i
                    }
                    None => {
                        self.items.insert(0, entity);
                        0
                    }
                }
            }
        };

        self.state = EditorState::Idle;
        Ok(&self.items[index])
    }

    fn set_error(&mut self, message: String) {
        if let EditorState::Adding { error, .. } | EditorState::Editing { error, .. } = &mut self.state {
            *error = Some(message);
        }
    }

    pub fn cancel(&mut self) {
        self.state = EditorState::Idle;
    }

    /// Asks for confirmation; nothing is deleted until [`Editor::confirm_delete`].
    pub fn request_delete(&mut self, id: &str) -> Result<(), EditorError> {
        self.ensure_free()?;
        self.ensure_known(id)?;
        self.state = EditorState::ConfirmingDelete { id: id.to_string() };
        Ok(())
    }

    /// Deletes the entity awaiting confirmation. The editor returns to idle
    /// whether or not the delete succeeds.
    pub async fn confirm_delete<S: DocumentStore>(
        &mut self,
        access: &DataAccess<S>,
        session: &Session,
        strings: &Localizer,
    ) -> Result<String, (EditorError, String)> {
        let id = match &self.state {
            EditorState::ConfirmingDelete { id } => id.clone(),
            _ => {
                let err = EditorError::NoPendingDelete(E::COLLECTION);
                let message = err.to_string();
                return Err((err, message));
            }
        };
        self.state = EditorState::Idle;

        match access.entity::<E>().delete(session, &id).await {
            Ok(()) => {
                self.items.retain(|item| item.id() != id);
                Ok(id)
            }
            Err(err) => {
                let message = failure_message::<E>(strings, "errorDeleting", &err);
                Err((err.into(), message))
            }
        }
    }

    pub fn delete_prompt(strings: &Localizer) -> String {
        strings.t(&format!("{}.deleteConfirm", E::I18N_SCOPE))
    }
}

fn failure_message<E: Editable>(strings: &Localizer, key: &str, err: &DataError) -> String {
    let label = strings.t(&format!("{}.{}", E::I18N_SCOPE, key));
    if err.is_permission_denied() {
        format!("{}: {} ({})", label, err, strings.t("admin.common.loginRequired"))
    } else {
        format!("{}: {}", label, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::{
            project::DEFAULT_PROJECT_CATEGORY,
            service::DEFAULT_SERVICE_ICON,
            token::{Claims, TokenType},
        },
        repositories::memory_store::{MemoryDocumentStore, StoreRules},
    };

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

    fn strings() -> Localizer {
        Localizer::new(Language::Sl)
    }

    fn filled_service_draft(editor: &mut Editor<Service>) {
        let mut draft = editor.begin_add(Language::Sl).unwrap().clone();
        draft.title = "Montaža vtičnic".into();
        draft.description = "Zamenjava starih vtičnic".into();
        draft.price = "35€/vtičnica".into();
        editor.set_draft(draft).unwrap();
    }

    #[test]
    fn blank_drafts_carry_editor_defaults() {
        let mut services: Editor<Service> = Editor::new(vec![]);
        assert_eq!(services.begin_add(Language::Sl).unwrap().icon, DEFAULT_SERVICE_ICON);

        let mut projects: Editor<Project> = Editor::new(vec![]);
        let draft = projects.begin_add(Language::En).unwrap();
        assert_eq!(draft.category, DEFAULT_PROJECT_CATEGORY);
        assert!(draft.image.starts_with("https://images.unsplash.com/"));
        assert_eq!(draft.language, Language::En);
    }

    #[test]
    fn only_one_draft_per_type_at_a_time() {
        let mut editor: Editor<Faq> = Editor::new(vec![]);
        editor.begin_add(Language::Sl).unwrap();
        assert!(matches!(editor.begin_add(Language::Sl), Err(EditorError::Busy(_))));

        editor.cancel();
        assert!(editor.state().is_idle());
        assert!(editor.begin_add(Language::En).is_ok());
    }

    #[test]
    fn list_rows_are_edited_without_splitting_items() {
        let mut editor: Editor<Service> = Editor::new(vec![]);
        editor.begin_add(Language::Sl).unwrap();

        let edits = [
            r#"{"field":"materials","op":"push","value":"Kabli NYM-J (Nexans, Prysmian)"}"#,
            r#"{"field":"materials","op":"push","value":"Razdelilne omarice"}"#,
            r#"{"field":"materials","op":"insert","index":0,"value":"Varovalke"}"#,
            r#"{"field":"materials","op":"move","from":0,"to":2}"#,
            r#"{"field":"materials","op":"replace","index":1,"value":"Omarice ABB"}"#,
        ];
        for edit in edits {
            editor.edit_list(serde_json::from_str(edit).unwrap()).unwrap();
        }

        let draft = editor.state().draft().unwrap();
        assert_eq!(
            draft.materials,
            vec!["Kabli NYM-J (Nexans, Prysmian)", "Omarice ABB", "Varovalke"]
        );
    }

    #[test]
    fn list_edit_errors_leave_the_draft_untouched() {
        let mut editor: Editor<Service> = Editor::new(vec![]);
        assert!(matches!(
            editor.edit_list(serde_json::from_str(r#"{"field":"brands","op":"remove","index":0}"#).unwrap()),
            Err(EditorError::NoDraft(_))
        ));

        editor.begin_add(Language::Sl).unwrap();
        let remove: ListEdit = serde_json::from_str(r#"{"field":"brands","op":"remove","index":3}"#).unwrap();
        assert!(matches!(editor.edit_list(remove), Err(EditorError::IndexOutOfRange { index: 3, .. })));

        let unknown: ListEdit = serde_json::from_str(r#"{"field":"title","op":"push","value":"x"}"#).unwrap();
        assert!(matches!(editor.edit_list(unknown), Err(EditorError::UnknownListField(_))));

        let paste: ListEdit =
            serde_json::from_str(r#"{"field":"brands","op":"paste","text":"ABB, Hager","delimiter":","}"#).unwrap();
        assert_eq!(editor.edit_list(paste).unwrap().brands, vec!["ABB", "Hager"]);
    }

    #[actix_rt::test]
    async fn successful_add_commits_then_merges_into_items() {
        let access = DataAccess::new(MemoryDocumentStore::new());
        let mut editor: Editor<Service> = Editor::new(vec![]);
        filled_service_draft(&mut editor);

        let added = editor.submit(&access, &session(), &strings()).await.unwrap().clone();

        assert!(editor.state().is_idle());
        assert_eq!(editor.items().len(), 1);
        let stored = access.services().get_by_id(&added.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Montaža vtičnic");
        assert_eq!(stored.icon, DEFAULT_SERVICE_ICON);
    }

    #[actix_rt::test]
    async fn failed_add_keeps_the_draft_open_with_a_localized_error() {
        let store = MemoryDocumentStore::with_rules(StoreRules {
            ordered_queries: true,
            writable: false,
        });
        let access = DataAccess::new(store);
        let mut editor: Editor<Service> = Editor::new(vec![]);
        filled_service_draft(&mut editor);

        let err = editor.submit(&access, &session(), &strings()).await.unwrap_err();
        assert!(matches!(err, EditorError::Data(DataError::PermissionDenied { .. })));

        match editor.state() {
            EditorState::Adding { draft, error } => {
                assert_eq!(draft.title, "Montaža vtičnic");
                let error = error.as_deref().unwrap();
                assert!(error.starts_with("Napaka pri dodajanju storitve"));
            }
            other => panic!("expected adding state, got {other:?}"),
        }
        assert!(editor.items().is_empty());
    }

    #[actix_rt::test]
    async fn edit_submits_full_draft_and_updates_local_copy() {
        let access = DataAccess::new(MemoryDocumentStore::new());
        let session = session();
        let mut editor: Editor<Service> = Editor::new(vec![]);
        filled_service_draft(&mut editor);
        let id = editor.submit(&access, &session, &strings()).await.unwrap().id.clone();

        let mut draft = editor.begin_edit(&id).unwrap().clone();
        draft.price = "40€/vtičnica".into();
        editor.set_draft(draft).unwrap();
        editor.submit(&access, &session, &strings()).await.unwrap();

        assert_eq!(editor.items()[0].price, "40€/vtičnica");
        let stored = access.services().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.price, "40€/vtičnica");
        assert_eq!(stored.title, "Montaža vtičnic");
    }

    #[actix_rt::test]
    async fn delete_requires_confirmation() {
        let access = DataAccess::new(MemoryDocumentStore::new());
        let session = session();
        let mut editor: Editor<Service> = Editor::new(vec![]);
        filled_service_draft(&mut editor);
        let id = editor.submit(&access, &session, &strings()).await.unwrap().id.clone();

        let (err, _) = editor.confirm_delete(&access, &session, &strings()).await.unwrap_err();
        assert!(matches!(err, EditorError::NoPendingDelete(_)));
        assert!(access.services().get_by_id(&id).await.unwrap().is_some());

        editor.request_delete(&id).unwrap();
        let deleted = editor.confirm_delete(&access, &session, &strings()).await.unwrap();
        assert_eq!(deleted, id);
        assert!(editor.items().is_empty());
        assert!(access.services().get_by_id(&id).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn pending_delete_blocks_new_drafts_until_cancelled() {
        let access = DataAccess::new(MemoryDocumentStore::new());
        let mut editor: Editor<Service> = Editor::new(vec![]);
        filled_service_draft(&mut editor);
        let id = editor.submit(&access, &session(), &strings()).await.unwrap().id.clone();

        editor.request_delete(&id).unwrap();
        assert!(matches!(editor.begin_add(Language::Sl), Err(EditorError::Busy(_))));
        assert!(matches!(editor.begin_edit(&id), Err(EditorError::Busy(_))));
        assert!(matches!(editor.state(), EditorState::ConfirmingDelete { id: pending } if *pending == id));

        editor.cancel();
        assert!(editor.begin_edit(&id).is_ok());
    }

    #[test]
    fn delete_prompt_is_localized() {
        assert_eq!(
            Editor::<Faq>::delete_prompt(&Localizer::new(Language::En)),
            "Are you sure you want to delete this question?"
        );
    }
}
