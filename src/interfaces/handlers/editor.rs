use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    entities::language::Language,
    errors::{AppError, EditorError},
    localization::Localizer,
    use_cases::{
        editor::{Editable, Editor, ListEdit},
        extractors::{AdminClaims, RequestLocale},
        workspace::SharedWorkspace,
    },
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct AddQuery {
    pub language: Option<Language>,
}

async fn workspace(state: &AppState, admin: &AdminClaims) -> SharedWorkspace {
    state.workspaces.get_or_load(&admin.0.sub, &state.access).await
}

/// Error body carrying the editor, so a failed submit still shows the
/// retained draft and its message.
fn editor_failure<E: Editable>(err: EditorError, message: String, editor: &Editor<E>) -> HttpResponse {
    let denied = matches!(&err, EditorError::Data(data) if data.is_permission_denied());
    let status = AppError::from(err).status_code();
    let mut body = serde_json::json!({
        "error": message,
        "editor": editor,
    });
    if denied {
        body["action"] = "login".into();
    }
    HttpResponse::build(status).json(body)
}

#[instrument(skip(admin, state), fields(kind = %E::COLLECTION))]
pub async fn view<E: Editable>(
    admin: AdminClaims,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let workspace = workspace(&state, &admin).await;
    let mut workspace = workspace.lock().await;
    Ok(HttpResponse::Ok().json(&*E::editor_mut(&mut workspace)))
}

#[instrument(skip(admin, state), fields(kind = %E::COLLECTION))]
pub async fn begin_add<E: Editable>(
    admin: AdminClaims,
    locale: RequestLocale,
    state: web::Data<AppState>,
    query: web::Query<AddQuery>,
) -> Result<HttpResponse, AppError> {
    let workspace = workspace(&state, &admin).await;
    let mut workspace = workspace.lock().await;
    let editor = E::editor_mut(&mut workspace);
    editor.begin_add(query.language.unwrap_or(locale.0))?;
    Ok(HttpResponse::Ok().json(&*editor))
}

#[instrument(skip(admin, state), fields(kind = %E::COLLECTION))]
pub async fn begin_edit<E: Editable>(
    admin: AdminClaims,
    id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let workspace = workspace(&state, &admin).await;
    let mut workspace = workspace.lock().await;
    let editor = E::editor_mut(&mut workspace);
    editor.begin_edit(&id)?;
    Ok(HttpResponse::Ok().json(&*editor))
}

#[instrument(skip(admin, state, draft), fields(kind = %E::COLLECTION))]
pub async fn set_draft<E: Editable>(
    admin: AdminClaims,
    state: web::Data<AppState>,
    draft: web::Json<E::New>,
) -> Result<HttpResponse, AppError> {
    let workspace = workspace(&state, &admin).await;
    let mut workspace = workspace.lock().await;
    let editor = E::editor_mut(&mut workspace);
    editor.set_draft(draft.into_inner())?;
    Ok(HttpResponse::Ok().json(&*editor))
}

#[instrument(skip(admin, state), fields(kind = %E::COLLECTION))]
pub async fn edit_list<E: Editable>(
    admin: AdminClaims,
    state: web::Data<AppState>,
    edit: web::Json<ListEdit>,
) -> Result<HttpResponse, AppError> {
    let workspace = workspace(&state, &admin).await;
    let mut workspace = workspace.lock().await;
    let editor = E::editor_mut(&mut workspace);
    editor.edit_list(edit.into_inner())?;
    Ok(HttpResponse::Ok().json(&*editor))
}

#[instrument(skip(admin, state), fields(kind = %E::COLLECTION))]
pub async fn submit<E: Editable>(
    admin: AdminClaims,
    locale: RequestLocale,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let strings = Localizer::new(locale.0);
    let session = admin.session();
    let workspace = workspace(&state, &admin).await;
    let mut workspace = workspace.lock().await;
    let editor = E::editor_mut(&mut workspace);

    let result = editor
        .submit(&state.access, &session, &strings)
        .await
        .map(|saved| saved.clone());

    let saved = match result {
        Ok(saved) => saved,
        Err(err @ EditorError::Data(_)) => {
            let message = editor
                .state()
                .error()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string());
            return Ok(editor_failure(err, message, editor));
        }
        Err(err) => return Err(err.into()),
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "saved": saved,
        "editor": &*editor,
    })))
}

#[instrument(skip(admin, state), fields(kind = %E::COLLECTION))]
pub async fn cancel<E: Editable>(
    admin: AdminClaims,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let workspace = workspace(&state, &admin).await;
    let mut workspace = workspace.lock().await;
    let editor = E::editor_mut(&mut workspace);
    editor.cancel();
    Ok(HttpResponse::Ok().json(&*editor))
}

#[instrument(skip(admin, state), fields(kind = %E::COLLECTION))]
pub async fn request_delete<E: Editable>(
    admin: AdminClaims,
    id: web::Path<String>,
    locale: RequestLocale,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let strings = Localizer::new(locale.0);
    let workspace = workspace(&state, &admin).await;
    let mut workspace = workspace.lock().await;
    let editor = E::editor_mut(&mut workspace);
    editor.request_delete(&id)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "prompt": Editor::<E>::delete_prompt(&strings),
        "editor": &*editor,
    })))
}

#[instrument(skip(admin, state), fields(kind = %E::COLLECTION))]
pub async fn confirm_delete<E: Editable>(
    admin: AdminClaims,
    locale: RequestLocale,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let strings = Localizer::new(locale.0);
    let session = admin.session();
    let workspace = workspace(&state, &admin).await;
    let mut workspace = workspace.lock().await;
    let editor = E::editor_mut(&mut workspace);

    match editor.confirm_delete(&state.access, &session, &strings).await {
        Ok(id) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "deleted": id,
            "editor": &*editor,
        }))),
        Err((err, message)) => Ok(editor_failure(err, message, editor)),
    }
}
