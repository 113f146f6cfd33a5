use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::{
    errors::AppError,
    use_cases::{extractors::AdminClaims, sample_data::populate_sample_data},
    AppState,
};

/// The caller's workspace, loaded with every language on first use.
#[instrument(skip(admin, state), fields(sub = %admin.0.sub))]
pub async fn open(admin: AdminClaims, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let workspace = state.workspaces.get_or_load(&admin.0.sub, &state.access).await;
    let workspace = workspace.lock().await;
    Ok(HttpResponse::Ok().json(&*workspace))
}

#[instrument(skip(admin, state), fields(sub = %admin.0.sub))]
pub async fn reload(admin: AdminClaims, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let workspace = state.workspaces.get_or_load(&admin.0.sub, &state.access).await;
    let mut workspace = workspace.lock().await;
    workspace.reload(&state.access).await;
    Ok(HttpResponse::Ok().json(&*workspace))
}

#[instrument(skip(admin, state), fields(sub = %admin.0.sub))]
pub async fn close(admin: AdminClaims, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let closed = state.workspaces.close(&admin.0.sub);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "closed": closed })))
}

/// Writes the demo content, then reloads the caller's workspace if open.
#[instrument(skip(admin, state), fields(sub = %admin.0.sub))]
pub async fn sample_data(admin: AdminClaims, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let report = populate_sample_data(&state.access, &admin.session()).await?;

    if let Some(workspace) = state.workspaces.get(&admin.0.sub) {
        workspace.lock().await.reload(&state.access).await;
    }

    Ok(HttpResponse::Created().json(report))
}
