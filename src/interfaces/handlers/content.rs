use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    entities::{content::ContentEntity, language::Language, session::Session},
    errors::{AppError, DataError},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub language: Option<Language>,
}

#[instrument(skip(state), fields(collection = %E::COLLECTION))]
pub async fn get_all<E: ContentEntity>(
    state: web::Data<AppState>,
    query: web::Query<LanguageQuery>,
) -> Result<impl Responder, AppError> {
    let items = state.access.entity::<E>().get_all(query.language).await?;
    Ok(HttpResponse::Ok().json(items))
}

#[instrument(skip(state), fields(collection = %E::COLLECTION))]
pub async fn get_all_languages<E: ContentEntity>(
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let items = state.access.entity::<E>().get_all_languages().await?;
    Ok(HttpResponse::Ok().json(items))
}

#[instrument(skip(state), fields(collection = %E::COLLECTION))]
pub async fn get_by_id<E: ContentEntity>(
    id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let item = state
        .access
        .entity::<E>()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| DataError::NotFound {
            collection: E::COLLECTION,
            id: id.into_inner(),
        })?;
    Ok(HttpResponse::Ok().json(item))
}

#[instrument(skip(session, state, data), fields(collection = %E::COLLECTION))]
pub async fn add<E: ContentEntity>(
    session: Session,
    state: web::Data<AppState>,
    data: web::Json<E::New>,
) -> Result<impl Responder, AppError> {
    let id = state.access.entity::<E>().add(&session, &data).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "id": id })))
}

#[instrument(skip(session, state, data), fields(collection = %E::COLLECTION))]
pub async fn update<E: ContentEntity>(
    session: Session,
    id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<E::Patch>,
) -> Result<impl Responder, AppError> {
    state.access.entity::<E>().update(&session, &id, &data).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(session, state), fields(collection = %E::COLLECTION))]
pub async fn delete<E: ContentEntity>(
    session: Session,
    id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.access.entity::<E>().delete(&session, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
