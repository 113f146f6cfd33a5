use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::entities::admin::LoginUser;
use crate::entities::token::RefreshTokenRequest;
use crate::errors::AuthError;
use crate::AppState;

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>
) -> Result<impl Responder, AuthError> {
    let auth_response = state.auth_handler.login(user.into_inner()).await?;
    Ok(HttpResponse::Ok().json(auth_response))
}

#[instrument(skip(state, request))]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<impl Responder, AuthError> {
    let auth_response = state.auth_handler.refresh_token(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(auth_response))
}
