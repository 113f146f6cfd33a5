use actix_web::{FromRequest, HttpRequest, HttpMessage, http::header::ACCEPT_LANGUAGE};
use futures_util::future::{ready, Ready};
use crate::{
    entities::{language::Language, session::Session, token::Claims},
    errors::{AppError, AuthError},
};

/// Cookie holding an explicit language choice.
pub const LOCALE_COOKIE: &str = "NEXT_LOCALE";

/// Extractor for admin claims, ensuring the user has admin privileges.
/// Returns 403 if the user is not an admin.
/// Returns 401 if the user is not authenticated.
#[derive(Debug)]
pub struct AdminClaims(pub Claims);

impl AdminClaims {
    pub fn session(&self) -> Session {
        Session::authenticated(self.0.clone())
    }
}

impl FromRequest for AdminClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) if claims.admin => {
                ready(Ok(AdminClaims(claims.clone())))
            }
            Some(_) => {
                ready(Err(AuthError::Forbidden("Admin access required".into()).into()))
            }
            None => {
                ready(Err(AppError::UnauthorizedAccess.into()))
            }
        }
    }
}

/// The caller's session. Never fails: requests without valid claims get an
/// anonymous session and writes are refused further down.
impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let session = match req.extensions().get::<Claims>() {
            Some(claims) => Session::authenticated(claims.clone()),
            None => Session::anonymous(),
        };
        ready(Ok(session))
    }
}

/// Language resolved for this request: the locale cookie, then
/// `Accept-Language`, then Slovenian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Language);

impl RequestLocale {
    pub fn resolve(req: &HttpRequest) -> Language {
        if let Some(language) = req
            .cookie(LOCALE_COOKIE)
            .and_then(|cookie| cookie.value().parse::<Language>().ok())
        {
            return language;
        }

        req.headers()
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(Language::from_accept_language)
            .unwrap_or_default()
    }
}

impl FromRequest for RequestLocale {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(RequestLocale(RequestLocale::resolve(req))))
    }
}
