use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    web, HttpResponse, Responder,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;
use validator::Validate;

use crate::{
    entities::{
        contact::{ContactAcknowledgement, ContactForm},
        document::Collection,
        faq::Faq,
        language::Language,
        project::Project,
        service::Service,
    },
    errors::AppError,
    localization::Localizer,
    use_cases::{
        content_state::{CategoryOption, ContentState, LoadFailure, ALL_CATEGORIES},
        extractors::{RequestLocale, LOCALE_COOKIE},
    },
    AppState,
};

const HOME_SECTIONS: [&str; 8] = [
    "navigation",
    "hero",
    "services",
    "portfolio",
    "whyChooseUs",
    "faq",
    "contact",
    "footer",
];
const DETAIL_SECTIONS: [&str; 4] = ["navigation", "pages", "contact", "footer"];
const LOCALE_COOKIE_DAYS: i64 = 365;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub language: Language,
    pub strings: Value,
    pub services: Vec<Service>,
    pub projects: Vec<Project>,
    pub faqs: Vec<Faq>,
    pub categories: Vec<CategoryOption>,
    pub selected_category: String,
    pub category_name: String,
    pub failures: Vec<LoadFailure>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceView {
    pub language: Language,
    pub strings: Value,
    pub service: Service,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub language: Language,
    pub strings: Value,
    pub project: Project,
    pub category_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LanguageChoice {
    pub language: Language,
}

/// Static strings plus any stored overrides for the language.
async fn localizer(state: &AppState, language: Language) -> Localizer {
    match state.access.translations().get_by_language(language).await {
        Ok(overrides) => Localizer::new(language).with_overrides(&overrides),
        Err(e) => {
            tracing::warn!("Translation overrides unavailable: {}", e);
            Localizer::new(language)
        }
    }
}

fn not_found(strings: &Localizer, key: &str, failures: &[LoadFailure]) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": strings.t(key),
        "back": strings.t("pages.backToHome"),
        "failures": failures,
    }))
}

/// The detail collection itself failed to load, so absence proves nothing.
fn load_failed(strings: &Localizer, key: &str, failures: &[LoadFailure]) -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(serde_json::json!({
        "error": strings.t(key),
        "back": strings.t("pages.backToHome"),
        "failures": failures,
    }))
}

#[instrument(skip(state, query))]
pub async fn home(
    locale: RequestLocale,
    state: web::Data<AppState>,
    query: web::Query<CategoryQuery>,
) -> impl Responder {
    let language = locale.0;
    let strings = localizer(&state, language).await;
    let content = ContentState::load(&state.access, Some(language)).await;

    let selected_category = query
        .into_inner()
        .category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());

    let view = HomeView {
        language,
        strings: strings.sections(&HOME_SECTIONS),
        projects: content.projects_in_category(&selected_category).cloned().collect(),
        categories: content.categories(&strings),
        category_name: content.category_name(&selected_category, &strings),
        selected_category,
        services: content.services,
        faqs: content.faqs,
        failures: content.failures,
    };

    HttpResponse::Ok().json(view)
}

#[instrument(skip(state))]
pub async fn service_detail(
    id: web::Path<String>,
    locale: RequestLocale,
    state: web::Data<AppState>,
) -> impl Responder {
    let language = locale.0;
    let strings = localizer(&state, language).await;
    let content = ContentState::load(&state.access, Some(language)).await;

    match content.service(&id) {
        Some(service) => HttpResponse::Ok().json(ServiceView {
            language,
            strings: strings.sections(&DETAIL_SECTIONS),
            service: service.clone(),
        }),
        None if content.failed(Collection::Services) => {
            load_failed(&strings, "pages.serviceLoadError", &content.failures)
        }
        None => not_found(&strings, "pages.serviceNotFound", &content.failures),
    }
}

#[instrument(skip(state))]
pub async fn project_detail(
    id: web::Path<String>,
    locale: RequestLocale,
    state: web::Data<AppState>,
) -> impl Responder {
    let language = locale.0;
    let strings = localizer(&state, language).await;
    let content = ContentState::load(&state.access, Some(language)).await;

    match content.project(&id) {
        Some(project) => HttpResponse::Ok().json(ProjectView {
            language,
            strings: strings.sections(&DETAIL_SECTIONS),
            category_name: content.category_name(&project.category, &strings),
            project: project.clone(),
        }),
        None if content.failed(Collection::Projects) => {
            load_failed(&strings, "pages.projectLoadError", &content.failures)
        }
        None => not_found(&strings, "pages.projectNotFound", &content.failures),
    }
}

#[instrument(skip(state))]
pub async fn strings(locale: RequestLocale, state: web::Data<AppState>) -> impl Responder {
    let strings = localizer(&state, locale.0).await;
    HttpResponse::Ok().json(serde_json::json!({
        "language": locale.0,
        "strings": strings.strings(),
    }))
}

/// Persists an explicit language choice in the locale cookie.
#[instrument(skip(state))]
pub async fn set_language(
    state: web::Data<AppState>,
    choice: web::Json<LanguageChoice>,
) -> impl Responder {
    let cookie = Cookie::build(LOCALE_COOKIE, choice.language.as_str())
        .path("/")
        .max_age(CookieDuration::days(LOCALE_COOKIE_DAYS))
        .same_site(SameSite::Lax)
        .secure(state.secure_cookies)
        .finish();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(serde_json::json!({ "language": choice.language }))
}

#[instrument(skip(state, form))]
pub async fn contact(
    locale: RequestLocale,
    state: web::Data<AppState>,
    form: web::Json<ContactForm>,
) -> Result<impl Responder, AppError> {
    form.validate()?;
    let form = form.into_inner().sanitized();
    tracing::info!(
        name = %form.name,
        email = %form.email,
        length = form.message.len(),
        "Contact form received"
    );

    let strings = localizer(&state, locale.0).await;
    Ok(HttpResponse::Ok().json(ContactAcknowledgement {
        message: strings.t("contact.success"),
    }))
}

