use actix_web::web;

use crate::handlers::pages;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(pages::home))
        .route("/service/{id}", web::get().to(pages::service_detail))
        .route("/project/{id}", web::get().to(pages::project_detail))
        .route("/i18n", web::get().to(pages::strings))
        .route("/language", web::post().to(pages::set_language))
        .route("/contact", web::post().to(pages::contact));
}
