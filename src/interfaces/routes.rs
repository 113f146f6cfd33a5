use actix_web::web;

mod admin;
mod auth;
mod content;
mod json_error;
mod pages;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(pages::config_routes);

    cfg.service(
        web::scope("/api/v1")
            .configure(auth::config_routes)
            .configure(admin::config_routes)
            .configure(content::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
