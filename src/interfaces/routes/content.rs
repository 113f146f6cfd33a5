use actix_web::{web, Scope};

use crate::{
    entities::{content::ContentEntity, faq::Faq, project::Project, service::Service, translation::Translation},
    handlers::content,
};

fn collection_scope<E: ContentEntity>() -> Scope {
    web::scope(&format!("/{}", E::COLLECTION))
        .service(
            web::resource("")
                .route(web::get().to(content::get_all::<E>))
                .route(web::post().to(content::add::<E>))
        )
        .service(
            web::resource("/all-languages")
                .route(web::get().to(content::get_all_languages::<E>))
        )
        .service(
            web::resource("/{id}")
                .route(web::get().to(content::get_by_id::<E>))
                .route(web::patch().to(content::update::<E>))
                .route(web::delete().to(content::delete::<E>))
        )
}

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(collection_scope::<Service>())
        .service(collection_scope::<Project>())
        .service(collection_scope::<Faq>())
        .service(collection_scope::<Translation>());
}
