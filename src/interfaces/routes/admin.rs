use actix_web::{web, Scope};

use crate::{
    entities::{faq::Faq, project::Project, service::Service},
    handlers::{editor, system::admin_health_check, workspace},
    use_cases::editor::Editable,
};

fn editor_scope<E: Editable>() -> Scope {
    web::scope(&format!("/{}", E::COLLECTION))
        .route("", web::get().to(editor::view::<E>))
        .route("/add", web::post().to(editor::begin_add::<E>))
        .route("/draft", web::put().to(editor::set_draft::<E>))
        .route("/draft/lists", web::post().to(editor::edit_list::<E>))
        .route("/submit", web::post().to(editor::submit::<E>))
        .route("/cancel", web::post().to(editor::cancel::<E>))
        .route("/delete/confirm", web::post().to(editor::confirm_delete::<E>))
        .route("/{id}/edit", web::post().to(editor::begin_edit::<E>))
        .route("/{id}/delete", web::post().to(editor::request_delete::<E>))
}

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/health", web::get().to(admin_health_check))
            .route("/sample-data", web::post().to(workspace::sample_data))
            .service(
                web::resource("/workspace")
                    .route(web::get().to(workspace::open))
                    .route(web::delete().to(workspace::close))
            )
            .route("/workspace/reload", web::post().to(workspace::reload))
            .service(
                web::scope("/editor")
                    .service(editor_scope::<Service>())
                    .service(editor_scope::<Project>())
                    .service(editor_scope::<Faq>())
            )
    );
}
