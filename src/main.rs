use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, EnvFilter};
use voltage_backend::{
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    middlewares::auth::AuthMiddleware,
    repositories::{
        document_store::SharedStore, memory_store::MemoryDocumentStore, sqlx_repo::SqlxDocumentStore,
    },
    routes::configure_routes,
    settings::{AppConfig, StoreBackend},
    AppState,
};

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_target(false);

    if config.is_production() {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn open_store(config: &AppConfig) -> Result<SharedStore, String> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let pool = create_pool(&config.database_url)
                .await
                .map_err(|e| format!("Failed to create database connection pool: {}", e))?;
            run_migrations(&pool)
                .await
                .map_err(|e| format!("Failed to run migrations: {}", e))?;
            Ok(Arc::new(SqlxDocumentStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory document store; content is lost on restart");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
    }
}

fn cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE, header::ACCEPT_LANGUAGE])
        .supports_credentials()
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }
    origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    let store = match open_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let app_state = web::Data::new(AppState::new(&config, store));
    let origins = config.cors_origins();

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting Voltage API v{} on {}",
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(AuthMiddleware)
            .wrap(NormalizePath::trim())
            .wrap(cors(&origins))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
