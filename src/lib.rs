mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, localization, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, db, utils};

use auth::jwt::JwtService;
use repositories::{admin::ConfiguredAdmins, document_store::SharedStore};
use use_cases::{auth::AuthHandler, content::DataAccess, workspace::Workspaces};

pub struct AppState {
    pub access: DataAccess<SharedStore>,
    pub workspaces: Workspaces,
    pub auth_handler: AppAuthHandler,
    pub secure_cookies: bool,
}

pub type AppAuthHandler = AuthHandler<ConfiguredAdmins, JwtService>;

impl AppState {
    pub fn new(config: &settings::AppConfig, store: SharedStore) -> Self {
        let jwt_service = JwtService::new(config);
        let admins = ConfiguredAdmins::from_config(config);
        let auth_handler = AuthHandler::new(admins, jwt_service);

        AppState {
            access: DataAccess::new(store),
            workspaces: Workspaces::new(),
            auth_handler,
            secure_cookies: config.secure_cookies,
        }
    }
}
