use async_trait::async_trait;

use crate::{entities::admin::AdminAccount, errors::AppError, settings::AppConfig};

/// Lookup of admin accounts for the login flow.
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<AdminAccount>, AppError>;
}

/// Accounts provisioned through configuration. Emails compare case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredAdmins {
    accounts: Vec<AdminAccount>,
}

impl ConfiguredAdmins {
    pub fn new(accounts: Vec<AdminAccount>) -> Self {
        ConfiguredAdmins { accounts }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        ConfiguredAdmins::new(vec![AdminAccount {
            id: "admin".to_string(),
            email: config.admin_email.trim().to_lowercase(),
            password_hash: config.admin_password_hash.clone(),
            is_admin: true,
        }])
    }
}

#[async_trait]
impl AdminDirectory for ConfiguredAdmins {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, AppError> {
        let email = email.trim().to_lowercase();
        Ok(self.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AdminAccount>, AppError> {
        Ok(self.accounts.iter().find(|a| a.id == id).cloned())
    }
}
