use validator::Validate;

use crate::entities::admin::{AdminAccount, LoginUser};
use crate::entities::token::AuthResponse;
use crate::errors::AuthError;
use crate::auth::password::verify_password;
use crate::repositories::{admin::AdminDirectory, token::TokenServiceRepository};

pub struct AuthHandler<D, T>
where
    D: AdminDirectory,
    T: TokenServiceRepository,
{
    pub directory: D,
    pub token_service: T,
}

impl<D, T> AuthHandler<D, T>
where
    D: AdminDirectory,
    T: TokenServiceRepository,
{
    pub fn new(directory: D, token_service: T) -> Self {
        AuthHandler {
            directory,
            token_service,
        }
    }

    /// Logs in an admin by validating credentials and generating JWTs
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let account = self.directory.find_by_email(&request.email)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, &account.password_hash)
            .map_err(|e| {
                tracing::warn!("Password verification failed: {}", e);
                AuthError::WrongCredentials
            })?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&account)?;

        tracing::info!("Admin logged in successfully");
        Ok(response)
    }

    pub fn create_auth_response(&self, account: &AdminAccount) -> Result<AuthResponse, AuthError> {
        let access_token = self.token_service.create_jwt(account)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        let refresh_token = self.token_service.create_refresh_jwt(&account.id)
            .map_err(|e| {
                tracing::warn!("Failed to create refresh JWT: {}", e);
                AuthError::TokenCreation
            })?;
        Ok(AuthResponse::new(access_token, refresh_token))
    }

    /// Refreshes the access token using the refresh token
    pub async fn refresh_token(&self, token: &str) -> Result<AuthResponse, AuthError> {
        let decoded = self.token_service.decode_refresh_jwt(token)?;

        let account = self.directory.find_by_id(&decoded.claims.sub)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        self.create_auth_response(&account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::entities::token::{Claims, RefreshClaims, TokenType};
    use crate::repositories::admin::ConfiguredAdmins;
    use jsonwebtoken::{Header, TokenData};
    use mockall::mock;

    mock! {
        pub Tokens {}
        impl TokenServiceRepository for Tokens {
            fn create_jwt(&self, account: &AdminAccount) -> Result<String, AuthError>;
            fn create_refresh_jwt(&self, account_id: &str) -> Result<String, AuthError>;
            fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;
            fn decode_refresh_jwt(&self, token: &str) -> Result<TokenData<RefreshClaims>, AuthError>;
        }
    }

    fn directory(password: &str) -> ConfiguredAdmins {
        ConfiguredAdmins::new(vec![AdminAccount {
            id: "admin".into(),
            email: "admin@voltage.si".into(),
            password_hash: hash_password(password).unwrap(),
            is_admin: true,
        }])
    }

    fn issuing_tokens() -> MockTokens {
        let mut tokens = MockTokens::new();
        tokens.expect_create_jwt().returning(|a| Ok(format!("access-{}", a.id)));
        tokens.expect_create_refresh_jwt().returning(|id| Ok(format!("refresh-{}", id)));
        tokens
    }

    #[actix_rt::test]
    async fn login_issues_both_tokens() {
        let handler = AuthHandler::new(directory("Elektrika1!"), issuing_tokens());
        let response = handler
            .login(LoginUser { email: "Admin@Voltage.si".into(), password: "Elektrika1!".into() })
            .await
            .unwrap();

        assert_eq!(response.access_token, "access-admin");
        assert_eq!(response.refresh_token, "refresh-admin");
        assert_eq!(response.token_type, "Bearer");
    }

    #[actix_rt::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let handler = AuthHandler::new(directory("Elektrika1!"), MockTokens::new());

        let wrong = handler
            .login(LoginUser { email: "admin@voltage.si".into(), password: "nope".into() })
            .await;
        let unknown = handler
            .login(LoginUser { email: "who@voltage.si".into(), password: "Elektrika1!".into() })
            .await;

        assert!(matches!(wrong, Err(AuthError::WrongCredentials)));
        assert!(matches!(unknown, Err(AuthError::WrongCredentials)));
    }

    #[actix_rt::test]
    async fn refresh_rebuilds_tokens_for_a_known_account() {
        let mut tokens = issuing_tokens();
        tokens.expect_decode_refresh_jwt().returning(|_| {
            Ok(TokenData {
                header: Header::default(),
                claims: RefreshClaims {
                    sub: "admin".into(),
                    token_type: TokenType::Refresh,
                    iat: 0,
                    exp: usize::MAX,
                },
            })
        });
        let handler = AuthHandler::new(directory("x"), tokens);

        let response = handler.refresh_token("refresh-admin").await.unwrap();
        assert_eq!(response.access_token, "access-admin");
    }
}
