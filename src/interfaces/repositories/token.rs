use jsonwebtoken::TokenData;
use crate::{
    entities::{admin::AdminAccount, token::{Claims, RefreshClaims}},
    errors::AuthError,
};

pub trait TokenServiceRepository: Send + Sync {
    /// Creates a new access JWT for the account
    fn create_jwt(&self, account: &AdminAccount) -> Result<String, AuthError>;

    /// Creates a new refresh JWT for the account id
    fn create_refresh_jwt(&self, account_id: &str) -> Result<String, AuthError>;

    /// Decodes an access JWT and returns the claims
    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;

    /// Decodes a refresh JWT and returns the claims
    fn decode_refresh_jwt(&self, token: &str) -> Result<TokenData<RefreshClaims>, AuthError>;
}
