use crate::entities::token::Claims;

/// The actor behind an operation, passed explicitly into every write.
///
/// The data-access layer only checks that a session is present; roles are
/// enforced at the HTTP boundary.
#[derive(Debug, Clone, Default)]
pub struct Session {
    claims: Option<Claims>,
}

impl Session {
    pub fn anonymous() -> Self {
        Session { claims: None }
    }

    pub fn authenticated(claims: Claims) -> Self {
        Session { claims: Some(claims) }
    }

    pub fn is_authenticated(&self) -> bool {
        self.claims.is_some()
    }

    pub fn subject(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.sub.as_str())
    }
}
