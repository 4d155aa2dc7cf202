//! Authenticated identity and its claims for the current request.
//!
//! A `Principal` is produced by whatever authenticated the request (an upstream
//! identity header, a test harness). The authorization core only reads it.

/// Well-known claim kinds.
pub mod kinds {
    pub const PREFERRED_USERNAME: &str = "preferred_username";
    pub const EMAIL: &str = "email";
    pub const NAME: &str = "name";
    pub const AUDIENCE: &str = "aud";
}

/// A single key/value assertion about a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub kind: String,
    pub value: String,
}

impl Claim {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// Identity of the caller. Claims keep their original order; a kind may repeat.
#[derive(Debug, Clone, Default)]
pub struct Principal {
    authenticated: bool,
    auth_type: Option<String>,
    claims: Vec<Claim>,
}

impl Principal {
    /// Caller without a validated credential.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Caller whose credential was validated by `auth_type`.
    pub fn authenticated(auth_type: impl Into<String>, claims: Vec<Claim>) -> Self {
        Self {
            authenticated: true,
            auth_type: Some(auth_type.into()),
            claims,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn auth_type(&self) -> Option<&str> {
        self.auth_type.as_deref()
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// First claim value of `kind`. Kind comparison is exact.
    pub fn find_first(&self, kind: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.value.as_str())
    }

    /// Display name: `name`, falling back to `preferred_username`.
    pub fn name(&self) -> Option<&str> {
        self.find_first(kinds::NAME)
            .or_else(|| self.find_first(kinds::PREFERRED_USERNAME))
    }
}
