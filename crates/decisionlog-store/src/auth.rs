/// Source of the bearer credential for remote calls.
///
/// Implementations are polled before every request, so a rotated token is
/// picked up without restarting. Tokens live in process memory only and
/// are never persisted.
pub trait TokenProvider: Send + Sync {
    /// Current bearer token, or `None` when the user is not authenticated.
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token handed over once, e.g. from a completed OAuth flow.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.clone())
        }
    }
}

/// Reads the token from an environment variable on every call.
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl TokenProvider for EnvToken {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|t| !t.is_empty())
    }
}
