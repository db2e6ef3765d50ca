//! Access token attachment.
//!
//! Token acquisition lives outside this crate. The dispatcher asks a
//! [`TokenProvider`] for the current token before each attempt and sets
//! `Authorization: Bearer <token>` when one is available.

/// Source of the current access token.
pub trait TokenProvider: Send + Sync {
    /// Current token, `None` or empty when the user is signed out.
    fn access_token(&self) -> Option<String>;
}

/// Token fixed at construction time (from configuration).
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token)
    }
}

impl TokenProvider for StaticToken {
    fn access_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Token to attach, skipping empty values.
pub(crate) fn bearer_token(provider: &dyn TokenProvider) -> Option<String> {
    provider.access_token().filter(|token| !token.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_not_attached() {
        assert_eq!(bearer_token(&StaticToken::new(None)), None);
        assert_eq!(bearer_token(&StaticToken::new(Some(String::new()))), None);
        assert_eq!(
            bearer_token(&StaticToken::new(Some("abc".to_string()))),
            Some("abc".to_string())
        );
    }
}
