use crate::auth::TokenKey;

/// Key material used by the token codec.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Symmetric key for sealing and opening bearer tokens
    pub token_key: TokenKey,
}

impl SecurityConfig {
    pub fn new(token_key: TokenKey) -> Self {
        Self { token_key }
    }

    /// Fixed key so tests can mint tokens that the server accepts.
    pub fn for_tests() -> Self {
        Self::new(TokenKey::new([0x42; crate::auth::token::KEY_LEN]))
    }
}
