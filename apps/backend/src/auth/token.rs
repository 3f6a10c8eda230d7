//! Encrypted bearer tokens.
//!
//! A token is `v1.local.` followed by the base64url (no padding) encoding of
//! `nonce || ciphertext || tag`, sealed with ChaCha20-Poly1305 under the
//! process-wide [`TokenKey`]. The header string is bound as associated data.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, CHACHA20_POLY1305, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token lifetime: 24 hours.
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

const HEADER: &str = "v1.local.";
const TAG_LEN: usize = 16;
pub const KEY_LEN: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Serialising or sealing the claims failed.
    #[error("token encoding failed: {0}")]
    Encoding(String),
    /// Malformed token, failed authentication tag, or unparseable payload.
    #[error("invalid token")]
    Invalid,
    /// Key material could not be parsed.
    #[error("invalid token key: {0}")]
    Key(String),
}

/// Symmetric key used to seal and open tokens. Never printed.
#[derive(Clone)]
pub struct TokenKey([u8; KEY_LEN]);

impl TokenKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(raw: &str) -> Result<Self, TokenError> {
        let bytes = hex::decode(raw.trim()).map_err(|e| TokenError::Key(e.to_string()))?;
        let key: [u8; KEY_LEN] = bytes.try_into().map_err(|v: Vec<u8>| {
            TokenError::Key(format!("expected {KEY_LEN} bytes, got {}", v.len()))
        })?;
        Ok(Self(key))
    }

    /// Fresh random key from the OS CSPRNG.
    pub fn generate() -> Result<Self, TokenError> {
        let mut key = [0u8; KEY_LEN];
        SystemRandom::new()
            .fill(&mut key)
            .map_err(|_| TokenError::Key("system random source failed".to_string()))?;
        Ok(Self(key))
    }

    fn aead(&self) -> Result<LessSafeKey, TokenError> {
        let unbound = UnboundKey::new(&CHACHA20_POLY1305, &self.0)
            .map_err(|_| TokenError::Key("rejected by cipher".to_string()))?;
        Ok(LessSafeKey::new(unbound))
    }
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenKey(<redacted>)")
    }
}

/// Payload carried inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, string-encoded
    pub sub: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    pub fn for_user(user_id: i64, now: SystemTime) -> Result<Self, TokenError> {
        let iat = unix_secs(now).map_err(TokenError::Encoding)?;
        Ok(Self {
            sub: user_id.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        })
    }

    /// A token is expired once `exp` lies strictly before `now`.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        match unix_secs(now) {
            Ok(now) => self.exp < now,
            Err(_) => true,
        }
    }

    pub fn user_id(&self) -> Result<i64, std::num::ParseIntError> {
        self.sub.parse::<i64>()
    }
}

fn unix_secs(t: SystemTime) -> Result<i64, String> {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| "clock is before the unix epoch".to_string())
}

/// Issue a token for `user_id`, valid for [`TOKEN_TTL_SECS`] from `now`.
pub fn issue(key: &TokenKey, user_id: i64, now: SystemTime) -> Result<String, TokenError> {
    let claims = Claims::for_user(user_id, now)?;
    seal(key, &claims)
}

/// Seal arbitrary claims. Exposed so callers can mint tokens with custom times.
pub fn seal(key: &TokenKey, claims: &Claims) -> Result<String, TokenError> {
    let mut in_out =
        serde_json::to_vec(claims).map_err(|e| TokenError::Encoding(e.to_string()))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| TokenError::Encoding("nonce generation failed".to_string()))?;

    key.aead()
        .map_err(|e| TokenError::Encoding(e.to_string()))?
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::from(HEADER.as_bytes()),
            &mut in_out,
        )
        .map_err(|_| TokenError::Encoding("seal failed".to_string()))?;

    let mut body = Vec::with_capacity(NONCE_LEN + in_out.len());
    body.extend_from_slice(&nonce_bytes);
    body.extend_from_slice(&in_out);

    Ok(format!("{HEADER}{}", URL_SAFE_NO_PAD.encode(body)))
}

/// Decrypt and parse a token. Does not check expiry.
pub fn decode(key: &TokenKey, token: &str) -> Result<Claims, TokenError> {
    let encoded = token.strip_prefix(HEADER).ok_or(TokenError::Invalid)?;
    let mut body = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| TokenError::Invalid)?;
    if body.len() < NONCE_LEN + TAG_LEN {
        return Err(TokenError::Invalid);
    }

    let (nonce_bytes, sealed) = body.split_at_mut(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| TokenError::Invalid)?;
    let plain = key
        .aead()
        .map_err(|_| TokenError::Invalid)?
        .open_in_place(nonce, Aad::from(HEADER.as_bytes()), sealed)
        .map_err(|_| TokenError::Invalid)?;

    serde_json::from_slice::<Claims>(plain).map_err(|_| TokenError::Invalid)
}
