use std::time::Duration;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::Deserialize;

/// base64url as used by JWT segments, tolerating optional padding.
const SEGMENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has no payload segment")]
    MissingPayload,
    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid claims json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Claims read from a bearer token. The signature is never checked here;
/// the backend does that on every request.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TokenClaims {
    /// Expiry in seconds since the epoch. Some issuers emit fractions.
    pub exp: f64,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl TokenClaims {
    pub fn expires_at_millis(&self) -> i64 {
        (self.exp * 1000.0) as i64
    }

    pub fn expires_at_seconds(&self) -> i64 {
        self.exp.floor() as i64
    }

    pub fn is_valid_at(&self, nowMillis: i64) -> bool {
        nowMillis < self.expires_at_millis()
    }

    /// Time left before expiry, `None` once expired.
    pub fn remaining(&self, nowMillis: i64) -> Option<Duration> {
        let left = self.expires_at_millis().saturating_sub(nowMillis);
        (left > 0).then(|| Duration::from_millis(left as u64))
    }
}

pub fn decode(token: &str) -> Result<TokenClaims, TokenError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or(TokenError::MissingPayload)?;
    let bytes = SEGMENT.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
pub(crate) fn encode_for_test(claims: &serde_json::Value) -> String {
    let header = SEGMENT.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = SEGMENT.encode(claims.to_string().as_bytes());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}
