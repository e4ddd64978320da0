use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT encoder/decoder bound to a signing secret.
///
/// Uses HS256. Tokens are opaque bearer strings to every caller; only this
/// handler can mint or validate them.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new handler with a secret key.
    ///
    /// The secret comes from configuration and should be at least 32 bytes
    /// for HS256. It must never be hardcoded in a shipped build.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode a token, checking signature integrity and expiry.
    ///
    /// Expiry is validated with zero leeway: a token presented exactly at or
    /// after its `exp` timestamp fails.
    ///
    /// # Errors
    /// * `TokenExpired` - The `exp` claim is in the past
    /// * `InvalidToken` - Bad signature, malformed token, or claim mismatch
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        // Tokens without an `exp` claim are accepted; expiry is enforced when present
        validation.required_spec_claims.clear();

        let token_data = decode::<serde_json::Value>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::InvalidToken(e.to_string()),
            })?;

        // The library only rejects an `exp` strictly in the past; the boundary
        // second itself must also fail
        if let Some(exp) = token_data.claims.get("exp").and_then(|v| v.as_i64()) {
            if exp <= Utc::now().timestamp() {
                return Err(JwtError::TokenExpired);
            }
        }

        serde_json::from_value(token_data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}
