//! Bearer token issuance and verification.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::storage::User;

/// Claims embedded in every issued token: the full stored record at time of
/// issuance plus `iat`. There is no expiry claim and no revocation; a token
/// stays valid under the signing secret even after the record changes.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub name: String,
    pub email: String,
    /// Stored password hash; carried for record-snapshot parity, never a
    /// plaintext secret
    pub password: String,
    pub level: i64,
    pub iat: i64,
}

impl Claims {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            level: user.level,
            iat: chrono::Utc::now().timestamp(),
        }
    }
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a new token service with the given secret
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Signature-only verification: tokens carry no expiry to validate.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token embedding the given claims
    pub fn issue(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| Error::internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token's signature and decode its claims.
    ///
    /// A verified token without a `level` claim is rejected: the gateway
    /// treats the authorization tier as mandatory.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<serde_json::Value>(token, &self.decoding_key, &self.validation)
            .map_err(|e| Error::invalid_token(format!("Token verification failed: {}", e)))?;

        if data.claims.get("level").is_none() {
            return Err(Error::invalid_token("No level claim in decoded token"));
        }

        serde_json::from_value(data.claims)
            .map_err(|e| Error::invalid_token(format!("Malformed token claims: {}", e)))
    }
}
