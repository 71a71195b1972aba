//! Signed auth token verification.
//!
//! Tokens are issued by the external identity collaborator; this module
//! implements the verification half plus a small issuer used by tests and
//! the dev server. Format: `base64(payload-json) "." base64(sha256(secret
//! "." payload-b64))` with a JSON payload of user id, display name and
//! expiry.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::common::time::Clock;
use crate::domain::{AuthError, Principal, TokenVerifier, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    user_id: String,
    name: String,
    expires_at_millis: i64,
}

/// Verifies signed tokens against a shared secret.
pub struct SignedTokenVerifier {
    secret: String,
    clock: Arc<dyn Clock>,
}

impl SignedTokenVerifier {
    /// Create a verifier for the given shared secret.
    pub fn new(secret: String, clock: Arc<dyn Clock>) -> Self {
        Self { secret, clock }
    }
}

fn sign(secret: &str, payload_b64: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b".");
    hasher.update(payload_b64.as_bytes());
    BASE64.encode(hasher.finalize())
}

/// Issue a signed token for a principal, expiring at the given UTC
/// millisecond timestamp.
///
/// Identity issuance proper lives with the external collaborator; this
/// exists for the dev server and for tests.
pub fn issue_token(secret: &str, principal: &Principal, expires_at_millis: i64) -> String {
    let payload = TokenPayload {
        user_id: principal.user_id.as_str().to_string(),
        name: principal.name.clone(),
        expires_at_millis,
    };
    let payload_b64 = BASE64.encode(serde_json::to_vec(&payload).unwrap_or_default());
    let signature = sign(secret, &payload_b64);
    format!("{payload_b64}.{signature}")
}

impl TokenVerifier for SignedTokenVerifier {
    fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let (payload_b64, signature) = token
            .split_once('.')
            .ok_or(AuthError::MalformedToken)?;

        if sign(&self.secret, payload_b64) != signature {
            return Err(AuthError::InvalidSignature);
        }

        let payload_bytes = BASE64
            .decode(payload_b64)
            .map_err(|_| AuthError::MalformedToken)?;
        let payload: TokenPayload =
            serde_json::from_slice(&payload_bytes).map_err(|_| AuthError::MalformedToken)?;

        if payload.expires_at_millis <= self.clock.now_utc_millis() {
            return Err(AuthError::Expired {
                expired_at_millis: payload.expires_at_millis,
            });
        }

        let user_id =
            UserId::new(payload.user_id).map_err(|_| AuthError::MalformedToken)?;
        Ok(Principal {
            user_id,
            name: payload.name,
        })
    }
}
