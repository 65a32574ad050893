//! Signed identity tokens.
//!
//! A token is `base64url(json {uid, exp})` and `base64url(HMAC-SHA256)` of
//! that payload, joined by a dot. `exp` is a unix timestamp in seconds.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use gasmate_core::{Error, IdentityVerifier, Result, VerifiedIdentity};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    uid: String,
    exp: i64,
}

#[derive(Clone)]
pub struct HmacIdentityVerifier {
    secret: Vec<u8>,
}

impl HmacIdentityVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Use the configured secret, or a random one when none is set.
    ///
    /// Tokens signed with a random secret stop verifying after a restart.
    pub fn from_secret_or_generate(secret: Option<&str>) -> Self {
        match secret.filter(|s| !s.is_empty()) {
            Some(secret) => Self::new(secret),
            None => {
                warn!(
                    category = "auth",
                    "No identity secret configured, using a random one (tokens are invalid on restart)"
                );
                Self::generate_random()
            }
        }
    }

    fn generate_random() -> Self {
        let mut secret = Vec::with_capacity(32);
        secret.extend_from_slice(uuid::Uuid::new_v4().as_bytes());
        secret.extend_from_slice(uuid::Uuid::new_v4().as_bytes());
        Self { secret }
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| Error::Unauthorized(format!("Invalid identity secret: {}", e)))
    }

    /// Issue a token for `account_id` that expires after `ttl`.
    pub fn issue(&self, account_id: &str, ttl: Duration) -> Result<String> {
        if account_id.trim().is_empty() {
            return Err(Error::Validation("Account id is required".into()));
        }
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| Error::Validation("Token lifetime is out of range".into()))?;
        let claims = TokenClaims {
            uid: account_id.to_string(),
            exp: expires_at.timestamp(),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", payload, signature))
    }

    fn decode(&self, token: &str) -> Result<TokenClaims> {
        let invalid = || Error::Unauthorized("Invalid ID token".into());

        let (payload, signature) = token.split_once('.').ok_or_else(invalid)?;
        let signature = URL_SAFE_NO_PAD.decode(signature).map_err(|_| invalid())?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        let json = URL_SAFE_NO_PAD.decode(payload).map_err(|_| invalid())?;
        let claims: TokenClaims = serde_json::from_slice(&json).map_err(|_| invalid())?;

        if claims.uid.is_empty() {
            return Err(invalid());
        }
        if claims.exp <= Utc::now().timestamp() {
            return Err(Error::Unauthorized("ID token has expired".into()));
        }
        Ok(claims)
    }
}

#[async_trait]
impl IdentityVerifier for HmacIdentityVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity> {
        let claims = self.decode(credential)?;
        Ok(VerifiedIdentity::new(claims.uid))
    }
}
