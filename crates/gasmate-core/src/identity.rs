//! Identity verification seam.
//!
//! The pipeline only ever sees a bearer credential and asks an injected
//! [`IdentityVerifier`] which account it belongs to.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// The account a credential was issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub account_id: String,
}

impl VerifiedIdentity {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
        }
    }
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolve a raw credential to an identity, or fail with `Unauthorized`.
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity>;
}

/// Verify an optional credential; a missing one is `Unauthorized`.
pub async fn verify_credential(
    verifier: &dyn IdentityVerifier,
    credential: Option<&str>,
) -> Result<VerifiedIdentity> {
    match credential.map(str::trim).filter(|c| !c.is_empty()) {
        Some(credential) => verifier.verify(credential).await,
        None => Err(Error::Unauthorized("No ID token provided".into())),
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let header = header?.trim();
    let (scheme, token) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}

/// Verifier backed by a fixed token-to-account table.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityVerifier {
    tokens: HashMap<String, String>,
}

impl StaticIdentityVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, account_id: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), account_id.into());
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity> {
        self.tokens
            .get(credential)
            .map(VerifiedIdentity::new)
            .ok_or_else(|| Error::Unauthorized("Invalid ID token".into()))
    }
}
