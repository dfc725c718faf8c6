//! Authentication extractors and identity verifier implementations.
//!
//! Two distinct capability sets, never the same authorization path:
//!
//! - [`AuthUser`] — end-user requests. The bearer credential is handed
//!   to the injected [`IdentityVerifier`]; the verified subject id is
//!   what the access gate compares against job ownership.
//! - [`EngineAuth`] — the analysis engine's transition contract. A
//!   dedicated shared credential (`ENGINE_TOKEN`), so no end-user token
//!   can ever drive a lifecycle transition.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use serde::Deserialize;
use tracing::debug;

use sentra_core::{Error, IdentityVerifier, Result, Subject};

use crate::error::ApiError;
use crate::AppState;

/// Pull the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Extractor for authenticated end-user requests.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub subject: Subject,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            ApiError::Unauthorized("Missing or invalid authorization header".to_string())
        })?;

        let subject = state
            .verifier
            .verify(token)
            .await
            .map_err(|err| match err {
                Error::Unauthenticated(_) => {
                    ApiError::Unauthorized("Invalid or expired token".to_string())
                }
                other => ApiError::from(other),
            })?;

        debug!(subject_id = %subject.subject_id, "User authenticated");
        Ok(AuthUser { subject })
    }
}

/// Extractor for the engine-facing mutation interface.
#[derive(Debug, Clone)]
pub struct EngineAuth;

#[axum::async_trait]
impl FromRequestParts<AppState> for EngineAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            ApiError::Unauthorized("Missing or invalid authorization header".to_string())
        })?;

        if state.engine_token.is_empty() || token != state.engine_token {
            return Err(ApiError::Unauthorized(
                "Invalid engine credential".to_string(),
            ));
        }

        Ok(EngineAuth)
    }
}

// =============================================================================
// IDENTITY VERIFIER IMPLEMENTATIONS
// =============================================================================

/// Identity verifier backed by a fixed token → subject table.
///
/// For local development and tests; configured from `AUTH_TOKENS`
/// (`token:subject` pairs, comma-separated).
#[derive(Clone, Debug, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Subject>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token for a subject id.
    pub fn with_token(mut self, token: impl Into<String>, subject_id: impl Into<String>) -> Self {
        self.tokens.insert(
            token.into(),
            Subject {
                subject_id: subject_id.into(),
                email: None,
                email_verified: None,
            },
        );
        self
    }

    /// Parse `token:subject` pairs from an `AUTH_TOKENS`-style value.
    pub fn from_spec(spec: &str) -> Result<Self> {
        let mut verifier = Self::new();
        for pair in spec.split(',').filter(|p| !p.trim().is_empty()) {
            let (token, subject) = pair.trim().split_once(':').ok_or_else(|| {
                Error::Config(format!("AUTH_TOKENS entry is not token:subject: {pair}"))
            })?;
            verifier = verifier.with_token(token, subject);
        }
        Ok(verifier)
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Subject> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| Error::Unauthenticated("unknown token".to_string()))
    }
}

/// Identity verifier calling an external identity-provider endpoint.
///
/// POSTs `{"token": ...}` and expects
/// `{"subjectId", "email"?, "emailVerified"?}` back. A rejection from
/// the provider is `Unauthenticated`; transport failures surface as
/// internal errors rather than being swallowed.
#[derive(Clone)]
pub struct HttpIdentityVerifier {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    subject_id: String,
    email: Option<String>,
    email_verified: Option<bool>,
}

impl HttpIdentityVerifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Subject> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .map_err(|e| Error::Internal(format!("identity provider unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Unauthenticated(
                "identity provider rejected the credential".to_string(),
            ));
        }

        let verified: VerifyResponse = response
            .json()
            .await
            .map_err(|e| Error::Internal(format!("malformed identity provider response: {e}")))?;

        Ok(Subject {
            subject_id: verified.subject_id,
            email: verified.email,
            email_verified: verified.email_verified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_verifier_known_token() {
        let verifier = StaticTokenVerifier::new().with_token("tok-1", "u1");
        let subject = verifier.verify("tok-1").await.unwrap();
        assert_eq!(subject.subject_id, "u1");
    }

    #[tokio::test]
    async fn test_static_verifier_unknown_token() {
        let verifier = StaticTokenVerifier::new().with_token("tok-1", "u1");
        let err = verifier.verify("tok-2").await.unwrap_err();
        assert!(matches!(err, Error::Unauthenticated(_)));
    }

    #[test]
    fn test_from_spec() {
        let verifier = StaticTokenVerifier::from_spec("tok-1:u1, tok-2:u2").unwrap();
        assert_eq!(verifier.tokens.len(), 2);
        assert_eq!(verifier.tokens["tok-2"].subject_id, "u2");
    }

    #[test]
    fn test_from_spec_rejects_malformed_entry() {
        let err = StaticTokenVerifier::from_spec("tok-without-subject").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_spec_empty_is_empty() {
        let verifier = StaticTokenVerifier::from_spec("").unwrap();
        assert!(verifier.tokens.is_empty());
    }
}
