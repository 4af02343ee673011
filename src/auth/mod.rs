//! Identity gate.
//!
//! The caller's email is read from a request header that an upstream login
//! flow is trusted to have set. Nothing here is cryptographic: a client that
//! can reach the server directly can claim any identity.

use std::{
    fmt,
    sync::{Arc, LazyLock},
};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, HeaderName, header::InvalidHeaderName, request::Parts},
    middleware::Next,
    response::Response,
};
use regex::Regex;

use crate::error::ApiError;

pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-email";

// RFC 5321 path limit.
const MAX_EMAIL_LEN: usize = 254;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is valid")
});

/// Verified, normalized email of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    /// Trims and lower-cases `raw`, then checks it is shaped like an email.
    pub fn parse(raw: &str) -> Option<Self> {
        let email = raw.trim().to_lowercase();
        if email.len() > MAX_EMAIL_LEN || !EMAIL_PATTERN.is_match(&email) {
            return None;
        }
        Some(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handlers take the identity as an argument; it is only present once
/// [`require_identity`] has run for the request.
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

#[derive(Debug, Clone)]
pub struct IdentityGate {
    header: HeaderName,
}

impl IdentityGate {
    pub fn new(header: &str) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            header: HeaderName::try_from(header)?,
        })
    }

    pub fn identify(&self, headers: &HeaderMap) -> Result<CallerIdentity, ApiError> {
        let Some(value) = headers.get(&self.header) else {
            tracing::debug!("rejecting request without {} header", self.header);
            return Err(ApiError::Unauthorized);
        };

        value
            .to_str()
            .ok()
            .and_then(CallerIdentity::parse)
            .ok_or_else(|| {
                tracing::debug!("rejecting request with malformed {} header", self.header);
                ApiError::Unauthorized
            })
    }
}

impl Default for IdentityGate {
    fn default() -> Self {
        Self {
            header: HeaderName::from_static(DEFAULT_IDENTITY_HEADER),
        }
    }
}

/// Middleware that halts the request with 401 unless it carries a valid
/// identity, which is then stored in the request extensions.
pub async fn require_identity(
    State(gate): State<Arc<IdentityGate>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = gate.identify(request.headers())?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: &'static str, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn accepts_and_normalizes_email() {
        let identity = CallerIdentity::parse("  Alice@Example.COM ").unwrap();
        assert_eq!(identity.as_str(), "alice@example.com");

        assert!(CallerIdentity::parse("a.b+tag@mail.x.co").is_some());
    }

    #[test]
    fn rejects_malformed_email() {
        for raw in [
            "",
            "   ",
            "alice",
            "alice@",
            "@example.com",
            "alice@example",
            "alice@@example.com",
            "al ice@example.com",
            "alice@example..com",
            "alice@.com",
            "alice@example.com.",
        ] {
            assert!(CallerIdentity::parse(raw).is_none(), "accepted {raw:?}");
        }
    }

    #[test]
    fn rejects_overlong_email() {
        let raw = format!("{}@example.com", "a".repeat(MAX_EMAIL_LEN));
        assert!(CallerIdentity::parse(&raw).is_none());
    }

    #[test]
    fn gate_reads_configured_header() {
        let gate = IdentityGate::new("x-forwarded-email").unwrap();

        let identity = gate
            .identify(&headers("x-forwarded-email", "a@x.com"))
            .unwrap();
        assert_eq!(identity.as_str(), "a@x.com");

        assert!(matches!(
            gate.identify(&headers(DEFAULT_IDENTITY_HEADER, "a@x.com")),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn gate_rejects_missing_and_malformed() {
        let gate = IdentityGate::default();
        assert!(gate.identify(&HeaderMap::new()).is_err());
        assert!(
            gate.identify(&headers(DEFAULT_IDENTITY_HEADER, "not-an-email"))
                .is_err()
        );
    }

    #[test]
    fn invalid_header_name_is_reported() {
        assert!(IdentityGate::new("bad header").is_err());
    }
}
