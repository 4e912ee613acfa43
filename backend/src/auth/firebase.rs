//! Firebase bearer-token verification
//!
//! Incoming JWTs are validated against the RS256 signing keys Google
//! publishes for `securetoken@system.gserviceaccount.com`. Issuer and
//! audience are both pinned to the configured Firebase project and token
//! lifetime is enforced; no custom claims are checked.
//!
//! Keys are cached by `kid` and refreshed on a cache miss, with a minimum
//! interval between fetches so a burst of bad tokens cannot hammer the
//! key endpoint.

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Google's JWKS endpoint for Firebase ID-token signing keys
const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Minimum interval between JWKS fetches
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Token verification errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token header has no key ID")]
    MissingKeyId,

    #[error("Unknown signing key: {0}")]
    UnknownKeyId(String),

    #[error("Token has expired")]
    Expired,

    #[error("Token audience does not match the configured project")]
    InvalidAudience,

    #[error("Token issuer does not match the configured project")]
    InvalidIssuer,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(#[from] reqwest::Error),
}

/// Claims carried by a Firebase ID token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseClaims {
    /// Firebase UID of the authenticated user
    pub sub: String,
    /// Audience, equal to the Firebase project name
    pub aud: String,
    /// Issuer, `https://securetoken.google.com/{project}`
    pub iss: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Cached signing keys, indexed by `kid`
#[derive(Default)]
struct KeyCache {
    keys: HashMap<String, DecodingKey>,
    last_refresh: Option<Instant>,
}

/// Verifier for Firebase-issued bearer tokens
///
/// Construct once at startup and share via `AppState`; cloning is cheap
/// since the key cache sits behind an `Arc`.
#[derive(Clone)]
pub struct FirebaseTokenVerifier {
    project: String,
    issuer: String,
    jwks_url: String,
    http: reqwest::Client,
    cache: Arc<RwLock<KeyCache>>,
}

impl FirebaseTokenVerifier {
    /// Create a verifier pinned to a Firebase project
    pub fn new(project: &str) -> Self {
        Self::with_jwks_url(project, GOOGLE_JWKS_URL)
    }

    /// Create a verifier fetching keys from a custom JWKS URL
    ///
    /// Used by tests to point the verifier at a local mock server.
    pub fn with_jwks_url(project: &str, jwks_url: &str) -> Self {
        Self {
            project: project.to_string(),
            issuer: format!("https://securetoken.google.com/{}", project),
            jwks_url: jwks_url.to_string(),
            http: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(KeyCache::default())),
        }
    }

    /// Verify a bearer token and return its claims
    pub async fn verify(&self, token: &str) -> Result<FirebaseClaims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::Malformed)?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project]);
        validation.set_issuer(&[&self.issuer]);

        let token_data =
            decode::<FirebaseClaims>(token, &key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                _ => AuthError::Invalid(e.to_string()),
            })?;

        if token_data.claims.sub.is_empty() {
            return Err(AuthError::Invalid("Token has an empty subject".to_string()));
        }

        Ok(token_data.claims)
    }

    /// Look up the decoding key for a `kid`, refreshing the cache on a miss
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.cache.read().await.keys.get(kid) {
            return Ok(key.clone());
        }

        self.refresh_keys().await?;

        self.cache
            .read()
            .await
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::UnknownKeyId(kid.to_string()))
    }

    /// Fetch the JWKS and rebuild the key cache
    ///
    /// Skipped when the last fetch was within `MIN_REFRESH_INTERVAL`.
    async fn refresh_keys(&self) -> Result<(), AuthError> {
        let mut cache = self.cache.write().await;

        if let Some(last) = cache.last_refresh {
            if last.elapsed() < MIN_REFRESH_INTERVAL {
                debug!("Skipping JWKS refresh, last fetch was too recent");
                return Ok(());
            }
        }

        let jwks: JwkSet = self
            .http
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut keys = HashMap::new();
        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                continue;
            };
            if let Ok(key) = DecodingKey::from_jwk(jwk) {
                keys.insert(kid, key);
            }
        }

        info!(key_count = keys.len(), "Refreshed Firebase signing keys");
        cache.keys = keys;
        cache.last_refresh = Some(Instant::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_PROJECT: &str = "cbs-test";
    const TEST_KID: &str = "cbs-test-key";
    const TEST_PRIVATE_KEY: &str = include_str!("../../tests/fixtures/rs256_private.pem");
    const TEST_JWKS: &str = include_str!("../../tests/fixtures/jwks.json");

    fn claims(project: &str) -> FirebaseClaims {
        let now = Utc::now();
        FirebaseClaims {
            sub: "firebase-uid-1".to_string(),
            aud: project.to_string(),
            iss: format!("https://securetoken.google.com/{}", project),
            exp: (now + ChronoDuration::hours(1)).timestamp(),
            iat: now.timestamp(),
        }
    }

    fn mint_token(claims: &FirebaseClaims, kid: Option<&str>) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = kid.map(String::from);
        let key = EncodingKey::from_rsa_pem(TEST_PRIVATE_KEY.as_bytes()).unwrap();
        encode(&header, claims, &key).unwrap()
    }

    async fn jwks_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(TEST_JWKS, "application/json"),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_valid_token_accepted() {
        let server = jwks_server().await;
        let verifier = FirebaseTokenVerifier::with_jwks_url(TEST_PROJECT, &server.uri());

        let token = mint_token(&claims(TEST_PROJECT), Some(TEST_KID));
        let verified = verifier.verify(&token).await.unwrap();

        assert_eq!(verified.sub, "firebase-uid-1");
        assert_eq!(verified.aud, TEST_PROJECT);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let server = jwks_server().await;
        let verifier = FirebaseTokenVerifier::with_jwks_url(TEST_PROJECT, &server.uri());

        let mut expired = claims(TEST_PROJECT);
        expired.exp = (Utc::now() - ChronoDuration::hours(2)).timestamp();
        expired.iat = (Utc::now() - ChronoDuration::hours(3)).timestamp();

        let token = mint_token(&expired, Some(TEST_KID));
        let result = verifier.verify(&token).await;

        assert!(matches!(result, Err(AuthError::Expired)));
    }

    #[tokio::test]
    async fn test_wrong_audience_rejected() {
        let server = jwks_server().await;
        let verifier = FirebaseTokenVerifier::with_jwks_url(TEST_PROJECT, &server.uri());

        let mut wrong = claims(TEST_PROJECT);
        wrong.aud = "some-other-project".to_string();

        let token = mint_token(&wrong, Some(TEST_KID));
        let result = verifier.verify(&token).await;

        assert!(matches!(result, Err(AuthError::InvalidAudience)));
    }

    #[tokio::test]
    async fn test_wrong_issuer_rejected() {
        let server = jwks_server().await;
        let verifier = FirebaseTokenVerifier::with_jwks_url(TEST_PROJECT, &server.uri());

        let mut wrong = claims(TEST_PROJECT);
        wrong.iss = "https://securetoken.google.com/some-other-project".to_string();

        let token = mint_token(&wrong, Some(TEST_KID));
        let result = verifier.verify(&token).await;

        assert!(matches!(result, Err(AuthError::InvalidIssuer)));
    }

    #[tokio::test]
    async fn test_unknown_kid_rejected() {
        let server = jwks_server().await;
        let verifier = FirebaseTokenVerifier::with_jwks_url(TEST_PROJECT, &server.uri());

        let token = mint_token(&claims(TEST_PROJECT), Some("rotated-away"));
        let result = verifier.verify(&token).await;

        assert!(matches!(result, Err(AuthError::UnknownKeyId(_))));
    }

    #[tokio::test]
    async fn test_token_without_kid_rejected() {
        let server = jwks_server().await;
        let verifier = FirebaseTokenVerifier::with_jwks_url(TEST_PROJECT, &server.uri());

        let token = mint_token(&claims(TEST_PROJECT), None);
        let result = verifier.verify(&token).await;

        assert!(matches!(result, Err(AuthError::MissingKeyId)));
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let server = jwks_server().await;
        let verifier = FirebaseTokenVerifier::with_jwks_url(TEST_PROJECT, &server.uri());

        let result = verifier.verify("not.a.token").await;

        assert!(matches!(result, Err(AuthError::Malformed)));
    }

    #[tokio::test]
    async fn test_keys_are_cached_between_verifications() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(TEST_JWKS, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let verifier = FirebaseTokenVerifier::with_jwks_url(TEST_PROJECT, &server.uri());

        let token = mint_token(&claims(TEST_PROJECT), Some(TEST_KID));
        verifier.verify(&token).await.unwrap();
        verifier.verify(&token).await.unwrap();
        // The mock's expect(1) verifies the second call hit the cache
    }

    #[tokio::test]
    async fn test_key_endpoint_failure_surfaces_as_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let verifier = FirebaseTokenVerifier::with_jwks_url(TEST_PROJECT, &server.uri());
        let token = mint_token(&claims(TEST_PROJECT), Some(TEST_KID));
        let result = verifier.verify(&token).await;

        assert!(matches!(result, Err(AuthError::KeyFetch(_))));
    }
}
