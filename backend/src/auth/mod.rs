//! Authentication module
//!
//! Token issuance is delegated entirely to Firebase; this module only
//! verifies incoming bearer tokens against the configured project and
//! resolves the service-account credentials at startup.

mod credentials;
mod firebase;
mod middleware;

pub use credentials::{CredentialSource, ServiceAccount};
pub use firebase::{AuthError, FirebaseClaims, FirebaseTokenVerifier};
pub use middleware::AuthUser;
