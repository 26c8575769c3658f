//! Authentication: bearer tokens and caller identity.

mod token;

#[allow(unused_imports)]
pub use token::{bearer_token, AuthError, HmacTokenVerifier, Identity, TokenVerifier};


/// Canonical form of an email for editor lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
