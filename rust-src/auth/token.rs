//! HMAC-signed bearer tokens.
//!
//! A token is `base32(claims_json) "." base32(hmac_sha256(secret, first_part))`,
//! where the claims are `{uid, email?, exp}` and `exp` is in unix seconds.

use base32::Alphabet;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;


type HmacSha256 = Hmac<Sha256>;


fn alphabet() -> Alphabet {
    Alphabet::RFC4648 { padding: false }
}


/// Who is calling, as asserted by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
}


#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Bearer token")]
    MissingToken,

    #[error("malformed token")]
    Malformed,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("invalid signing key: {0}")]
    Key(String),
}


/// Checks bearer tokens on behalf of the identity provider.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}


#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    exp: i64,
}


/// Token verifier and issuer sharing one HMAC secret.
pub struct HmacTokenVerifier {
    secret: Vec<u8>,
}


impl HmacTokenVerifier {
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::Key("secret cannot be empty".to_string()));
        }
        Ok(Self {
            secret: secret.as_bytes().to_vec(),
        })
    }

    /// Mint a token for `uid` valid for `ttl_secs` seconds from now.
    pub fn issue(&self, uid: &str, email: Option<&str>, ttl_secs: i64) -> Result<String, AuthError> {
        self.issue_at(uid, email, Utc::now().timestamp() + ttl_secs)
    }

    fn issue_at(&self, uid: &str, email: Option<&str>, exp: i64) -> Result<String, AuthError> {
        let claims = Claims {
            uid: uid.to_string(),
            email: email.map(String::from),
            exp,
        };
        let json = serde_json::to_vec(&claims).map_err(|_| AuthError::Malformed)?;
        let payload = base32::encode(alphabet(), &json);
        let signature = base32::encode(alphabet(), &self.sign(payload.as_bytes())?);
        Ok(format!("{payload}.{signature}"))
    }

    /// Verify against an explicit clock, in unix seconds.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Identity, AuthError> {
        let (payload, signature) = token.trim().split_once('.').ok_or(AuthError::Malformed)?;
        let signature = base32::decode(alphabet(), signature).ok_or(AuthError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::BadSignature)?;

        let json = base32::decode(alphabet(), payload).ok_or(AuthError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| AuthError::Malformed)?;

        if claims.exp <= now {
            return Err(AuthError::Expired);
        }
        if claims.uid.is_empty() {
            return Err(AuthError::Malformed);
        }

        Ok(Identity {
            uid: claims.uid,
            email: claims.email,
        })
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| AuthError::Key(e.to_string()))
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut mac = self.mac()?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}


impl TokenVerifier for HmacTokenVerifier {
    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }
}


/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}


#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_750_000_000;

    fn verifier() -> HmacTokenVerifier {
        HmacTokenVerifier::new("test-secret").unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let v = verifier();
        let token = v.issue_at("user-1", Some("Alice@Example.com"), NOW + 60).unwrap();

        let identity = v.verify_at(&token, NOW).unwrap();
        assert_eq!(identity.uid, "user-1");
        assert_eq!(identity.email.as_deref(), Some("Alice@Example.com"));
    }

    #[test]
    fn test_token_without_email() {
        let v = verifier();
        let token = v.issue_at("anon", None, NOW + 60).unwrap();
        assert_eq!(v.verify_at(&token, NOW).unwrap().email, None);
    }

    #[test]
    fn test_expired_token_rejected() {
        let v = verifier();
        let token = v.issue_at("user-1", None, NOW).unwrap();
        assert_eq!(v.verify_at(&token, NOW), Err(AuthError::Expired));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let v = verifier();
        let token = v.issue_at("user-1", None, NOW + 60).unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged_claims = br#"{"uid":"admin","exp":9999999999}"#;
        let forged = format!("{}.{}", base32::encode(alphabet(), forged_claims), signature);
        assert_eq!(v.verify_at(&forged, NOW), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = verifier().issue_at("user-1", None, NOW + 60).unwrap();
        let other = HmacTokenVerifier::new("another-secret").unwrap();
        assert_eq!(other.verify_at(&token, NOW), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_garbage_rejected() {
        let v = verifier();
        assert_eq!(v.verify_at("no-dot-here", NOW), Err(AuthError::Malformed));
        assert_eq!(v.verify_at("abc.!!!", NOW), Err(AuthError::Malformed));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(HmacTokenVerifier::new("  ").is_err());
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Ok("abc.def"));
        assert_eq!(bearer_token(Some("Bearer ")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("Basic abc")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(None), Err(AuthError::MissingToken));
    }
}
