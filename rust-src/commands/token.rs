//! Token command - mint a signed bearer token for development.

use anyhow::{bail, Result};

use crate::auth::HmacTokenVerifier;


/// Print a token for `uid` that the server will accept.
pub fn run(secret: &str, uid: &str, email: Option<&str>, ttl_secs: i64) -> Result<()> {
    if uid.trim().is_empty() {
        bail!("uid cannot be empty");
    }
    if ttl_secs <= 0 {
        bail!("ttl must be positive, got {ttl_secs}");
    }

    let verifier = HmacTokenVerifier::new(secret)?;
    let token = verifier.issue(uid.trim(), email.map(str::trim), ttl_secs)?;

    println!("{token}");
    Ok(())
}
