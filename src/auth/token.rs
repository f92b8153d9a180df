//! Best-effort inspection of bearer tokens.
//!
//! Tokens are opaque to the client. When one happens to be a JWT carrying an
//! `exp` claim, the session store uses it to skip a round trip for a token
//! that is already expired. Signatures are never checked here; the server
//! stays the only authority.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Expiry encoded in the token, if it is a JWT with an `exp` claim
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    Utc.timestamp_opt(data.claims.exp?, 0).single()
}

/// True only when the token states an expiry that has passed
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    token_expiry(token).is_some_and(|exp| exp <= now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: i64,
    }

    fn jwt(exp: i64) -> String {
        encode(
            &Header::default(),
            &TestClaims {
                sub: "user-1".into(),
                exp,
            },
            &EncodingKey::from_secret(b"server-secret"),
        )
        .unwrap()
    }

    #[test]
    fn reads_expiry_without_the_secret() {
        let now = Utc::now();
        let token = jwt((now + Duration::hours(24)).timestamp());
        assert!(!is_expired(&token, now));
        assert_eq!(
            token_expiry(&token).map(|exp| exp.timestamp()),
            Some((now + Duration::hours(24)).timestamp())
        );

        let stale = jwt((now - Duration::hours(1)).timestamp());
        assert!(is_expired(&stale, now));
    }

    #[test]
    fn opaque_tokens_never_count_as_expired() {
        assert_eq!(token_expiry("not-a-jwt"), None);
        assert!(!is_expired("not-a-jwt", Utc::now()));
    }
}
