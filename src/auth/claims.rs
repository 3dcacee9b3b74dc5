//! Bearer token payload decoding.
//!
//! Tokens issued by the Research Tracker backend are three-part JWTs. The
//! client splits the token on `.` and base64url-decodes the middle segment to
//! read the claims. The signature is never checked here: the backend verifies
//! every request it receives, and the decoded claims only drive what the UI
//! displays and which tabs it offers. Nothing security-relevant may depend on
//! this decode.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User role as issued by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Pi,
    Member,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Pi => "PI",
            Role::Member => "MEMBER",
            Role::Viewer => "VIEWER",
        }
    }

    /// All roles the signup form offers, in display order.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Pi, Role::Member, Role::Viewer];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims decoded from a token payload.
///
/// `sub` is the username the backend expects as the "current user" on
/// ownership-tagged writes. `exp`/`iat` are unix seconds and are display
/// hints only; the session is never purged client-side on expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default, rename = "fullName")]
    pub full_name: Option<String>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Whether the token's `exp` claim is in the past. Informational only;
    /// the backend is what actually rejects a stale token.
    pub fn is_expired(&self) -> bool {
        self.exp.is_some_and(|exp| Utc::now().timestamp() >= exp)
    }
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token is not a three-part bearer credential")]
    Malformed,

    #[error("token payload is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("token payload is not a claims object: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Decode the claims from a bearer token without verifying its signature.
pub fn decode(token: &str) -> Result<Claims, TokenError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_header), Some(payload), Some(_signature), None) => payload,
        _ => return Err(TokenError::Malformed),
    };

    // Tolerate encoders that emit padded base64url.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        format!("{}.{}.sig", header, URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn test_decode_well_formed_token() {
        let token = token_with_payload(
            r#"{"sub":"u1","role":"ADMIN","exp":1900000000,"iat":1700000000,"fullName":"Ada Lovelace"}"#,
        );
        let claims = decode(&token).expect("decode failed");
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp, Some(1_900_000_000));
        assert_eq!(claims.full_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_decode_minimal_claims() {
        let token = token_with_payload(r#"{"sub":"viewer@lab.org","role":"VIEWER"}"#);
        let claims = decode(&token).expect("decode failed");
        assert_eq!(claims.sub, "viewer@lab.org");
        assert_eq!(claims.role, Role::Viewer);
        assert_eq!(claims.exp, None);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_decode_accepts_padded_payload() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#);
        let payload = base64::engine::general_purpose::URL_SAFE
            .encode(r#"{"sub":"u2","role":"PI"}"#);
        let claims = decode(&format!("{}.{}.x", header, payload)).expect("decode failed");
        assert_eq!(claims.role, Role::Pi);
    }

    #[test]
    fn test_decode_rejects_wrong_segment_count() {
        assert!(matches!(decode(""), Err(TokenError::Malformed)));
        assert!(matches!(decode("only-one-segment"), Err(TokenError::Malformed)));
        assert!(matches!(decode("two.segments"), Err(TokenError::Malformed)));
        assert!(matches!(decode("a.b.c.d"), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_decode_rejects_bad_encoding() {
        assert!(matches!(
            decode("h.!!not-base64url!!.s"),
            Err(TokenError::Encoding(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_claims_payload() {
        let token = token_with_payload(r#"["not","an","object"]"#);
        assert!(matches!(decode(&token), Err(TokenError::Payload(_))));

        let missing_role = token_with_payload(r#"{"sub":"u1"}"#);
        assert!(matches!(decode(&missing_role), Err(TokenError::Payload(_))));

        let unknown_role = token_with_payload(r#"{"sub":"u1","role":"SUPERUSER"}"#);
        assert!(matches!(decode(&unknown_role), Err(TokenError::Payload(_))));
    }

    #[test]
    fn test_is_expired() {
        let stale = token_with_payload(r#"{"sub":"u1","role":"MEMBER","exp":1000000000}"#);
        assert!(decode(&stale).unwrap().is_expired());

        let fresh = token_with_payload(r#"{"sub":"u1","role":"MEMBER","exp":33000000000}"#);
        assert!(!decode(&fresh).unwrap().is_expired());
    }

    #[test]
    fn test_role_wire_names() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }
}
