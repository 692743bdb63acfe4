//! JWT codec for session token issuance and verification
//!
//! Session tokens are HS256-signed JWTs carrying the account identifier and
//! an absolute expiry. They are stateless: validity is decided entirely by
//! the signature and the expiry at verification time, and there is no
//! server-side revocation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Lifetime of every issued session token
pub const TOKEN_TTL: Duration = Duration::hours(24);

/// Signing secret used when `JWT_SECRET` is unset.
///
/// This is a publicly known value. Any deployment relying on it accepts
/// tokens forged by anyone who has read this source. Always set
/// `JWT_SECRET` outside local development.
pub const DEFAULT_JWT_SECRET: &str = "default-secret-key";

/// Token verification and issuance failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature does not match the configured secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token expiry is not after the verification instant
    #[error("Token expired")]
    Expired,

    /// Token could not be parsed or carries unexpected claims
    #[error("Malformed token")]
    Malformed,

    /// Token could not be signed
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// JWT configuration
#[derive(Clone)]
pub struct TokenConfig {
    /// Symmetric HS256 signing secret
    pub secret: String,
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: HS256 signing secret (default: [`DEFAULT_JWT_SECRET`])
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        Self { secret }
    }

    /// Whether the well-known fallback secret is in use
    pub fn uses_fallback_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("fallback", &self.uses_fallback_secret())
            .finish()
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub user_id: Uuid,
    /// Issued at time (UNIX seconds)
    pub iat: i64,
    /// Expiration time (UNIX seconds)
    pub exp: i64,
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Initialize a codec from its configuration
    pub fn new(config: &TokenConfig) -> Self {
        if config.uses_fallback_secret() {
            warn!(
                "JWT_SECRET is not set; signing session tokens with the built-in default secret. \
                 Tokens can be forged by anyone who knows it"
            );
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller-supplied instant in `verify`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `subject`, valid until `now + TOKEN_TTL`
    pub fn issue(&self, subject: Uuid, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            user_id: subject,
            iat: now.timestamp(),
            exp: (now + TOKEN_TTL).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token's signature and expiry and return its subject
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const URL_SAFE_ALPHABET: &str =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(&TokenConfig {
            secret: secret.to_string(),
        })
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    /// Flip one bit of the first base64 digit of the signature, which flips
    /// exactly one bit of the decoded signature bytes.
    fn flip_signature_bit(token: &str) -> String {
        let (message, signature) = token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = signature.chars().collect();
        let index = URL_SAFE_ALPHABET.find(chars[0]).unwrap();
        chars[0] = URL_SAFE_ALPHABET.as_bytes()[index ^ 1].into();
        format!("{}.{}", message, chars.into_iter().collect::<String>())
    }

    #[test]
    fn test_issue_then_verify_within_window() {
        let codec = codec("test-secret");
        let subject = Uuid::new_v4();
        let token = codec.issue(subject, issued_at()).unwrap();

        let just_before = issued_at() + Duration::hours(23) + Duration::minutes(59);
        assert_eq!(codec.verify(&token, just_before), Ok(subject));
        assert_eq!(codec.verify(&token, issued_at()), Ok(subject));
    }

    #[test]
    fn test_verify_after_window_is_expired() {
        let codec = codec("test-secret");
        let token = codec.issue(Uuid::new_v4(), issued_at()).unwrap();

        let just_after = issued_at() + Duration::hours(24) + Duration::minutes(1);
        assert_eq!(codec.verify(&token, just_after), Err(TokenError::Expired));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let codec = codec("test-secret");
        let token = codec.issue(Uuid::new_v4(), issued_at()).unwrap();

        assert_eq!(
            codec.verify(&token, issued_at() + TOKEN_TTL),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_single_bit_signature_flip_is_rejected() {
        let codec = codec("test-secret");
        let token = codec.issue(Uuid::new_v4(), issued_at()).unwrap();
        let tampered = flip_signature_bit(&token);

        assert_ne!(token, tampered);
        assert_eq!(
            codec.verify(&tampered, issued_at()),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_foreign_secret_is_invalid_signature() {
        let token = codec("someone-else").issue(Uuid::new_v4(), issued_at()).unwrap();

        assert_eq!(
            codec("test-secret").verify(&token, issued_at()),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_swapped_payload_is_invalid_signature() {
        let codec = codec("test-secret");
        let victim = codec.issue(Uuid::new_v4(), issued_at()).unwrap();
        let attacker = codec.issue(Uuid::new_v4(), issued_at()).unwrap();

        let victim_parts: Vec<&str> = victim.split('.').collect();
        let attacker_parts: Vec<&str> = attacker.split('.').collect();
        let forged = format!(
            "{}.{}.{}",
            attacker_parts[0], victim_parts[1], attacker_parts[2]
        );

        assert_eq!(
            codec.verify(&forged, issued_at()),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = codec("test-secret");

        assert_eq!(
            codec.verify("not-a-token", issued_at()),
            Err(TokenError::Malformed)
        );
        assert_eq!(codec.verify("", issued_at()), Err(TokenError::Malformed));
        assert_eq!(
            codec.verify("eyJhbGciOiJub25lIn0.e30.", issued_at()),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_other_algorithm_is_malformed() {
        let claims = Claims {
            user_id: Uuid::new_v4(),
            iat: issued_at().timestamp(),
            exp: (issued_at() + TOKEN_TTL).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(
            codec("test-secret").verify(&token, issued_at()),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_tokens_for_distinct_subjects_differ() {
        let codec = codec("test-secret");
        let a = codec.issue(Uuid::new_v4(), issued_at()).unwrap();
        let b = codec.issue(Uuid::new_v4(), issued_at()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    #[serial_test::serial]
    fn test_token_config_from_env() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
        assert!(TokenConfig::from_env().uses_fallback_secret());

        unsafe {
            std::env::set_var("JWT_SECRET", "");
        }
        assert!(TokenConfig::from_env().uses_fallback_secret());

        unsafe {
            std::env::set_var("JWT_SECRET", "from-the-environment");
        }
        let config = TokenConfig::from_env();
        assert_eq!(config.secret, "from-the-environment");
        assert!(!config.uses_fallback_secret());

        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
    }

    #[test]
    fn test_fallback_secret_detection() {
        let config = TokenConfig {
            secret: DEFAULT_JWT_SECRET.to_string(),
        };
        assert!(config.uses_fallback_secret());
        assert!(!format!("{:?}", config).contains(DEFAULT_JWT_SECRET));
    }
}
