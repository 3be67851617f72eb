//! Bearer token verification. Token issuance lives in the identity service; this
//! crate only checks what callers present.

use crate::error::AuthError;
use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

/// Identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub subject: String,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Accepts every token. For tests and explicitly unauthenticated deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl TokenVerifier for AllowAll {
    async fn verify(&self, _token: &str) -> Result<Claims, AuthError> {
        Ok(Claims {
            subject: "anonymous".into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct JwtClaims {
    sub: Option<String>,
}

/// HS256 JWT verifier with a shared secret; `exp` is enforced.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let data = decode::<JwtClaims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::warn!(err = %e, "token validation failed");
            AuthError::InvalidToken(e.to_string())
        })?;
        Ok(Claims {
            subject: data.claims.sub.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: usize,
    }

    fn token(secret: &str, exp_offset_secs: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset_secs) as usize;
        let claims = TestClaims { sub: "staff-7".into(), exp };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let verifier = JwtVerifier::new("secret");
        let claims = verifier.verify(&token("secret", 3600)).await.unwrap();
        assert_eq!(claims.subject, "staff-7");
    }

    #[tokio::test]
    async fn rejects_wrong_secret_expired_and_empty() {
        let verifier = JwtVerifier::new("secret");
        assert!(matches!(
            verifier.verify(&token("other", 3600)).await,
            Err(AuthError::InvalidToken(_))
        ));
        assert!(matches!(
            verifier.verify(&token("secret", -3600)).await,
            Err(AuthError::InvalidToken(_))
        ));
        assert!(matches!(verifier.verify("").await, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn token_without_expiry_is_rejected() {
        #[derive(Serialize)]
        struct NoExpiry {
            sub: String,
        }
        let raw = encode(
            &Header::default(),
            &NoExpiry { sub: "staff-7".into() },
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(matches!(
            JwtVerifier::new("secret").verify(&raw).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn allow_all_accepts_anything() {
        assert!(AllowAll.verify("").await.is_ok());
    }
}
