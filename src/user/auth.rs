//! Password hashing and access/refresh token issuance.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod cliptube_argon2 {
    use anyhow::{anyhow, Result};
    use argon2::{
        password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
        Argon2,
    };

    #[cfg(feature = "test-fast-hasher")]
    fn argon2() -> Argon2<'static> {
        // Minimal cost parameters, only acceptable because nothing hashed in
        // tests is a real secret.
        let params = argon2::Params::new(8, 1, 1, None).expect("test hasher params");
        Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
    }

    #[cfg(not(feature = "test-fast-hasher"))]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }

    pub fn hash(plain: &[u8]) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash_string = argon2()
            .hash_password(plain, &salt)
            .map_err(|err| anyhow!("{}", err))?
            .to_string();
        Ok(hash_string)
    }

    pub fn verify(plain: &[u8], target_hash: &str) -> Result<bool> {
        let password_hash = PasswordHash::new(target_hash).map_err(|err| anyhow!("{}", err))?;
        Ok(argon2().verify_password(plain, &password_hash).is_ok())
    }
}

/// Hashes a plaintext password into a self-describing PHC string (salt included).
pub fn hash_password<T: AsRef<str>>(plain: T) -> Result<String> {
    cliptube_argon2::hash(plain.as_ref().as_bytes())
}

/// Verifies a plaintext password against a stored PHC string.
pub fn verify_password<T: AsRef<str>>(plain: T, target_hash: &str) -> Result<bool> {
    cliptube_argon2::verify(plain.as_ref().as_bytes(), target_hash)
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Claims {
    /// User id the token was issued for.
    pub sub: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("unexpected token kind")]
    WrongKind,
}

/// Issues and verifies the two classes of signed bearer tokens.
///
/// Access tokens are short-lived and verified on every protected request
/// without touching the database. Refresh tokens are long-lived, and the
/// issued value is additionally persisted on the user record so that rotation
/// invalidates the previous one.
#[derive(Clone)]
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl_minutes: i64,
        refresh_ttl_days: i64,
    ) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::days(refresh_ttl_days),
        }
    }

    pub fn issue_access(&self, user_id: &str) -> Result<String> {
        self.issue(user_id, TokenKind::Access)
    }

    pub fn issue_refresh(&self, user_id: &str) -> Result<String> {
        self.issue(user_id, TokenKind::Refresh)
    }

    fn issue(&self, user_id: &str, kind: TokenKind) -> Result<String> {
        let now = Utc::now();
        let (key, ttl) = match kind {
            TokenKind::Access => (&self.access_encoding, self.access_ttl),
            TokenKind::Refresh => (&self.refresh_encoding, self.refresh_ttl),
        };
        let claims = Claims {
            sub: user_id.to_owned(),
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, key)?)
    }

    /// Verifies signature, expiry and kind; returns the claims on success.
    pub fn verify(&self, token: &str, expected_kind: TokenKind) -> Result<Claims, TokenError> {
        let key = match expected_kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };
        let data = decode::<Claims>(token, key, &Validation::default()).map_err(|err| {
            match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        if data.claims.kind != expected_kind {
            return Err(TokenError::WrongKind);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> TokenService {
        TokenService::new("access-secret", "refresh-secret", 60, 10)
    }

    #[test]
    fn argon2_hash_roundtrip() {
        let hash = hash_password("123mypw").unwrap();

        assert!(verify_password("123mypw", &hash).unwrap());
        assert!(!verify_password("not the pw", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let hash1 = hash_password("123mypw").unwrap();
        let hash2 = hash_password("123mypw").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn access_token_roundtrip() {
        let service = test_service();
        let token = service.issue_access("user-1").unwrap();

        let claims = service.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let service = test_service();
        let token = service.issue_refresh("user-1").unwrap();

        // Different signing secret, so it fails verification outright.
        assert!(service.verify(&token, TokenKind::Access).is_err());
        assert!(service.verify(&token, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn kind_mismatch_is_rejected_with_shared_secret() {
        // Same secret for both kinds, so only the kind claim tells them apart.
        let service = TokenService::new("shared", "shared", 60, 10);
        let token = service.issue_refresh("user-1").unwrap();

        assert_eq!(
            service.verify(&token, TokenKind::Access),
            Err(TokenError::WrongKind)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = TokenService::new("access-secret", "refresh-secret", -5, 10);
        let token = service.issue_access("user-1").unwrap();

        assert_eq!(
            service.verify(&token, TokenKind::Access),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = test_service();
        let mut token = service.issue_access("user-1").unwrap();
        token.push('x');

        assert_eq!(
            service.verify(&token, TokenKind::Access),
            Err(TokenError::Invalid)
        );
    }
}
