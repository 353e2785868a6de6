//! Session token issuance.
//!
//! SECURITY: every login failure is `InvalidCredentials` and costs one full
//! Argon2 verification, whether or not the email is known.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use account_service_lib::AccountRepository;
use common::{AppError, AppResult, JwtConfig};
use domain::{Password, TOKEN_TYPE_BEARER};

use super::registration::normalize_email;
use crate::security::generate_token;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Verifies credentials and mints session tokens.
pub struct SessionIssuer {
    accounts: Arc<dyn AccountRepository>,
    jwt: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Verified against when the email is unknown
    dummy_hash: Password,
}

impl SessionIssuer {
    pub fn new(accounts: Arc<dyn AccountRepository>, jwt: JwtConfig) -> AppResult<Self> {
        jwt.validate()?;

        // Same algorithm and parameters as real credentials, so both
        // failure paths take equally long
        let dummy_hash = Password::new(&generate_token(16))?;

        Ok(Self {
            accounts,
            encoding_key: EncodingKey::from_secret(jwt.secret_bytes()),
            decoding_key: DecodingKey::from_secret(jwt.secret_bytes()),
            jwt,
            dummy_hash,
        })
    }

    /// Exchange email and password for a signed token.
    pub async fn issue(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        let email = normalize_email(email);
        let account = self.accounts.get_by_email(&email).await?;

        let credential = match &account {
            Some(account) => Password::from_hash(account.password_hash.as_str()),
            None => self.dummy_hash.clone(),
        };
        let password_valid = credential.verify(password);

        match account {
            Some(account) if password_valid && account.is_active() => {
                tracing::info!(account_id = %account.id, "Session token issued");
                self.generate_token(account.id)
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    /// Check signature, time window, issuer and audience of a token.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;
        validation.set_issuer(&[self.jwt.issuer.as_str()]);
        validation.set_audience(&[self.jwt.audience.as_str()]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    fn generate_token(&self, account_id: Uuid) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let lifetime = Duration::try_hours(self.jwt.expiration_hours)
            .ok_or_else(|| AppError::internal("JWT_EXPIRATION_HOURS out of range"))?;
        let expires_at = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| AppError::internal("token expiry out of range"))?;

        let claims = Claims {
            sub: account_id,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.jwt.issuer.clone(),
            aud: self.jwt.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: lifetime.num_seconds(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_service_lib::repository::MockAccountRepository;
    use domain::{Account, AccountStatus, Role};

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-testing-only-32chars".to_string(),
            ..JwtConfig::default()
        }
    }

    fn account(status: AccountStatus, password: &str) -> Account {
        Account {
            id: Uuid::new_v4(),
            username: "annlee1a2b3c".to_string(),
            email: "ann@example.com".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            country: "NZ".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            role: Role::User,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn issuer_for(found: Option<Account>) -> SessionIssuer {
        let mut repo = MockAccountRepository::new();
        repo.expect_get_by_email()
            .returning(move |_| Ok(found.clone()));
        SessionIssuer::new(Arc::new(repo), jwt()).unwrap()
    }

    #[tokio::test]
    async fn test_issue_and_verify() {
        let account = account(AccountStatus::Active, "Str0ng!Pass");
        let id = account.id;
        let issuer = issuer_for(Some(account));

        let token = issuer.issue("Ann@Example.com", "Str0ng!Pass").await.unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 72 * 3600);

        let claims = issuer.verify(&token.access_token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.iss, "social");
        assert_eq!(claims.aud, "social");
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, 72 * 3600);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let issuer = issuer_for(Some(account(AccountStatus::Active, "Str0ng!Pass")));

        let result = issuer.issue("ann@example.com", "Wr0ng!Pass").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_email() {
        let issuer = issuer_for(None);

        let result = issuer.issue("nobody@example.com", "Str0ng!Pass").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_pending_account_refused() {
        let issuer = issuer_for(Some(account(AccountStatus::Pending, "Str0ng!Pass")));

        let result = issuer.issue("ann@example.com", "Str0ng!Pass").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_verify_rejects_foreign_audience() {
        let issuer = issuer_for(None);
        let other = SessionIssuer::new(
            Arc::new(MockAccountRepository::new()),
            JwtConfig {
                audience: "someone-else".to_string(),
                ..jwt()
            },
        )
        .unwrap();

        let token = other.generate_token(Uuid::new_v4()).unwrap();
        assert!(issuer.verify(&token.access_token).is_err());
    }

    #[test]
    fn test_oversized_lifetime_rejected() {
        let result = SessionIssuer::new(
            Arc::new(MockAccountRepository::new()),
            JwtConfig {
                expiration_hours: 10_000_000_000_000,
                ..jwt()
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unvalidated_lifetime_fails_without_panic() {
        let mut issuer = issuer_for(None);
        issuer.jwt.expiration_hours = 10_000_000_000_000;

        let result = issuer.generate_token(Uuid::new_v4());
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = SessionIssuer::new(
            Arc::new(MockAccountRepository::new()),
            JwtConfig {
                secret: "short".to_string(),
                ..JwtConfig::default()
            },
        );
        assert!(result.is_err());
    }
}
