//! Admin authentication: a single configured credential pair and HS256
//! bearer tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct AuthConfig {
    admin_email: String,
    admin_password: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(
        admin_email: impl Into<String>,
        admin_password: impl Into<String>,
        secret: &str,
        token_ttl: Duration,
    ) -> Self {
        Self {
            admin_email: admin_email.into(),
            admin_password: admin_password.into(),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.admin_email.clone(),
            config.admin_password.clone(),
            &config.jwt_secret,
            Duration::hours(config.token_ttl_hours),
        )
    }

    pub fn check_credentials(&self, email: &str, password: &str) -> bool {
        email == self.admin_email && password == self.admin_password
    }

    pub fn issue_token(&self, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            email: email.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Checks signature and expiry and returns the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default()).map(|data| data.claims)
    }

    pub fn is_valid(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }
}
