use crate::types::{AppError, Claims, Result, TokenResponse};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Authentication service for the mock backend's access tokens.
///
/// Sign-in never checks a password; it fabricates a user and this service
/// issues an HS256 token so the gated API can tell users apart.
pub struct AuthService {
    jwt_secret: String,
    access_expiry: i64,
}

impl AuthService {
    /// Creates a new AuthService.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for signing JWTs (should be at least 32 chars)
    /// * `access_expiry` - Access token validity in seconds
    pub fn new(jwt_secret: String, access_expiry: i64) -> Self {
        Self {
            jwt_secret,
            access_expiry,
        }
    }

    /// Issues an access token for a user.
    pub fn generate_token(&self, user_id: &str, email: &str) -> Result<TokenResponse> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: (now + Duration::seconds(self.access_expiry)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Auth(format!("Failed to generate token: {}", e)))?;

        Ok(TokenResponse {
            access_token,
            expires_in: self.access_expiry,
        })
    }

    /// Verifies a JWT token and returns the claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))
    }

    /// SHA-256 of a token, hex encoded. Revoked tokens are remembered by hash.
    pub fn hash_token(&self, token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }
}
