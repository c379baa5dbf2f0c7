//! Bearer-token authentication.
//!
//! User accounts live in an external auth service. This server only consumes the tokens that service issues:
//! a base64url-encoded JSON claims document plus an HMAC-SHA256 signature over it, keyed with the shared
//! `TSS_AUTH_SECRET`. [`UserClaims`] implements `FromRequest`, so handlers that need an authenticated caller
//! simply take it as a parameter; handlers that need an admin call [`UserClaims::require_admin`].

use std::future::{ready, Ready};

use actix_web::{http::header, web::Data, FromRequest, HttpRequest};
use base64::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use log::*;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use ts_common::Secret;

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    /// Token expiry, as a unix timestamp.
    pub exp: i64,
}

impl UserClaims {
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }

    pub fn require_admin(&self) -> Result<(), ServerError> {
        if self.is_admin {
            Ok(())
        } else {
            warn!("🔐️ {} tried to access an admin endpoint", self.customer_id);
            Err(ServerError::InsufficientPermissions("This endpoint requires an admin account.".to_string()))
        }
    }
}

/// Validates bearer tokens against the shared secret. Stored in the app data so that [`UserClaims`] can be
/// extracted in handlers.
#[derive(Clone)]
pub struct TokenVerifier {
    secret: Secret<String>,
}

impl TokenVerifier {
    pub fn new(config: AuthConfig) -> Self {
        Self { secret: config.secret }
    }

    pub fn decode(&self, token: &str) -> Result<UserClaims, AuthError> {
        let (payload, signature) = token
            .rsplit_once('.')
            .ok_or_else(|| AuthError::PoorlyFormattedToken("Missing signature separator".to_string()))?;
        let signature = base64::decode_config(signature, URL_SAFE_NO_PAD)
            .map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
        let mut mac = HmacSha256::new_from_slice(self.secret.reveal().as_bytes())
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).map_err(|_| AuthError::ValidationError("Signature mismatch".to_string()))?;
        let claims = base64::decode_config(payload, URL_SAFE_NO_PAD)
            .map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
        let claims: UserClaims =
            serde_json::from_slice(&claims).map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
        if claims.is_expired() {
            return Err(AuthError::ValidationError("Token has expired".to_string()));
        }
        Ok(claims)
    }
}

/// Issues tokens in the format [`TokenVerifier`] accepts. The auth service is the production issuer; this
/// implementation exists for tests and local tooling.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Secret<String>,
}

impl TokenIssuer {
    pub fn new(config: AuthConfig) -> Self {
        Self { secret: config.secret }
    }

    pub fn issue(&self, mut claims: UserClaims, expiry: DateTime<Utc>) -> Result<String, AuthError> {
        claims.exp = expiry.timestamp();
        let payload = serde_json::to_vec(&claims).map_err(|e| AuthError::ValidationError(e.to_string()))?;
        let payload = base64::encode_config(payload, URL_SAFE_NO_PAD);
        let mut mac = HmacSha256::new_from_slice(self.secret.reveal().as_bytes())
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        mac.update(payload.as_bytes());
        let signature = base64::encode_config(mac.finalize().into_bytes(), URL_SAFE_NO_PAD);
        Ok(format!("{payload}.{signature}"))
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected a Bearer token".to_string()))
}

impl FromRequest for UserClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match req.app_data::<Data<TokenVerifier>>() {
            Some(verifier) => bearer_token(req).and_then(|token| verifier.decode(token)).map_err(|e| {
                debug!("🔐️ Rejecting request: {e}");
                ServerError::AuthenticationError(e)
            }),
            None => Err(ServerError::InitializeError("No token verifier is configured".to_string())),
        };
        ready(result)
    }
}
