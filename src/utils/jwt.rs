use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const REFRESH_COOKIE_NAME: &str = "tgi_refresh_token";

// token 种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户 ID
    pub role: String,       // 签发时的角色
    pub token_type: String, // "access" 或 "refresh"
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    fn encode_claims(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    fn decode_claims(
        token: &str,
        kind: TokenKind,
        secret: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?
        .claims;
        if claims.token_type != kind.as_str() {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    fn build_claims(user_id: i64, role: &str, kind: TokenKind, ttl: chrono::Duration) -> Claims {
        let now = chrono::Utc::now();
        Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: kind.as_str().to_string(),
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        }
    }

    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let ttl = chrono::Duration::minutes(AppConfig::get().jwt.access_token_expiry);
        let claims = Self::build_claims(user_id, role, TokenKind::Access, ttl);
        Self::encode_claims(&claims, Self::secret())
    }

    /// `ttl` 为空时使用配置中的默认有效期
    pub fn generate_refresh_token(
        user_id: i64,
        role: &str,
        ttl: Option<chrono::Duration>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let ttl = ttl.unwrap_or_else(|| {
            chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry)
        });
        let claims = Self::build_claims(user_id, role, TokenKind::Refresh, ttl);
        Self::encode_claims(&claims, Self::secret())
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_ttl: Option<chrono::Duration>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_refresh_token(user_id, role, refresh_ttl)?,
        })
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_claims(token, TokenKind::Access, Self::secret())
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_claims(token, TokenKind::Refresh, Self::secret())
    }

    /// Refresh Token Cookie，`max_age_days` 与 token 有效期一致
    pub fn create_refresh_token_cookie(refresh_token: &str, max_age_days: i64) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE_NAME, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::days(max_age_days))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 注销时下发的过期 Cookie
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE_NAME, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_claims_round_trip() {
        let claims = JwtUtils::build_claims(7, "professor", TokenKind::Access, chrono::Duration::minutes(5));
        let token = JwtUtils::encode_claims(&claims, SECRET).unwrap();
        let decoded = JwtUtils::decode_claims(&token, TokenKind::Access, SECRET).unwrap();
        assert_eq!(decoded.user_id(), Some(7));
        assert_eq!(decoded.role, "professor");
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let claims = JwtUtils::build_claims(7, "admin", TokenKind::Refresh, chrono::Duration::days(1));
        let token = JwtUtils::encode_claims(&claims, SECRET).unwrap();
        assert!(JwtUtils::decode_claims(&token, TokenKind::Access, SECRET).is_err());
        assert!(JwtUtils::decode_claims(&token, TokenKind::Refresh, SECRET).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let claims = JwtUtils::build_claims(1, "guest", TokenKind::Access, chrono::Duration::minutes(5));
        let token = JwtUtils::encode_claims(&claims, SECRET).unwrap();
        assert!(JwtUtils::decode_claims(&token, TokenKind::Access, "other").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = JwtUtils::build_claims(1, "guest", TokenKind::Access, chrono::Duration::minutes(-10));
        let token = JwtUtils::encode_claims(&claims, SECRET).unwrap();
        assert!(JwtUtils::decode_claims(&token, TokenKind::Access, SECRET).is_err());
    }
}
