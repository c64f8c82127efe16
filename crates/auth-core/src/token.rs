//! JWT Claims 与 Token 服务

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vnm_errors::{AppError, AppResult};

use crate::principal::{ClaimSet, Principal, claim_types};

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    /// Issuer
    #[serde(default)]
    pub iss: String,
    /// Audience
    #[serde(default)]
    pub aud: String,
    /// Token type
    #[serde(default)]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Roles
    #[serde(default)]
    pub roles: Vec<String>,
    /// 细粒度操作权限 (e.g. "product.approve")
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace_region: Option<String>,
    #[serde(default)]
    pub supported_currencies: Vec<String>,
}

impl Claims {
    /// 从主体快照生成 claims
    pub fn from_principal(
        principal: &Principal,
        expires_in_secs: i64,
        token_type: &str,
        issuer: &str,
        audience: &str,
    ) -> AppResult<Self> {
        let user_id = principal
            .user_id()
            .ok_or_else(|| AppError::unauthenticated("Cannot issue a token for an anonymous principal"))?;
        let now = Utc::now();

        Ok(Self {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            token_type: token_type.to_string(),
            email: principal.email().map(str::to_string),
            roles: principal.roles().to_vec(),
            permissions: principal.claim_values(claim_types::PERMISSION).to_vec(),
            vendor_id: principal.claim(claim_types::VENDOR_ID).map(str::to_string),
            marketplace_region: principal
                .claim(claim_types::MARKETPLACE_REGION)
                .map(str::to_string),
            supported_currencies: principal
                .claim_values(claim_types::SUPPORTED_CURRENCIES)
                .to_vec(),
        })
    }

    /// 转换为主体快照
    pub fn into_principal(self) -> AppResult<Principal> {
        let mut claims = ClaimSet::new().with(claim_types::NAME_IDENTIFIER, self.sub);
        if let Some(email) = self.email {
            claims.add(claim_types::EMAIL, email);
        }
        for role in self.roles {
            claims.add(claim_types::ROLE, role);
        }
        for permission in self.permissions {
            claims.add(claim_types::PERMISSION, permission);
        }
        if let Some(vendor_id) = self.vendor_id {
            claims.add(claim_types::VENDOR_ID, vendor_id);
        }
        if let Some(region) = self.marketplace_region {
            claims.add(claim_types::MARKETPLACE_REGION, region);
        }
        for currency in self.supported_currencies {
            claims.add(claim_types::SUPPORTED_CURRENCIES, currency);
        }

        let principal = Principal::from_claims(claims);
        if !principal.is_authenticated() {
            return Err(AppError::unauthorized("Invalid user ID in token"));
        }
        Ok(principal)
    }

    pub fn is_access_token(&self) -> bool {
        self.token_type == "access"
    }
}

/// Token 服务
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
    issuer: String,
    audience: String,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, access_token_expires_in: i64, issuer: String, audience: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in,
            issuer,
            audience,
        }
    }

    /// 生成访问令牌
    pub fn generate_access_token(&self, principal: &Principal) -> AppResult<String> {
        let claims = Claims::from_principal(
            principal,
            self.access_token_expires_in,
            "access",
            &self.issuer,
            &self.audience,
        )?;

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    /// 验证令牌
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::unauthorized(format!("Invalid token: {}", e)))?
            .claims;

        if claims.jti.is_empty() {
            return Err(AppError::unauthorized("Token ID (jti) missing"));
        }

        Ok(claims)
    }

    /// 验证访问令牌并还原主体
    pub fn authenticate(&self, token: &str) -> AppResult<Principal> {
        let claims = self.validate_token(token)?;

        if !claims.is_access_token() {
            return Err(AppError::unauthorized("Not an access token"));
        }

        claims.into_principal()
    }

    pub fn access_token_expires_in(&self) -> i64 {
        self.access_token_expires_in
    }
}
