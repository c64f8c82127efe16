//! 请求主体 (Principal) 与 Claim 集合

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vnm_common::UserId;

/// Claim 类型名称
pub mod claim_types {
    pub const NAME_IDENTIFIER: &str = "nameidentifier";
    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "role";
    pub const VENDOR_ID: &str = "vendor_id";
    pub const PERMISSION: &str = "permission";
    pub const MARKETPLACE_REGION: &str = "MarketplaceRegion";
    pub const SUPPORTED_CURRENCIES: &str = "SupportedCurrencies";
}

/// 多值 Claim 集合
///
/// 同一类型可以出现多次（例如多个 `role`、多个 `permission`）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet(BTreeMap<String, Vec<String>>);

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个 claim，空值会被忽略
    pub fn add(&mut self, claim_type: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            return;
        }
        self.0.entry(claim_type.into()).or_default().push(value);
    }

    pub fn with(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(claim_type, value);
        self
    }

    /// 删除某类型的所有 claim
    pub fn remove(&mut self, claim_type: &str) {
        self.0.remove(claim_type);
    }

    pub fn first(&self, claim_type: &str) -> Option<&str> {
        self.values(claim_type).first().map(String::as_str)
    }

    pub fn values(&self, claim_type: &str) -> &[String] {
        self.0.get(claim_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, claim_type: &str) -> bool {
        !self.values(claim_type).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut claims = Self::new();
        for (k, v) in iter {
            claims.add(k, v);
        }
        claims
    }
}

/// 请求主体快照
///
/// 未认证的主体没有任何身份，所有授权要求都会被拒绝
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    authenticated: bool,
    claims: ClaimSet,
}

impl Principal {
    /// 匿名主体
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// 已认证主体
    pub fn authenticated(user_id: UserId) -> Self {
        Self {
            authenticated: true,
            claims: ClaimSet::new().with(claim_types::NAME_IDENTIFIER, user_id.to_string()),
        }
    }

    /// 从 claim 集合构建；只有 `nameidentifier` 是合法用户 ID 时才视为已认证
    pub fn from_claims(claims: ClaimSet) -> Self {
        let authenticated = claims
            .first(claim_types::NAME_IDENTIFIER)
            .and_then(UserId::parse)
            .is_some();
        Self {
            authenticated,
            claims,
        }
    }

    pub fn with_role(self, role: impl Into<String>) -> Self {
        self.with_claim(claim_types::ROLE, role)
    }

    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.add(claim_type, value);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn user_id(&self) -> Option<UserId> {
        if !self.authenticated {
            return None;
        }
        self.claim(claim_types::NAME_IDENTIFIER)
            .and_then(UserId::parse)
    }

    pub fn email(&self) -> Option<&str> {
        self.claim(claim_types::EMAIL)
    }

    /// 原始角色 claim 值
    pub fn roles(&self) -> &[String] {
        self.claims.values(claim_types::ROLE)
    }

    pub fn claim(&self, claim_type: &str) -> Option<&str> {
        self.claims.first(claim_type)
    }

    pub fn claim_values(&self, claim_type: &str) -> &[String] {
        self.claims.values(claim_type)
    }

    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    /// 日志用的简短标识
    pub fn display_name(&self) -> String {
        match self.user_id() {
            Some(id) => format!("user:{}", id),
            None => "anonymous".to_string(),
        }
    }
}
