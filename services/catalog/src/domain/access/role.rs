//! 角色定义

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::AccessError;

/// 市场角色
///
/// 顺序即优先级，`Admin` 最高
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Moderator,
    Accountant,
    VendorStaff,
    WarehouseStaff,
    Customer,
    Guest,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::Moderator,
        Role::Accountant,
        Role::VendorStaff,
        Role::WarehouseStaff,
        Role::Customer,
        Role::Guest,
    ];

    /// 角色代码
    pub fn code(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Moderator => "MODERATOR",
            Role::Accountant => "ACCOUNTANT",
            Role::VendorStaff => "VENDOR_STAFF",
            Role::WarehouseStaff => "WAREHOUSE_STAFF",
            Role::Customer => "CUSTOMER",
            Role::Guest => "GUEST",
        }
    }

    /// 解析角色 claim 值，大小写不敏感并接受常见别名
    ///
    /// "Vendor"、"vendor-staff"、"VendorStaff" 都映射到 `VendorStaff`
    pub fn parse(value: &str) -> Option<Role> {
        let normalized: String = value
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        let role = match normalized.as_str() {
            "ADMIN" | "ADMINISTRATOR" => Role::Admin,
            "MODERATOR" => Role::Moderator,
            "ACCOUNTANT" => Role::Accountant,
            "VENDOR_STAFF" | "VENDORSTAFF" | "VENDOR" | "SELLER" => Role::VendorStaff,
            "WAREHOUSE_STAFF" | "WAREHOUSESTAFF" | "WAREHOUSE" => Role::WarehouseStaff,
            "CUSTOMER" | "BUYER" => Role::Customer,
            "GUEST" => Role::Guest,
            _ => return None,
        };
        Some(role)
    }

    /// 从 claim 值集合中解析角色，未知值被忽略
    pub fn from_claims<S: AsRef<str>>(values: &[S]) -> BTreeSet<Role> {
        values.iter().filter_map(|v| Role::parse(v.as_ref())).collect()
    }

    /// 主角色：持有角色中优先级最高的一个
    pub fn primary<'a>(roles: impl IntoIterator<Item = &'a Role>) -> Option<Role> {
        roles.into_iter().min().copied()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| AccessError::UnknownRole(s.to_string()))
    }
}
