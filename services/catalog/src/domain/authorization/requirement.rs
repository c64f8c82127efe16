//! 授权要求

use serde::Serialize;
use vnm_common::VendorId;

use crate::domain::access::{Permission, Role};

/// 受保护的资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Product,
    Inventory,
    Order,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Product => "product",
            ResourceType::Inventory => "inventory",
            ResourceType::Order => "order",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 需要审批权限的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ApprovalOperation {
    ProductApproval,
    VendorApproval,
}

impl ApprovalOperation {
    /// `permission` claim 中必须出现的片段
    pub fn claim_fragment(&self) -> &'static str {
        match self {
            ApprovalOperation::ProductApproval => "product.approve",
            ApprovalOperation::VendorApproval => "vendor.approve",
        }
    }
}

/// 授权要求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// `match_all = false` 时持有任一角色即可
    RequireRoles { roles: Vec<Role>, match_all: bool },
    /// 基于角色推导出的权限集合，ANY/ALL 语义同上
    RequirePermissions {
        permissions: Vec<Permission>,
        match_all: bool,
    },
    /// 卖家所有权；`owner` 为 None 时只检查卖家身份（资源尚未加载）
    VendorOwnership {
        resource: ResourceType,
        owner: Option<VendorId>,
    },
    ApprovalAuthority { operation: ApprovalOperation },
    TaxCompliance { operation: String },
    /// 主体的市场区域与货币 claim
    MarketplaceAccess { region: String, currency: String },
}

impl Requirement {
    /// 任何已认证主体（ALL of nothing）
    pub fn authenticated() -> Self {
        Self::RequireRoles {
            roles: Vec::new(),
            match_all: true,
        }
    }

    pub fn any_role(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::RequireRoles {
            roles: roles.into_iter().collect(),
            match_all: false,
        }
    }

    pub fn all_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::RequireRoles {
            roles: roles.into_iter().collect(),
            match_all: true,
        }
    }

    pub fn any_permission(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self::RequirePermissions {
            permissions: permissions.into_iter().collect(),
            match_all: false,
        }
    }

    pub fn all_permissions(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self::RequirePermissions {
            permissions: permissions.into_iter().collect(),
            match_all: true,
        }
    }

    pub fn vendor_ownership(resource: ResourceType) -> Self {
        Self::VendorOwnership {
            resource,
            owner: None,
        }
    }

    pub fn owned_by(resource: ResourceType, owner: VendorId) -> Self {
        Self::VendorOwnership {
            resource,
            owner: Some(owner),
        }
    }

    pub fn approval(operation: ApprovalOperation) -> Self {
        Self::ApprovalAuthority { operation }
    }

    pub fn tax_compliance(operation: impl Into<String>) -> Self {
        Self::TaxCompliance {
            operation: operation.into(),
        }
    }

    pub fn marketplace(region: impl Into<String>, currency: impl Into<String>) -> Self {
        Self::MarketplaceAccess {
            region: region.into(),
            currency: currency.into(),
        }
    }

    /// 指标标签
    pub fn kind(&self) -> &'static str {
        match self {
            Requirement::RequireRoles { .. } => "roles",
            Requirement::RequirePermissions { .. } => "permissions",
            Requirement::VendorOwnership { .. } => "vendor_ownership",
            Requirement::ApprovalAuthority { .. } => "approval_authority",
            Requirement::TaxCompliance { .. } => "tax_compliance",
            Requirement::MarketplaceAccess { .. } => "marketplace_access",
        }
    }
}
