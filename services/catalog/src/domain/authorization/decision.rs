//! 授权决策

use thiserror::Error;
use vnm_errors::{AppError, AppResult};

use super::ResourceType;

/// 拒绝原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenyReason {
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Requirement lists no roles or permissions")]
    EmptyRequirement,
    #[error("Requires one of roles [{0}]")]
    MissingAnyRole(String),
    #[error("Requires all of roles [{0}]")]
    MissingRoles(String),
    #[error("Requires one of permissions [{0}]")]
    MissingAnyPermission(String),
    #[error("Requires all of permissions [{0}]")]
    MissingPermissions(String),
    #[error("Vendor role required")]
    NotVendor,
    #[error("vendor_id claim is missing")]
    MissingVendorClaim,
    #[error("vendor_id claim '{0}' is not a valid vendor id")]
    MalformedVendorClaim(String),
    #[error("This {0} belongs to another vendor")]
    NotOwner(ResourceType),
    #[error("Admin role required")]
    NotAdmin,
    #[error("Admin or accountant role required")]
    NotTaxOfficer,
    #[error("Missing '{0}' permission claim")]
    MissingPermissionClaim(String),
    #[error("Marketplace region {0} not granted")]
    RegionMismatch(String),
    #[error("Currency {0} not supported")]
    CurrencyNotSupported(String),
}

/// 授权结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn is_denied(&self) -> bool {
        !self.is_allowed()
    }

    pub fn reason(&self) -> Option<&DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(reason),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny(_) => "deny",
        }
    }

    /// 未认证 → 401，其余拒绝 → 403
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => {
                Err(AppError::unauthenticated(DenyReason::Unauthenticated.to_string()))
            }
            Decision::Deny(reason) => Err(AppError::forbidden(reason.to_string())),
        }
    }
}
