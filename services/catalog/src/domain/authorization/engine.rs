//! 授权决策引擎
//!
//! 纯函数：只依赖主体快照与要求本身，不做任何 I/O

use std::collections::BTreeSet;

use vnm_auth_core::{Principal, claim_types};
use vnm_common::VendorId;

use super::{ApprovalOperation, Decision, DenyReason, Requirement, ResourceType};
use crate::domain::access::{Permission, Role, RoleCatalog};

const TAX_REPORT_FRAGMENT: &str = "tax.report";

/// 授权引擎
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationEngine {
    catalog: &'static RoleCatalog,
}

impl Default for AuthorizationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorizationEngine {
    pub fn new() -> Self {
        Self {
            catalog: RoleCatalog::global(),
        }
    }

    /// 评估单个要求
    pub fn evaluate(&self, principal: &Principal, requirement: &Requirement) -> Decision {
        let decision = self.decide(principal, requirement);

        tracing::debug!(
            principal = %principal.display_name(),
            requirement = requirement.kind(),
            decision = decision.label(),
            reason = ?decision.reason(),
            "Authorization evaluated"
        );
        metrics::counter!(
            "authorization_decisions_total",
            "requirement" => requirement.kind(),
            "decision" => decision.label()
        )
        .increment(1);

        decision
    }

    /// 依次评估，第一个拒绝即返回；空列表允许
    pub fn evaluate_all(&self, principal: &Principal, requirements: &[Requirement]) -> Decision {
        for requirement in requirements {
            let decision = self.evaluate(principal, requirement);
            if decision.is_denied() {
                return decision;
            }
        }
        Decision::Allow
    }

    fn decide(&self, principal: &Principal, requirement: &Requirement) -> Decision {
        if !principal.is_authenticated() {
            return Decision::Deny(DenyReason::Unauthenticated);
        }

        let roles = Role::from_claims(principal.roles());

        match requirement {
            Requirement::RequireRoles { roles: required, match_all } => {
                check_roles(&roles, required, *match_all)
            }
            Requirement::RequirePermissions {
                permissions,
                match_all,
            } => {
                let held = self.catalog.flatten(&roles);
                check_permissions(&held, permissions, *match_all)
            }
            Requirement::VendorOwnership { resource, owner } => {
                check_vendor_ownership(principal, &roles, *resource, *owner)
            }
            Requirement::ApprovalAuthority { operation } => {
                check_approval(principal, &roles, *operation)
            }
            Requirement::TaxCompliance { .. } => check_tax_compliance(principal, &roles),
            Requirement::MarketplaceAccess { region, currency } => {
                check_marketplace(principal, region, currency)
            }
        }
    }
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_roles(held: &BTreeSet<Role>, required: &[Role], match_all: bool) -> Decision {
    if required.is_empty() {
        // ALL of nothing 恒真，ANY of nothing 恒假
        return if match_all {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::EmptyRequirement)
        };
    }

    if match_all {
        if required.iter().all(|r| held.contains(r)) {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::MissingRoles(join(required)))
        }
    } else if required.iter().any(|r| held.contains(r)) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::MissingAnyRole(join(required)))
    }
}

fn check_permissions(
    held: &BTreeSet<Permission>,
    required: &[Permission],
    match_all: bool,
) -> Decision {
    if required.is_empty() {
        return if match_all {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::EmptyRequirement)
        };
    }

    if match_all {
        if required.iter().all(|p| held.contains(p)) {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::MissingPermissions(join(required)))
        }
    } else if required.iter().any(|p| held.contains(p)) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::MissingAnyPermission(join(required)))
    }
}

fn check_vendor_ownership(
    principal: &Principal,
    roles: &BTreeSet<Role>,
    resource: ResourceType,
    owner: Option<VendorId>,
) -> Decision {
    if roles.contains(&Role::Admin) {
        return Decision::Allow;
    }
    if !roles.contains(&Role::VendorStaff) {
        return Decision::Deny(DenyReason::NotVendor);
    }

    let Some(raw) = principal.claim(claim_types::VENDOR_ID) else {
        return Decision::Deny(DenyReason::MissingVendorClaim);
    };
    let Some(vendor_id) = VendorId::parse(raw) else {
        return Decision::Deny(DenyReason::MalformedVendorClaim(raw.to_string()));
    };

    match owner {
        Some(owner) if owner != vendor_id => Decision::Deny(DenyReason::NotOwner(resource)),
        _ => Decision::Allow,
    }
}

fn has_permission_claim(principal: &Principal, fragment: &str) -> bool {
    principal
        .claim_values(claim_types::PERMISSION)
        .iter()
        .any(|value| value.contains(fragment))
}

fn check_approval(
    principal: &Principal,
    roles: &BTreeSet<Role>,
    operation: ApprovalOperation,
) -> Decision {
    if !roles.contains(&Role::Admin) {
        return Decision::Deny(DenyReason::NotAdmin);
    }

    let fragment = operation.claim_fragment();
    if has_permission_claim(principal, fragment) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::MissingPermissionClaim(fragment.to_string()))
    }
}

fn check_tax_compliance(principal: &Principal, roles: &BTreeSet<Role>) -> Decision {
    if !roles.contains(&Role::Admin) && !roles.contains(&Role::Accountant) {
        return Decision::Deny(DenyReason::NotTaxOfficer);
    }

    if has_permission_claim(principal, TAX_REPORT_FRAGMENT) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::MissingPermissionClaim(
            TAX_REPORT_FRAGMENT.to_string(),
        ))
    }
}

fn check_marketplace(principal: &Principal, region: &str, currency: &str) -> Decision {
    let region_ok = principal
        .claim(claim_types::MARKETPLACE_REGION)
        .is_some_and(|claimed| claimed.trim().eq_ignore_ascii_case(region));
    if !region_ok {
        return Decision::Deny(DenyReason::RegionMismatch(region.to_string()));
    }

    // claim 可能是 "VND,USD"，也可能拆成多个值
    let currency_ok = principal
        .claim_values(claim_types::SUPPORTED_CURRENCIES)
        .iter()
        .flat_map(|value| value.split(|c: char| c == ',' || c.is_whitespace()))
        .any(|code| code.eq_ignore_ascii_case(currency));
    if !currency_ok {
        return Decision::Deny(DenyReason::CurrencyNotSupported(currency.to_string()));
    }

    Decision::Allow
}
