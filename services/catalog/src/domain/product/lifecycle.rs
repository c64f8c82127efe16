//! 商品生命周期状态机
//!
//! 合法迁移全部列在 `TRANSITIONS` 中，表外的迁移一律拒绝

use vnm_common::VendorId;

use super::ProductStatus;
use crate::domain::access::Role;
use crate::domain::authorization::{ApprovalOperation, Requirement, ResourceType};
use crate::error::TransitionError;

/// 执行迁移所需的权限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAuthority {
    /// 商品所属卖家或管理员
    OwnerOrAdmin,
    /// 仅管理员
    Admin,
    /// 管理员且持有审批 claim
    ApprovalAuthority,
}

impl TransitionAuthority {
    /// 转换为针对具体商品的授权要求
    pub fn requirement(&self, owner: VendorId) -> Requirement {
        match self {
            TransitionAuthority::OwnerOrAdmin => Requirement::owned_by(ResourceType::Product, owner),
            TransitionAuthority::Admin => Requirement::all_roles([Role::Admin]),
            TransitionAuthority::ApprovalAuthority => {
                Requirement::approval(ApprovalOperation::ProductApproval)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ProductStatus,
    pub to: ProductStatus,
    pub authority: TransitionAuthority,
}

const fn rule(from: ProductStatus, to: ProductStatus, authority: TransitionAuthority) -> Transition {
    Transition {
        from,
        to,
        authority,
    }
}

pub const TRANSITIONS: &[Transition] = &[
    rule(ProductStatus::Draft, ProductStatus::Pending, TransitionAuthority::OwnerOrAdmin),
    rule(ProductStatus::Rejected, ProductStatus::Pending, TransitionAuthority::OwnerOrAdmin),
    rule(ProductStatus::Pending, ProductStatus::UnderReview, TransitionAuthority::Admin),
    rule(ProductStatus::UnderReview, ProductStatus::Active, TransitionAuthority::ApprovalAuthority),
    rule(ProductStatus::UnderReview, ProductStatus::Rejected, TransitionAuthority::ApprovalAuthority),
    rule(ProductStatus::Active, ProductStatus::Inactive, TransitionAuthority::OwnerOrAdmin),
    rule(ProductStatus::Active, ProductStatus::Discontinued, TransitionAuthority::Admin),
    rule(ProductStatus::Inactive, ProductStatus::Discontinued, TransitionAuthority::Admin),
];

/// 查找迁移规则
pub fn transition(from: ProductStatus, to: ProductStatus) -> Result<&'static Transition, TransitionError> {
    if from == to {
        return Err(TransitionError::AlreadyInStatus(to));
    }
    TRANSITIONS
        .iter()
        .find(|t| t.from == from && t.to == to)
        .ok_or(TransitionError::NotAllowed { from, to })
}

pub fn can_transition(from: ProductStatus, to: ProductStatus) -> bool {
    transition(from, to).is_ok()
}

/// 从某状态出发的所有合法目标
pub fn allowed_targets(from: ProductStatus) -> impl Iterator<Item = ProductStatus> {
    TRANSITIONS
        .iter()
        .filter(move |t| t.from == from)
        .map(|t| t.to)
}

/// 新建商品的初始状态
pub fn initial_status(submit_for_review: bool) -> ProductStatus {
    if submit_for_review {
        ProductStatus::Pending
    } else {
        ProductStatus::Draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProductStatus::*;

    #[test]
    fn test_under_review_exits_only_to_active_or_rejected() {
        let targets: Vec<_> = allowed_targets(UnderReview).collect();
        assert_eq!(targets, [Active, Rejected]);
    }

    #[test]
    fn test_draft_never_goes_straight_to_active() {
        assert!(!can_transition(Draft, Active));
        assert!(!can_transition(Draft, UnderReview));
        assert!(!can_transition(Pending, Active));
        assert_eq!(
            transition(Draft, Active),
            Err(TransitionError::NotAllowed {
                from: Draft,
                to: Active
            })
        );
    }

    #[test]
    fn test_discontinued_is_terminal() {
        assert_eq!(allowed_targets(Discontinued).count(), 0);
    }

    #[test]
    fn test_same_status_is_reported_separately() {
        assert_eq!(transition(Active, Active), Err(TransitionError::AlreadyInStatus(Active)));
    }

    #[test]
    fn test_authority_per_transition() {
        assert_eq!(
            transition(Pending, UnderReview).unwrap().authority,
            TransitionAuthority::Admin
        );
        assert_eq!(
            transition(UnderReview, Rejected).unwrap().authority,
            TransitionAuthority::ApprovalAuthority
        );
        assert_eq!(
            transition(Active, Inactive).unwrap().authority,
            TransitionAuthority::OwnerOrAdmin
        );
        assert_eq!(
            TransitionAuthority::OwnerOrAdmin.requirement(VendorId(9)),
            Requirement::owned_by(ResourceType::Product, VendorId(9))
        );
    }

    #[test]
    fn test_every_status_pair_outside_table_is_rejected() {
        for from in ProductStatus::ALL {
            for to in ProductStatus::ALL {
                let in_table = TRANSITIONS.iter().any(|t| t.from == from && t.to == to);
                assert_eq!(can_transition(from, to), in_table, "{} -> {}", from, to);
            }
        }
    }
}
