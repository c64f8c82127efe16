//! 实体与聚合根

use vnm_common::AuditInfo;

/// 以标识区分的领域对象
pub trait Entity {
    type Id;

    fn id(&self) -> &Self::Id;
}

/// 聚合根：持久化的最小单位，携带审计信息
pub trait AggregateRoot: Entity {
    fn audit_info(&self) -> &AuditInfo;
    fn audit_info_mut(&mut self) -> &mut AuditInfo;
}
