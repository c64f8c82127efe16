//! 访问控制命令

use vnm_common::UserId;
use vnm_cqrs_core::{Command, Request};
use vnm_errors::FieldError;

use super::UserAccess;
use crate::domain::access::Role;

/// 覆盖式分配用户角色
#[derive(Debug, Clone)]
pub struct AssignUserRolesCommand {
    pub user_id: UserId,
    /// 角色代码，接受别名
    pub roles: Vec<String>,
}

impl Request for AssignUserRolesCommand {
    const NAME: &'static str = "AssignUserRoles";
    type Response = UserAccess;
}

impl Command for AssignUserRolesCommand {}

/// 所有无效角色代码一次性报告
pub fn validate_assign_user_roles(cmd: &AssignUserRolesCommand) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if cmd.user_id.value() <= 0 {
        errors.push(FieldError::new("userId", "must be a positive id"));
    }
    if cmd.roles.is_empty() {
        errors.push(FieldError::new("roles", "at least one role is required"));
    }
    for (i, code) in cmd.roles.iter().enumerate() {
        if Role::parse(code).is_none() {
            errors.push(FieldError::new(
                format!("roles[{}]", i),
                format!("unknown role code '{}'", code),
            ));
        }
    }
    errors
}
