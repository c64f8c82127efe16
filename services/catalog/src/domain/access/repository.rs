//! 用户角色仓储接口

use async_trait::async_trait;
use vnm_common::UserId;
use vnm_errors::AppResult;

use super::Role;

/// 外部用户角色存储
#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    /// 用户持有的角色代码（原样返回，可能包含未知代码）
    async fn get_user_roles(&self, user_id: UserId) -> AppResult<Vec<String>>;

    /// 覆盖式分配角色
    async fn assign_roles(&self, user_id: UserId, roles: &[Role]) -> AppResult<()>;
}
