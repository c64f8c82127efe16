//! 用户访问权限服务

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vnm_common::UserId;
use vnm_errors::AppResult;

use crate::domain::access::{Permission, Role, RoleCatalog, UserRoleRepository};

/// 用户的角色、扁平化权限与主角色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccess {
    pub user_id: UserId,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    pub primary_role: Option<Role>,
}

pub struct AccessService {
    user_roles: Arc<dyn UserRoleRepository>,
    catalog: &'static RoleCatalog,
}

impl AccessService {
    pub fn new(user_roles: Arc<dyn UserRoleRepository>) -> Self {
        Self {
            user_roles,
            catalog: RoleCatalog::global(),
        }
    }

    /// 查询用户访问权限；存储中的未知角色代码被忽略
    pub async fn user_access(&self, user_id: UserId) -> AppResult<UserAccess> {
        let codes = self.user_roles.get_user_roles(user_id).await?;
        let roles = Role::from_claims(&codes);

        Ok(UserAccess {
            user_id,
            permissions: self.catalog.flatten(&roles).into_iter().collect(),
            primary_role: Role::primary(&roles),
            roles: roles.into_iter().collect(),
        })
    }

    pub async fn assign_roles(&self, user_id: UserId, roles: &[Role]) -> AppResult<UserAccess> {
        self.user_roles.assign_roles(user_id, roles).await?;
        self.user_access(user_id).await
    }
}
