//! 内存用户角色存储

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use vnm_common::UserId;
use vnm_errors::AppResult;

use crate::domain::access::{Role, UserRoleRepository};

#[derive(Default)]
pub struct InMemoryUserRoleRepository {
    assignments: RwLock<HashMap<UserId, Vec<String>>>,
}

impl InMemoryUserRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置角色代码（可以包含存储中遗留的未知代码）
    pub fn with_roles<I, S>(mut self, user_id: UserId, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes = codes.into_iter().map(Into::into).collect();
        self.assignments.get_mut().insert(user_id, codes);
        self
    }
}

#[async_trait]
impl UserRoleRepository for InMemoryUserRoleRepository {
    async fn get_user_roles(&self, user_id: UserId) -> AppResult<Vec<String>> {
        Ok(self
            .assignments
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn assign_roles(&self, user_id: UserId, roles: &[Role]) -> AppResult<()> {
        let codes = roles.iter().map(|r| r.code().to_string()).collect();
        self.assignments.write().await.insert(user_id, codes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_assign_overwrites_seeded_codes() {
        let repo = InMemoryUserRoleRepository::new().with_roles(UserId(7), ["Vendor", "LEGACY_ROLE"]);
        assert_eq!(
            repo.get_user_roles(UserId(7)).await.unwrap(),
            ["Vendor", "LEGACY_ROLE"]
        );

        repo.assign_roles(UserId(7), &[Role::Customer]).await.unwrap();
        assert_eq!(repo.get_user_roles(UserId(7)).await.unwrap(), ["CUSTOMER"]);
        assert!(repo.get_user_roles(UserId(8)).await.unwrap().is_empty());
    }
}
