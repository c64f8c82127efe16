//! 访问控制查询

use vnm_common::UserId;
use vnm_cqrs_core::{Query, Request};

use super::UserAccess;

/// 查询用户访问权限（本人或持有 VIEW_USERS）
#[derive(Debug, Clone)]
pub struct GetUserAccessQuery {
    pub user_id: UserId,
}

impl Request for GetUserAccessQuery {
    const NAME: &'static str = "GetUserAccess";
    type Response = UserAccess;
}

impl Query for GetUserAccessQuery {}
