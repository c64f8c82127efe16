//! 访问控制处理器

use std::sync::Arc;

use async_trait::async_trait;
use vnm_cqrs_core::{RequestContext, RequestHandler};
use vnm_errors::AppResult;

use super::{AccessService, AssignUserRolesCommand, GetUserAccessQuery, UserAccess};
use crate::domain::access::{Permission, Role};
use crate::domain::authorization::{AuthorizationEngine, Requirement};

pub struct AssignUserRolesHandler {
    access: Arc<AccessService>,
}

impl AssignUserRolesHandler {
    pub fn new(access: Arc<AccessService>) -> Self {
        Self { access }
    }
}

#[async_trait]
impl RequestHandler<AssignUserRolesCommand> for AssignUserRolesHandler {
    async fn handle(
        &self,
        cmd: AssignUserRolesCommand,
        ctx: &RequestContext,
    ) -> AppResult<UserAccess> {
        let mut roles = cmd
            .roles
            .iter()
            .map(|code| code.parse::<Role>())
            .collect::<Result<Vec<_>, _>>()?;
        roles.sort();
        roles.dedup();

        let access = self.access.assign_roles(cmd.user_id, &roles).await?;
        tracing::info!(
            user_id = %cmd.user_id,
            roles = ?access.roles,
            by = %ctx.principal.display_name(),
            "User roles assigned"
        );
        Ok(access)
    }
}

pub struct GetUserAccessHandler {
    access: Arc<AccessService>,
    engine: AuthorizationEngine,
}

impl GetUserAccessHandler {
    pub fn new(access: Arc<AccessService>, engine: AuthorizationEngine) -> Self {
        Self { access, engine }
    }
}

#[async_trait]
impl RequestHandler<GetUserAccessQuery> for GetUserAccessHandler {
    async fn handle(&self, query: GetUserAccessQuery, ctx: &RequestContext) -> AppResult<UserAccess> {
        if ctx.principal.user_id() != Some(query.user_id) {
            self.engine
                .evaluate(&ctx.principal, &Requirement::any_permission([Permission::ViewUsers]))
                .into_result()?;
        }
        self.access.user_access(query.user_id).await
    }
}
