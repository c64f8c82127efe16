//! 授权行为
//!
//! 位于日志之后、校验与缓存之前：被拒绝的请求不会进入校验，也不会读到缓存

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use vnm_cqrs_core::{Next, PipelineBehavior, Request, RequestContext};
use vnm_errors::AppResult;

use crate::domain::authorization::{AuthorizationEngine, RequirementRegistry};

pub struct AuthorizationBehavior<R> {
    engine: AuthorizationEngine,
    registry: Arc<RequirementRegistry>,
    _request: PhantomData<fn(R)>,
}

impl<R: Request> AuthorizationBehavior<R> {
    pub fn new(engine: AuthorizationEngine, registry: Arc<RequirementRegistry>) -> Self {
        Self {
            engine,
            registry,
            _request: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Request> PipelineBehavior<R> for AuthorizationBehavior<R> {
    async fn handle(
        &self,
        request: R,
        ctx: &RequestContext,
        next: Next<'_, R>,
    ) -> AppResult<R::Response> {
        let requirements = self.registry.requirements_for::<R>()?;
        let decision = self.engine.evaluate_all(&ctx.principal, requirements);

        if let Some(reason) = decision.reason() {
            tracing::warn!(
                request = R::NAME,
                request_id = %ctx.request_id,
                principal = %ctx.principal.display_name(),
                reason = %reason,
                "Authorization denied"
            );
        }
        decision.into_result()?;

        next.run(request, ctx).await
    }
}
