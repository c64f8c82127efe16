//! 管道行为 (chain of responsibility)

use std::sync::Arc;

use async_trait::async_trait;
use vnm_errors::AppResult;

use crate::{Request, RequestContext, RequestHandler};

/// 包裹 handler 的管道行为
///
/// 行为可以在调用 `next.run` 前后做事，也可以直接返回而不调用后续链
#[async_trait]
pub trait PipelineBehavior<R: Request>: Send + Sync {
    async fn handle(
        &self,
        request: R,
        ctx: &RequestContext,
        next: Next<'_, R>,
    ) -> AppResult<R::Response>;
}

/// 剩余的行为链与最终 handler
pub struct Next<'a, R: Request> {
    behaviors: &'a [Arc<dyn PipelineBehavior<R>>],
    handler: &'a dyn RequestHandler<R>,
}

impl<'a, R: Request> Next<'a, R> {
    pub(crate) fn new(
        behaviors: &'a [Arc<dyn PipelineBehavior<R>>],
        handler: &'a dyn RequestHandler<R>,
    ) -> Self {
        Self { behaviors, handler }
    }

    /// 调用下一个行为；链尾调用 handler
    pub async fn run(self, request: R, ctx: &RequestContext) -> AppResult<R::Response> {
        match self.behaviors.split_first() {
            Some((behavior, rest)) => {
                behavior
                    .handle(request, ctx, Next::new(rest, self.handler))
                    .await
            }
            None => self.handler.handle(request, ctx).await,
        }
    }
}
