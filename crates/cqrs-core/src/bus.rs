//! Request Bus

use vnm_errors::AppResult;

use crate::{Pipeline, Request, RequestContext};

/// 为某类请求提供装配好的管道
pub trait PipelineProvider<R: Request> {
    fn pipeline(&self) -> &Pipeline<R>;
}

/// 通过 provider 找到对应管道并调度
pub async fn send<B, R>(bus: &B, request: R, ctx: &RequestContext) -> AppResult<R::Response>
where
    B: PipelineProvider<R> + Sync,
    R: Request,
{
    bus.pipeline().dispatch(request, ctx).await
}
