//! Request trait 定义

use async_trait::async_trait;
use vnm_errors::AppResult;

use crate::RequestContext;

/// 所有经过管道调度的请求
pub trait Request: Send + Sync + 'static {
    /// 请求名称，用于日志、指标与授权注册表
    const NAME: &'static str;

    type Response: Send + Sync + 'static;
}

/// Request Handler trait
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(&self, request: R, ctx: &RequestContext) -> AppResult<R::Response>;
}
