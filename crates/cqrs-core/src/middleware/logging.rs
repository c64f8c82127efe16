//! 日志行为

use std::time::Instant;

use async_trait::async_trait;
use vnm_errors::AppResult;

use crate::{Next, PipelineBehavior, Request, RequestContext};

/// 日志行为：记录开始、耗时与错误，结果原样返回
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingBehavior;

#[async_trait]
impl<R: Request> PipelineBehavior<R> for LoggingBehavior {
    async fn handle(
        &self,
        request: R,
        ctx: &RequestContext,
        next: Next<'_, R>,
    ) -> AppResult<R::Response> {
        let start = Instant::now();
        tracing::info!(
            request = R::NAME,
            request_id = %ctx.request_id,
            principal = %ctx.principal.display_name(),
            "Handling request"
        );

        let result = next.run(request, ctx).await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let outcome = match &result {
            Ok(_) => {
                tracing::info!(request = R::NAME, request_id = %ctx.request_id, elapsed_ms, "Request handled");
                "ok"
            }
            Err(e) if e.is_server_error() => {
                tracing::error!(request = R::NAME, request_id = %ctx.request_id, elapsed_ms, error = %e, "Request failed");
                "error"
            }
            Err(e) => {
                tracing::warn!(request = R::NAME, request_id = %ctx.request_id, elapsed_ms, error = %e, "Request rejected");
                "rejected"
            }
        };

        metrics::counter!("pipeline_requests_total", "request" => R::NAME, "outcome" => outcome)
            .increment(1);
        metrics::histogram!("pipeline_request_duration_ms", "request" => R::NAME).record(elapsed_ms);

        result
    }
}
