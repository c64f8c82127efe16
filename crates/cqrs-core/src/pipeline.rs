//! 管道装配与调度

use std::sync::Arc;

use vnm_errors::{AppError, AppResult};

use crate::{Next, PipelineBehavior, Request, RequestContext, RequestHandler};

/// 某类请求的有序行为链 + handler
///
/// 先添加的行为在最外层
pub struct Pipeline<R: Request> {
    behaviors: Vec<Arc<dyn PipelineBehavior<R>>>,
    handler: Arc<dyn RequestHandler<R>>,
}

impl<R: Request> Pipeline<R> {
    pub fn new(handler: Arc<dyn RequestHandler<R>>) -> Self {
        Self {
            behaviors: Vec::new(),
            handler,
        }
    }

    pub fn with_behavior(mut self, behavior: Arc<dyn PipelineBehavior<R>>) -> Self {
        self.behaviors.push(behavior);
        self
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// 调度请求；取消令牌触发时立即返回 `Cancelled`
    pub async fn dispatch(&self, request: R, ctx: &RequestContext) -> AppResult<R::Response> {
        if ctx.is_cancelled() {
            return Err(cancelled::<R>());
        }

        let next = Next::new(&self.behaviors, self.handler.as_ref());
        tokio::select! {
            biased;
            _ = ctx.cancellation.cancelled() => {
                tracing::warn!(request = R::NAME, request_id = %ctx.request_id, "Request cancelled");
                Err(cancelled::<R>())
            }
            result = next.run(request, ctx) => result,
        }
    }
}

fn cancelled<R: Request>() -> AppError {
    AppError::cancelled(format!("{} was cancelled", R::NAME))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    use super::*;

    struct Echo(String);

    impl Request for Echo {
        const NAME: &'static str = "Echo";
        type Response = String;
    }

    struct EchoHandler {
        delay: Duration,
    }

    #[async_trait]
    impl RequestHandler<Echo> for EchoHandler {
        async fn handle(&self, request: Echo, _ctx: &RequestContext) -> AppResult<String> {
            tokio::time::sleep(self.delay).await;
            Ok(request.0)
        }
    }

    struct Recorder {
        name: &'static str,
        trace: Arc<Mutex<Vec<String>>>,
        short_circuit: bool,
    }

    #[async_trait]
    impl PipelineBehavior<Echo> for Recorder {
        async fn handle(
            &self,
            request: Echo,
            ctx: &RequestContext,
            next: Next<'_, Echo>,
        ) -> AppResult<String> {
            self.trace.lock().unwrap().push(format!("enter {}", self.name));
            if self.short_circuit {
                return Err(AppError::forbidden(self.name));
            }
            let result = next.run(request, ctx).await;
            self.trace.lock().unwrap().push(format!("exit {}", self.name));
            result
        }
    }

    fn recorder(
        name: &'static str,
        trace: &Arc<Mutex<Vec<String>>>,
        short_circuit: bool,
    ) -> Arc<dyn PipelineBehavior<Echo>> {
        Arc::new(Recorder {
            name,
            trace: trace.clone(),
            short_circuit,
        })
    }

    fn handler(delay: Duration) -> Arc<dyn RequestHandler<Echo>> {
        Arc::new(EchoHandler { delay })
    }

    #[tokio::test]
    async fn test_behaviors_run_in_registration_order() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new(handler(Duration::ZERO))
            .with_behavior(recorder("outer", &trace, false))
            .with_behavior(recorder("inner", &trace, false));

        let result = pipeline
            .dispatch(Echo("xin chào".into()), &RequestContext::anonymous())
            .await;

        assert_eq!(result.unwrap(), "xin chào");
        assert_eq!(
            *trace.lock().unwrap(),
            ["enter outer", "enter inner", "exit inner", "exit outer"]
        );
    }

    #[tokio::test]
    async fn test_short_circuit_skips_rest_of_chain() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new(handler(Duration::ZERO))
            .with_behavior(recorder("gate", &trace, true))
            .with_behavior(recorder("inner", &trace, false));

        let result = pipeline
            .dispatch(Echo("x".into()), &RequestContext::anonymous())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(*trace.lock().unwrap(), ["enter gate"]);
    }

    #[tokio::test]
    async fn test_already_cancelled_request_never_runs() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let pipeline =
            Pipeline::new(handler(Duration::ZERO)).with_behavior(recorder("only", &trace, false));
        let token = CancellationToken::new();
        token.cancel();

        let result = pipeline
            .dispatch(
                Echo("x".into()),
                &RequestContext::anonymous().with_cancellation(token),
            )
            .await;

        assert!(result.unwrap_err().is_cancelled());
        assert!(trace.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_slow_handler() {
        let pipeline = Pipeline::new(handler(Duration::from_secs(30)));
        let token = CancellationToken::new();
        let ctx = RequestContext::anonymous().with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let result = pipeline.dispatch(Echo("x".into()), &ctx).await;
        canceller.await.unwrap();

        assert_eq!(result.unwrap_err().status_code(), 499);
    }
}
