//! 校验行为

use std::sync::Arc;

use async_trait::async_trait;
use vnm_errors::{AppError, AppResult, FieldError};

use crate::{Next, PipelineBehavior, Request, RequestContext};

/// 请求校验器，返回该请求的全部字段错误
pub trait Validator<R>: Send + Sync {
    fn validate(&self, request: &R) -> Vec<FieldError>;
}

impl<R, F> Validator<R> for F
where
    F: Fn(&R) -> Vec<FieldError> + Send + Sync,
{
    fn validate(&self, request: &R) -> Vec<FieldError> {
        self(request)
    }
}

/// 校验行为：运行所有校验器，汇总失败为一个 400 错误
pub struct ValidationBehavior<R: Request> {
    validators: Vec<Arc<dyn Validator<R>>>,
}

impl<R: Request> ValidationBehavior<R> {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    pub fn with(mut self, validator: Arc<dyn Validator<R>>) -> Self {
        self.validators.push(validator);
        self
    }
}

impl<R: Request> Default for ValidationBehavior<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Request> PipelineBehavior<R> for ValidationBehavior<R> {
    async fn handle(
        &self,
        request: R,
        ctx: &RequestContext,
        next: Next<'_, R>,
    ) -> AppResult<R::Response> {
        let errors: Vec<FieldError> = self
            .validators
            .iter()
            .flat_map(|v| v.validate(&request))
            .collect();

        if !errors.is_empty() {
            tracing::debug!(request = R::NAME, failures = errors.len(), "Validation failed");
            return Err(AppError::validation_failed(errors));
        }

        next.run(request, ctx).await
    }
}
