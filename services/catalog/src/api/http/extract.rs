//! 请求上下文提取器

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use vnm_auth_core::Principal;
use vnm_cqrs_core::RequestContext;
use vnm_errors::AppError;

use super::AppState;
use super::error::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 从 Bearer JWT 还原主体
///
/// 没有 Authorization 头时为匿名主体；令牌无效返回 401
pub struct Caller(pub RequestContext);

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let principal = match parts.headers.get(header::AUTHORIZATION) {
            None => Principal::anonymous(),
            Some(value) => {
                let token = value
                    .to_str()
                    .ok()
                    .and_then(|v| v.strip_prefix("Bearer "))
                    .map(str::trim)
                    .ok_or_else(|| AppError::unauthorized("Expected a Bearer token"))?;
                state.tokens.authenticate(token).inspect_err(|e| {
                    tracing::warn!(error = %e, "Token validation failed");
                })?
            }
        };

        let mut ctx = RequestContext::new(principal);
        if let Some(request_id) = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
        {
            ctx = ctx.with_request_id(request_id);
        }
        Ok(Caller(ctx))
    }
}

/// JSON 请求体；解析失败按校验错误返回 400 problem+json
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(body_rejection(rejection)),
        }
    }
}

fn body_rejection(rejection: JsonRejection) -> ApiError {
    tracing::debug!(status = %rejection.status(), "Request body rejected");
    ApiError(AppError::validation(rejection.body_text()))
}
