//! 查询缓存行为

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use vnm_errors::AppResult;
use vnm_ports::CachePort;

use crate::{CacheableQuery, Next, PipelineBehavior, Request, RequestContext};

/// 缓存行为：命中直接返回，未命中调用 handler 并写入缓存
///
/// 缓存后端出错时按未命中处理，不影响请求结果
pub struct CachingBehavior {
    cache: Arc<dyn CachePort>,
    default_ttl: Duration,
}

impl CachingBehavior {
    pub fn new(cache: Arc<dyn CachePort>, default_ttl: Duration) -> Self {
        Self { cache, default_ttl }
    }

    /// 某类查询所有缓存键的公共前缀，用于整体失效
    pub fn key_prefix<R: Request>() -> String {
        format!("query:{}:", R::NAME)
    }

    pub fn cache_key<Q: CacheableQuery>(query: &Q) -> String {
        format!("{}{}", Self::key_prefix::<Q>(), query.cache_key())
    }
}

#[async_trait]
impl<Q> PipelineBehavior<Q> for CachingBehavior
where
    Q: CacheableQuery,
    Q::Response: Serialize + DeserializeOwned,
{
    async fn handle(
        &self,
        request: Q,
        ctx: &RequestContext,
        next: Next<'_, Q>,
    ) -> AppResult<Q::Response> {
        let key = Self::cache_key(&request);
        let ttl = request.ttl().unwrap_or(self.default_ttl);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => match serde_json::from_str(&cached) {
                Ok(value) => {
                    tracing::debug!(request = Q::NAME, key = %key, "Query cache hit");
                    metrics::counter!("query_cache_hits_total", "request" => Q::NAME).increment(1);
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
            }
        }
        metrics::counter!("query_cache_misses_total", "request" => Q::NAME).increment(1);

        let response = next.run(request, ctx).await?;

        match serde_json::to_string(&response) {
            Ok(json) => {
                if let Err(e) = self.cache.set(&key, &json, Some(ttl)).await {
                    tracing::warn!(key = %key, error = %e, "Cache write failed");
                }
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "Query result not serializable"),
        }

        Ok(response)
    }
}
