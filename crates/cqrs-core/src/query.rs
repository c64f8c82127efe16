//! Query trait 定义

use std::time::Duration;

use crate::{Request, RequestHandler};

/// Query trait（只读请求）
pub trait Query: Request {}

/// Query Handler trait
pub trait QueryHandler<Q: Query>: RequestHandler<Q> {}

impl<Q: Query, H: RequestHandler<Q>> QueryHandler<Q> for H {}

/// 可缓存的查询
///
/// 缓存键只描述查询参数，不包含调用者身份；授权在缓存之前完成
pub trait CacheableQuery: Query {
    fn cache_key(&self) -> String;

    /// 覆盖默认 TTL
    fn ttl(&self) -> Option<Duration> {
        None
    }
}
