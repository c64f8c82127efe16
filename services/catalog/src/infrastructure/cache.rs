//! 进程内查询缓存 (moka)

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache as MokaCache;
use vnm_errors::AppResult;
use vnm_ports::CachePort;

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Option<Duration>,
}

/// 每个条目按写入时给定的 TTL 过期，覆盖写入重新计时
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        entry.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl
    }
}

/// 本地缓存；过期与容量淘汰都交给 moka
#[derive(Clone)]
pub struct LocalCache {
    entries: MokaCache<String, Entry>,
}

impl LocalCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: MokaCache::builder()
                .max_capacity(max_capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    /// 当前条目数（含尚未被清理的过期条目）
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    pub async fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks().await;
    }
}

#[async_trait]
impl CachePort for LocalCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        let entry = Entry {
            value: value.to_string(),
            ttl,
        };
        self.entries.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.invalidate(key).await;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        let keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.as_ref().clone())
            .collect();

        for key in &keys {
            self.entries.invalidate(key).await;
        }
        Ok(keys.len() as u64)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.entries.contains_key(key))
    }
}
