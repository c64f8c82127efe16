//! Redis 连接管理

use redis::Client;
use redis::aio::ConnectionManager;
use vnm_errors::{AppError, AppResult};

/// 创建 Redis 连接管理器（断线自动重连）
pub async fn create_connection_manager(url: &str) -> AppResult<ConnectionManager> {
    let client = Client::open(url)
        .map_err(|e| AppError::internal(format!("Failed to create Redis client: {}", e)))?;

    ConnectionManager::new(client).await.map_err(|e| {
        AppError::external_service(format!("Failed to connect to Redis: {}", e))
    })
}

/// 启动时探测连接
pub async fn check_connection(conn: &mut ConnectionManager) -> AppResult<()> {
    redis::cmd("PING")
        .query_async::<String>(conn)
        .await
        .map_err(|e| AppError::external_service(format!("Redis ping failed: {}", e)))?;
    Ok(())
}
