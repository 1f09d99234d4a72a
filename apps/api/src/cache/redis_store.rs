//! Redis-backed cache store.
//!
//! The connection is opened on first use and discarded after any error, so a
//! Redis outage at startup or mid-flight only costs cache hits.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::Client;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{CacheError, KeyValueCache};

pub struct RedisCache {
    client: Client,
    conn: Mutex<Option<MultiplexedConnection>>,
    op_timeout: Duration,
}

impl RedisCache {
    pub fn new(client: Client, op_timeout: Duration) -> Self {
        Self {
            client,
            conn: Mutex::new(None),
            op_timeout,
        }
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        let mut slot = self.conn.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let conn = tokio::time::timeout(
            self.op_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| CacheError::Timeout(self.op_timeout))??;

        info!("Connected to Redis");
        *slot = Some(conn.clone());
        Ok(conn)
    }

    async fn reset(&self) {
        *self.conn.lock().await = None;
    }

    /// Runs `cmd` with the operation timeout, dropping the connection on failure.
    async fn query<T: redis::FromRedisValue>(&self, cmd: redis::Cmd) -> Result<T, CacheError> {
        let mut conn = self.connection().await?;

        let result = match tokio::time::timeout(self.op_timeout, cmd.query_async(&mut conn)).await
        {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CacheError::Redis(e)),
            Err(_) => Err(CacheError::Timeout(self.op_timeout)),
        };

        if result.is_err() {
            warn!("Dropping Redis connection after failed command");
            self.reset().await;
        }
        result
    }
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        self.query(cmd).await
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut cmd = redis::cmd("SETEX");
        cmd.arg(key).arg(ttl.as_secs().max(1)).arg(value);
        self.query(cmd).await
    }
}
