//! Rate-limit windows for SQLite.

use async_trait::async_trait;
use rusqlite::{OptionalExtension, TransactionBehavior, params};

use crate::core::RateLimitStore;
use crate::error::StorageResult;
use crate::types::RateLimitWindow;

use super::SqliteBackend;

/// Inserts a fresh window, increments a live one or restarts an expired one,
/// returning the resulting count. `?3` is the oldest live `window_start`.
const UPSERT_WINDOW: &str = "INSERT INTO sru_rate_limits (ip, request_count, window_start, last_request)
     VALUES (?1, 1, ?2, ?2)
     ON CONFLICT(ip) DO UPDATE SET
         request_count = CASE
             WHEN sru_rate_limits.window_start > ?3 THEN sru_rate_limits.request_count + 1
             ELSE 1
         END,
         window_start = CASE
             WHEN sru_rate_limits.window_start > ?3 THEN sru_rate_limits.window_start
             ELSE excluded.window_start
         END,
         last_request = excluded.last_request
     RETURNING request_count";

#[async_trait]
impl RateLimitStore for SqliteBackend {
    async fn record_request(&self, ip: &str, now: i64, window_secs: i64) -> StorageResult<u32> {
        let cutoff = now - window_secs;

        let mut conn = self.get_connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let removed = tx.execute(
            "DELETE FROM sru_rate_limits WHERE window_start <= ?1",
            [cutoff],
        )?;
        if removed > 0 {
            tracing::debug!(removed, "Purged stale rate-limit windows");
        }

        let count: i64 = tx.query_row(UPSERT_WINDOW, params![ip, now, cutoff], |row| row.get(0))?;

        tx.commit()?;

        Ok(count.clamp(0, u32::MAX as i64) as u32)
    }

    async fn window(&self, ip: &str) -> StorageResult<Option<RateLimitWindow>> {
        let conn = self.get_connection()?;
        let window = conn
            .query_row(
                "SELECT ip, request_count, window_start, last_request
                 FROM sru_rate_limits WHERE ip = ?1",
                [ip],
                |row| {
                    Ok(RateLimitWindow {
                        ip: row.get(0)?,
                        request_count: row.get(1)?,
                        window_start: row.get(2)?,
                        last_request: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(window)
    }
}
