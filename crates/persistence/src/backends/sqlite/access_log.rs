//! SRU access log for SQLite.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;

use crate::core::AccessLogStore;
use crate::error::StorageResult;
use crate::types::{AccessLogCompletion, AccessLogEntry, AccessLogRecord};

use super::SqliteBackend;

#[async_trait]
impl AccessLogStore for SqliteBackend {
    async fn open_entry(&self, entry: &AccessLogEntry) -> StorageResult<i64> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO sru_access_log (ip, user_agent, operation, query, format, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.ip,
                entry.user_agent,
                entry.operation,
                entry.query,
                entry.format,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn complete_entry(
        &self,
        id: i64,
        completion: &AccessLogCompletion,
    ) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "UPDATE sru_access_log
             SET response_time_ms = ?1, http_status = ?2, error_message = ?3
             WHERE id = ?4",
            params![
                completion.response_time_ms as i64,
                completion.http_status,
                completion.error_message,
                id,
            ],
        )?;
        Ok(())
    }

    async fn recent_entries(&self, limit: usize) -> StorageResult<Vec<AccessLogRecord>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, ip, user_agent, operation, query, format,
                    response_time_ms, http_status, error_message, created_at
             FROM sru_access_log ORDER BY id DESC LIMIT ?1",
        )?;

        let records = stmt
            .query_map([limit as i64], |row| {
                let response_time_ms: Option<i64> = row.get(6)?;
                let http_status: Option<u16> = row.get(7)?;
                let completion = match (response_time_ms, http_status) {
                    (Some(ms), Some(status)) => Some(AccessLogCompletion {
                        response_time_ms: ms.max(0) as u64,
                        http_status: status,
                        error_message: row.get(8)?,
                    }),
                    _ => None,
                };

                Ok(AccessLogRecord {
                    id: row.get(0)?,
                    entry: AccessLogEntry {
                        ip: row.get(1)?,
                        user_agent: row.get(2)?,
                        operation: row.get(3)?,
                        query: row.get(4)?,
                        format: row.get(5)?,
                    },
                    completion,
                    created_at: row.get(9)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
