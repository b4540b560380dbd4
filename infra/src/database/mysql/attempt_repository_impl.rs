//! MySQL implementation of the AttemptRepository trait
//!
//! Ledger mutations run inside a transaction with `SELECT ... FOR UPDATE`,
//! so two concurrent charges against the same (client, channel) pair are
//! applied one after the other and neither increment is lost. Charges that
//! carry a token mutation write both rows in the same transaction: any error
//! before commit rolls the whole unit of work back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use vt_core::domain::entities::attempt_record::AttemptRecord;
use vt_core::domain::entities::verification_token::{Channel, VerificationToken};
use vt_core::errors::DomainError;
use vt_core::repositories::AttemptRepository;

/// MySQL implementation of AttemptRepository
pub struct MySqlAttemptRepository {
    pool: MySqlPool,
}

impl MySqlAttemptRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<AttemptRecord, DomainError> {
        let id: String = get(row, "id")?;
        let client_id: String = get(row, "client_id")?;
        let channel: String = get(row, "channel")?;

        Ok(AttemptRecord {
            id: parse_uuid(&id, "attempt record id")?,
            client_id: parse_uuid(&client_id, "client id")?,
            channel: Channel::parse(&channel).ok_or_else(|| DomainError::Internal {
                message: format!("Unknown channel code in storage: {}", channel),
            })?,
            count: get(row, "count")?,
            last_attempt_at: get::<Option<DateTime<Utc>>>(row, "last_attempt_at")?,
            blocked: get(row, "blocked")?,
        })
    }

    /// Insert the pair's row if it does not exist yet. The unique index on
    /// (client_id, channel) makes concurrent first-use inserts collapse into
    /// a single row.
    async fn ensure_row<'e, E>(
        executor: E,
        client_id: Uuid,
        channel: Channel,
    ) -> Result<(), DomainError>
    where
        E: sqlx::Executor<'e, Database = sqlx::MySql>,
    {
        let query = r#"
            INSERT INTO attempt_records (id, client_id, channel, count, last_attempt_at, blocked)
            VALUES (?, ?, ?, 0, NULL, FALSE)
            ON DUPLICATE KEY UPDATE id = id
        "#;
        sqlx::query(query)
            .bind(Uuid::new_v4().to_string())
            .bind(client_id.to_string())
            .bind(channel.as_code())
            .execute(executor)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to initialize attempt record: {}", e),
            })?;
        Ok(())
    }

    /// Lock and load the pair's row within the caller's transaction
    async fn lock_record(
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
        client_id: Uuid,
        channel: Channel,
    ) -> Result<AttemptRecord, DomainError> {
        Self::ensure_row(&mut **tx, client_id, channel).await?;

        let locked = format!("{} FOR UPDATE", SELECT_RECORD);
        let row = sqlx::query(&locked)
            .bind(client_id.to_string())
            .bind(channel.as_code())
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to lock attempt record: {}", e),
            })?;
        Self::row_to_record(&row)
    }

    async fn store_record(
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
        record: &AttemptRecord,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE attempt_records SET count = ?, last_attempt_at = ?, blocked = ? WHERE id = ?",
        )
        .bind(record.count)
        .bind(record.last_attempt_at)
        .bind(record.blocked)
        .bind(record.id.to_string())
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to record attempt: {}", e),
        })?;
        Ok(())
    }

    /// Write a token status change within the caller's transaction, with the
    /// same pending-only guard the token repository enforces
    async fn store_token(
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
        token: &VerificationToken,
    ) -> Result<(), DomainError> {
        let query = r#"
            UPDATE verification_tokens
            SET status = ?, expires_at = ?, elapsed_seconds = ?
            WHERE id = ? AND status = 'P'
        "#;

        let result = sqlx::query(query)
            .bind(token.status.as_code())
            .bind(token.expires_at)
            .bind(token.elapsed_seconds)
            .bind(token.id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update verification token: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Conflict {
                message: format!(
                    "Token {} is no longer pending, no further transition allowed",
                    token.id
                ),
            });
        }
        Ok(())
    }
}

fn get<'r, T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>>(
    row: &'r sqlx::mysql::MySqlRow,
    column: &str,
) -> Result<T, DomainError> {
    row.try_get(column).map_err(|e| DomainError::Internal {
        message: format!("Failed to read column {}: {}", column, e),
    })
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| DomainError::Internal {
        message: format!("Invalid {} in storage: {}", what, e),
    })
}

const SELECT_RECORD: &str = r#"
    SELECT id, client_id, channel, count, last_attempt_at, blocked
    FROM attempt_records
    WHERE client_id = ? AND channel = ?
"#;

#[async_trait]
impl AttemptRepository for MySqlAttemptRepository {
    async fn get_or_create(
        &self,
        client_id: Uuid,
        channel: Channel,
    ) -> Result<AttemptRecord, DomainError> {
        Self::ensure_row(&self.pool, client_id, channel).await?;

        let row = sqlx::query(SELECT_RECORD)
            .bind(client_id.to_string())
            .bind(channel.as_code())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to load attempt record: {}", e),
            })?;
        Self::row_to_record(&row)
    }

    async fn record_failure(
        &self,
        block_threshold: u32,
        mut token: VerificationToken,
    ) -> Result<(AttemptRecord, VerificationToken), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to start transaction: {}", e),
        })?;

        let mut record = Self::lock_record(&mut tx, token.client_id, token.channel).await?;
        record.register_failure(block_threshold);
        Self::store_record(&mut tx, &record).await?;

        if record.count >= block_threshold {
            token.mark_cancelled()?;
            Self::store_token(&mut tx, &token).await?;
        }

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit attempt record: {}", e),
        })?;
        Ok((record, token))
    }

    async fn record_cancellation(
        &self,
        block_threshold: u32,
        mut token: VerificationToken,
    ) -> Result<(AttemptRecord, VerificationToken), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to start transaction: {}", e),
        })?;

        token.mark_cancelled()?;
        Self::store_token(&mut tx, &token).await?;

        let mut record = Self::lock_record(&mut tx, token.client_id, token.channel).await?;
        record.register_failure(block_threshold);
        Self::store_record(&mut tx, &record).await?;

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit attempt record: {}", e),
        })?;
        Ok((record, token))
    }

    async fn record_success(
        &self,
        client_id: Uuid,
        channel: Channel,
    ) -> Result<AttemptRecord, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to start transaction: {}", e),
        })?;

        let mut record = Self::lock_record(&mut tx, client_id, channel).await?;
        record.register_success();

        sqlx::query("UPDATE attempt_records SET blocked = ? WHERE id = ?")
            .bind(record.blocked)
            .bind(record.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to record successful attempt: {}", e),
            })?;

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit attempt record: {}", e),
        })?;
        Ok(record)
    }
}
