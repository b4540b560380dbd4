//! MySQL implementation of the TokenRepository trait
//!
//! Status updates are guarded with `WHERE status = 'P'`: a terminal row can
//! never be rewritten, which enforces at the storage layer the same
//! monotonicity the entity enforces in memory.

use std::net::IpAddr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use vt_core::domain::entities::verification_token::{Channel, TokenStatus, VerificationToken};
use vt_core::errors::DomainError;
use vt_core::repositories::TokenRepository;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<VerificationToken, DomainError> {
        let id: String = get(row, "id")?;
        let client_id: String = get(row, "client_id")?;
        let channel: String = get(row, "channel")?;
        let status: String = get(row, "status")?;
        let requester_ip: String = get(row, "requester_ip")?;

        Ok(VerificationToken {
            id: parse_uuid(&id, "token id")?,
            client_id: parse_uuid(&client_id, "client id")?,
            code: get(row, "code")?,
            code_hash: get(row, "code_hash")?,
            channel: Channel::parse(&channel).ok_or_else(|| DomainError::Internal {
                message: format!("Unknown channel code in storage: {}", channel),
            })?,
            status: TokenStatus::parse(&status).ok_or_else(|| DomainError::Internal {
                message: format!("Unknown token status in storage: {}", status),
            })?,
            requester_ip: requester_ip
                .parse::<IpAddr>()
                .map_err(|e| DomainError::Internal {
                    message: format!("Invalid requester IP in storage: {}", e),
                })?,
            created_at: get::<DateTime<Utc>>(row, "created_at")?,
            expires_at: get::<DateTime<Utc>>(row, "expires_at")?,
            elapsed_seconds: get(row, "elapsed_seconds")?,
        })
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

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn create(&self, token: VerificationToken) -> Result<VerificationToken, DomainError> {
        let query = r#"
            INSERT INTO verification_tokens (
                id, client_id, code, code_hash, channel, status,
                requester_ip, created_at, expires_at, elapsed_seconds
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.client_id.to_string())
            .bind(&token.code)
            .bind(&token.code_hash)
            .bind(token.channel.as_code())
            .bind(token.status.as_code())
            .bind(token.requester_ip.to_string())
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.elapsed_seconds)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to create verification token: {}", e),
            })?;

        Ok(token)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationToken>, DomainError> {
        let query = r#"
            SELECT id, client_id, code, code_hash, channel, status,
                   requester_ip, created_at, expires_at, elapsed_seconds
            FROM verification_tokens
            WHERE id = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find verification token: {}", e),
            })?;
        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn update(&self, token: VerificationToken) -> Result<VerificationToken, DomainError> {
        // Only pending rows may change; once terminal the row is immutable
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
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update verification token: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(token.id).await? {
                Some(stored) => Err(DomainError::Conflict {
                    message: format!(
                        "Token {} is already {:?}, no further transition allowed",
                        stored.id, stored.status
                    ),
                }),
                None => Err(DomainError::NotFound {
                    resource: "VerificationToken".to_string(),
                }),
            };
        }
        Ok(token)
    }
}
