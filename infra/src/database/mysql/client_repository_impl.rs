//! MySQL implementation of the ClientRepository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use vt_core::domain::entities::client::{Client, DocumentType, Operator};
use vt_core::errors::DomainError;
use vt_core::repositories::ClientRepository;

/// MySQL implementation of ClientRepository
pub struct MySqlClientRepository {
    pool: MySqlPool,
}

impl MySqlClientRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_client(row: &sqlx::mysql::MySqlRow) -> Result<Client, DomainError> {
        let id: String = get(row, "id")?;
        let type_code: String = get(row, "document_type")?;
        let operator: Option<String> = get(row, "operator")?;
        let current_token_id: Option<String> = get(row, "current_token_id")?;

        Ok(Client {
            id: parse_uuid(&id, "client id")?,
            document_type: DocumentType::parse(&type_code).ok_or_else(|| {
                DomainError::Internal {
                    message: format!("Unknown document type code in storage: {}", type_code),
                }
            })?,
            document: get(row, "document")?,
            check_digit: get(row, "check_digit")?,
            given_names: get(row, "given_names")?,
            paternal_surname: get(row, "paternal_surname")?,
            maternal_surname: get(row, "maternal_surname")?,
            phone: get(row, "phone")?,
            operator: operator
                .map(|code| {
                    Operator::parse(&code).ok_or_else(|| DomainError::Internal {
                        message: format!("Unknown operator in storage: {}", code),
                    })
                })
                .transpose()?,
            email: get(row, "email")?,
            department: get(row, "department")?,
            province: get(row, "province")?,
            district: get(row, "district")?,
            accepted_terms: get(row, "accepted_terms")?,
            completed: get(row, "completed")?,
            current_token_id: current_token_id
                .map(|id| parse_uuid(&id, "current token id"))
                .transpose()?,
            created_at: get::<DateTime<Utc>>(row, "created_at")?,
            updated_at: get::<DateTime<Utc>>(row, "updated_at")?,
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

const CLIENT_COLUMNS: &str = "id, document_type, document, check_digit, given_names, \
     paternal_surname, maternal_surname, phone, operator, email, department, \
     province, district, accepted_terms, completed, current_token_id, \
     created_at, updated_at";

#[async_trait]
impl ClientRepository for MySqlClientRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, DomainError> {
        let query = format!("SELECT {} FROM clients WHERE id = ? LIMIT 1", CLIENT_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find client: {}", e),
            })?;
        row.as_ref().map(Self::row_to_client).transpose()
    }

    async fn find_by_document(&self, document: &str) -> Result<Option<Client>, DomainError> {
        let query = format!(
            "SELECT {} FROM clients WHERE document = ? LIMIT 1",
            CLIENT_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(document)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find client by document: {}", e),
            })?;
        row.as_ref().map(Self::row_to_client).transpose()
    }

    async fn create(&self, client: Client) -> Result<Client, DomainError> {
        let query = r#"
            INSERT INTO clients (
                id, document_type, document, check_digit, given_names,
                paternal_surname, maternal_surname, phone, operator, email,
                department, province, district, accepted_terms, completed,
                current_token_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(client.id.to_string())
            .bind(client.document_type.as_str())
            .bind(&client.document)
            .bind(&client.check_digit)
            .bind(&client.given_names)
            .bind(&client.paternal_surname)
            .bind(&client.maternal_surname)
            .bind(&client.phone)
            .bind(client.operator.map(|o| o.as_str()))
            .bind(&client.email)
            .bind(&client.department)
            .bind(&client.province)
            .bind(&client.district)
            .bind(client.accepted_terms)
            .bind(client.completed)
            .bind(client.current_token_id.map(|id| id.to_string()))
            .bind(client.created_at)
            .bind(client.updated_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(client),
            // The unique index on `document` is the authority on duplicates
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DomainError::Conflict {
                    message: "Document number already registered".to_string(),
                })
            }
            Err(e) => Err(DomainError::Internal {
                message: format!("Failed to create client: {}", e),
            }),
        }
    }

    async fn update(&self, client: Client) -> Result<Client, DomainError> {
        let query = r#"
            UPDATE clients SET
                phone = ?, operator = ?, email = ?, department = ?,
                province = ?, district = ?, accepted_terms = ?, completed = ?,
                current_token_id = ?, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&client.phone)
            .bind(client.operator.map(|o| o.as_str()))
            .bind(&client.email)
            .bind(&client.department)
            .bind(&client.province)
            .bind(&client.district)
            .bind(client.accepted_terms)
            .bind(client.completed)
            .bind(client.current_token_id.map(|id| id.to_string()))
            .bind(client.updated_at)
            .bind(client.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update client: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "Client".to_string(),
            });
        }
        Ok(client)
    }
}
