//! Client repository for database operations

use super::entity::Client;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for client persistence
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    id: String,
    full_name: String,
    cpf: Option<String>,
    email: String,
    phone: String,
    birth_date: Option<String>,
    registered_at: chrono::DateTime<chrono::Utc>,
    active: bool,
}

impl ClientRow {
    fn into_client(self) -> Result<Client> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|_| Error::Validation(format!("invalid client id '{}'", self.id)))?;
        let birth_date = self
            .birth_date
            .map(|d| {
                NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                    .map_err(|_| Error::Validation(format!("invalid stored birth date '{}'", d)))
            })
            .transpose()?;
        Ok(Client {
            id,
            full_name: self.full_name,
            cpf: self.cpf,
            email: self.email,
            phone: self.phone,
            birth_date,
            registered_at: self.registered_at,
            active: self.active,
        })
    }
}

const CLIENT_COLUMNS: &str =
    "id, full_name, cpf, email, phone, birth_date, registered_at, active";

impl ClientRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all clients
    pub async fn find_all(&self) -> Result<Vec<Client>> {
        let rows: Vec<ClientRow> = sqlx::query_as(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY full_name"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ClientRow::into_client).collect()
    }

    /// Get a client by id
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>> {
        let row: Option<ClientRow> =
            sqlx::query_as(&format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(ClientRow::into_client).transpose()
    }

    /// Partial name search
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Client>> {
        let rows: Vec<ClientRow> = sqlx::query_as(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE full_name LIKE '%' || ? || '%' ORDER BY full_name"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ClientRow::into_client).collect()
    }

    /// Get a client by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Client>> {
        let row: Option<ClientRow> =
            sqlx::query_as(&format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE email = ?"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(ClientRow::into_client).transpose()
    }

    /// List clients by active flag
    pub async fn find_by_active(&self, active: bool) -> Result<Vec<Client>> {
        let rows: Vec<ClientRow> = sqlx::query_as(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE active = ? ORDER BY full_name"
        ))
        .bind(active)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ClientRow::into_client).collect()
    }

    /// Insert a new client
    pub async fn create(&self, client: &Client) -> Result<()> {
        sqlx::query(
            "INSERT INTO clients (id, full_name, cpf, email, phone, birth_date, registered_at, active)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(client.id.to_string())
        .bind(&client.full_name)
        .bind(&client.cpf)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.birth_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(client.registered_at)
        .bind(client.active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Update an existing client
    pub async fn update(&self, client: &Client) -> Result<()> {
        sqlx::query(
            "UPDATE clients SET full_name = ?, cpf = ?, email = ?, phone = ?, birth_date = ?, active = ?
             WHERE id = ?",
        )
        .bind(&client.full_name)
        .bind(&client.cpf)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.birth_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(client.active)
        .bind(client.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Flip the active flag off; the record stays in place
    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE clients SET active = 0 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
