//! User repository for database operations

use super::entity::{Role, SystemUser};
use crate::error::{Error, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for system user persistence
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    full_name: String,
    email: String,
    password_hash: String,
    phone: String,
    role: String,
    active: bool,
    registered_at: chrono::DateTime<chrono::Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<SystemUser> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|_| Error::Validation(format!("invalid user id '{}'", self.id)))?;
        let role = Role::from_str(&self.role)
            .ok_or_else(|| Error::Validation(format!("unknown role '{}'", self.role)))?;
        Ok(SystemUser {
            id,
            full_name: self.full_name,
            email: self.email,
            password_hash: self.password_hash,
            phone: self.phone,
            role,
            active: self.active,
            registered_at: self.registered_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, full_name, email, password_hash, phone, role, active, registered_at";

impl UserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all users
    pub async fn find_all(&self) -> Result<Vec<SystemUser>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY full_name"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    /// Get a user by id
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SystemUser>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<SystemUser>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Insert a new user
    pub async fn create(&self, user: &SystemUser) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, full_name, email, password_hash, phone, role, active, registered_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.role.as_str())
        .bind(user.active)
        .bind(user.registered_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Update an existing user
    pub async fn update(&self, user: &SystemUser) -> Result<()> {
        sqlx::query(
            "UPDATE users SET full_name = ?, email = ?, password_hash = ?, phone = ?, role = ?, active = ?
             WHERE id = ?",
        )
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.role.as_str())
        .bind(user.active)
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Flip the active flag off; rows are never physically removed
    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET active = 0 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
