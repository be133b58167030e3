//! Treatment repository for database operations

use super::entity::Treatment;
use crate::error::{Error, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for treatment persistence
#[derive(Debug, Clone)]
pub struct TreatmentRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct TreatmentRow {
    id: String,
    name: String,
    description: String,
    duration_minutes: i64,
    price: f64,
    image_url: Option<String>,
}

impl TreatmentRow {
    fn into_treatment(self) -> Result<Treatment> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|_| Error::Validation(format!("invalid treatment id '{}'", self.id)))?;
        Ok(Treatment {
            id,
            name: self.name,
            description: self.description,
            duration_minutes: self.duration_minutes,
            price: self.price,
            image_url: self.image_url,
        })
    }
}

const TREATMENT_COLUMNS: &str = "id, name, description, duration_minutes, price, image_url";

impl TreatmentRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all treatments
    pub async fn find_all(&self) -> Result<Vec<Treatment>> {
        let rows: Vec<TreatmentRow> = sqlx::query_as(&format!(
            "SELECT {TREATMENT_COLUMNS} FROM treatments ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TreatmentRow::into_treatment).collect()
    }

    /// Get a treatment by id
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Treatment>> {
        let row: Option<TreatmentRow> = sqlx::query_as(&format!(
            "SELECT {TREATMENT_COLUMNS} FROM treatments WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TreatmentRow::into_treatment).transpose()
    }

    /// Insert a new treatment
    pub async fn create(&self, treatment: &Treatment) -> Result<()> {
        sqlx::query(
            "INSERT INTO treatments (id, name, description, duration_minutes, price, image_url)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(treatment.id.to_string())
        .bind(&treatment.name)
        .bind(&treatment.description)
        .bind(treatment.duration_minutes)
        .bind(treatment.price)
        .bind(&treatment.image_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Update an existing treatment
    pub async fn update(&self, treatment: &Treatment) -> Result<()> {
        sqlx::query(
            "UPDATE treatments SET name = ?, description = ?, duration_minutes = ?, price = ?, image_url = ?
             WHERE id = ?",
        )
        .bind(&treatment.name)
        .bind(&treatment.description)
        .bind(treatment.duration_minutes)
        .bind(treatment.price)
        .bind(&treatment.image_url)
        .bind(treatment.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a treatment
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM treatments WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    async fn create_test_pool() -> SqlitePool {
        let db = Database::in_memory()
            .await
            .expect("Failed to create test database");
        db.pool().clone()
    }

    #[tokio::test]
    async fn test_create_and_find_treatment() {
        let repo = TreatmentRepository::new(create_test_pool().await);

        let treatment = Treatment::new("Deep tissue massage", 60, 100.0);
        repo.create(&treatment).await.unwrap();

        let found = repo.find_by_id(treatment.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Deep tissue massage");
        assert_eq!(found.duration_minutes, 60);
        assert_eq!(found.price, 100.0);
    }

    #[tokio::test]
    async fn test_delete_removes_the_row() {
        let repo = TreatmentRepository::new(create_test_pool().await);

        let treatment = Treatment::new("Hot stones", 45, 80.0);
        repo.create(&treatment).await.unwrap();
        repo.delete(treatment.id).await.unwrap();

        assert!(repo.find_by_id(treatment.id).await.unwrap().is_none());
    }
}
