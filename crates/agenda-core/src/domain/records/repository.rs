//! Health record repository for database operations

use super::entity::HealthRecord;
use crate::error::{Error, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for health record persistence
#[derive(Debug, Clone)]
pub struct HealthRecordRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct HealthRecordRow {
    id: String,
    client_id: String,
    chief_complaint: String,
    medical_history: String,
    medications: String,
    observations: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl HealthRecordRow {
    fn into_record(self) -> Result<HealthRecord> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|_| Error::Validation(format!("invalid record id '{}'", self.id)))?;
        let client_id = Uuid::parse_str(&self.client_id)
            .map_err(|_| Error::Validation(format!("invalid client id '{}'", self.client_id)))?;
        Ok(HealthRecord {
            id,
            client_id,
            chief_complaint: self.chief_complaint,
            medical_history: self.medical_history,
            medications: self.medications,
            observations: self.observations,
            created_at: self.created_at,
        })
    }
}

const RECORD_COLUMNS: &str =
    "id, client_id, chief_complaint, medical_history, medications, observations, created_at";

impl HealthRecordRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a record by id
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<HealthRecord>> {
        let row: Option<HealthRecordRow> = sqlx::query_as(&format!(
            "SELECT {RECORD_COLUMNS} FROM health_records WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(HealthRecordRow::into_record).transpose()
    }

    /// List all records for a client, newest first
    pub async fn find_by_client(&self, client_id: Uuid) -> Result<Vec<HealthRecord>> {
        let rows: Vec<HealthRecordRow> = sqlx::query_as(&format!(
            "SELECT {RECORD_COLUMNS} FROM health_records WHERE client_id = ? ORDER BY created_at DESC"
        ))
        .bind(client_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(HealthRecordRow::into_record).collect()
    }

    /// Insert a new record
    pub async fn create(&self, record: &HealthRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO health_records (id, client_id, chief_complaint, medical_history, medications, observations, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(record.client_id.to_string())
        .bind(&record.chief_complaint)
        .bind(&record.medical_history)
        .bind(&record.medications)
        .bind(&record.observations)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Update an existing record
    pub async fn update(&self, record: &HealthRecord) -> Result<()> {
        sqlx::query(
            "UPDATE health_records SET chief_complaint = ?, medical_history = ?, medications = ?, observations = ?
             WHERE id = ?",
        )
        .bind(&record.chief_complaint)
        .bind(&record.medical_history)
        .bind(&record.medications)
        .bind(&record.observations)
        .bind(record.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clients::{ClientRepository, NewClient};
    use crate::storage::Database;

    #[tokio::test]
    async fn test_records_are_listed_per_client() {
        let db = Database::in_memory().await.expect("test database");
        let pool = db.pool().clone();

        let client = NewClient::named("Ana Souza").into_client();
        ClientRepository::new(pool.clone())
            .create(&client)
            .await
            .unwrap();

        let repo = HealthRecordRepository::new(pool);
        let mut record = HealthRecord::new(client.id);
        record.chief_complaint = "Lower back pain".into();
        repo.create(&record).await.unwrap();

        let records = repo.find_by_client(client.id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].chief_complaint, "Lower back pain");

        let mut updated = records[0].clone();
        updated.observations = "Improving".into();
        repo.update(&updated).await.unwrap();

        let found = repo.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(found.observations, "Improving");
    }
}
