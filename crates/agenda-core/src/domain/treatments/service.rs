//! Treatment service

use super::entity::Treatment;
use super::repository::TreatmentRepository;
use crate::error::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Service for managing the treatment catalog
#[derive(Debug, Clone)]
pub struct TreatmentService {
    repository: TreatmentRepository,
}

impl TreatmentService {
    /// Create a new treatment service
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: TreatmentRepository::new(pool),
        }
    }

    /// List all treatments
    pub async fn all(&self) -> Result<Vec<Treatment>> {
        self.repository.find_all().await
    }

    /// Get a treatment by id
    pub async fn by_id(&self, id: Uuid) -> Result<Option<Treatment>> {
        self.repository.find_by_id(id).await
    }

    /// Add a treatment to the catalog
    pub async fn create(&self, treatment: &Treatment) -> Result<()> {
        treatment.validate()?;
        self.repository.create(treatment).await
    }

    /// Update an existing treatment
    pub async fn update(&self, treatment: &Treatment) -> Result<()> {
        treatment.validate()?;
        self.repository.update(treatment).await
    }

    /// Remove a treatment from the catalog
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::storage::Database;

    async fn create_test_pool() -> SqlitePool {
        let db = Database::in_memory()
            .await
            .expect("Failed to create test database");
        db.pool().clone()
    }

    #[tokio::test]
    async fn test_create_validates_fields() {
        let service = TreatmentService::new(create_test_pool().await);

        let err = service
            .create(&Treatment::new("Free massage", 60, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        service
            .create(&Treatment::new("Massage", 60, 100.0))
            .await
            .unwrap();
        assert_eq!(service.all().await.unwrap().len(), 1);
    }
}
