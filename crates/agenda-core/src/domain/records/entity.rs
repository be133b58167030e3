//! Health record entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An intake/health-history record attached to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: Uuid,
    pub client_id: Uuid,
    pub chief_complaint: String,
    pub medical_history: String,
    pub medications: String,
    pub observations: String,
    pub created_at: DateTime<Utc>,
}

impl HealthRecord {
    /// Create an empty record for a client
    pub fn new(client_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            chief_complaint: String::new(),
            medical_history: String::new(),
            medications: String::new(),
            observations: String::new(),
            created_at: Utc::now(),
        }
    }
}
