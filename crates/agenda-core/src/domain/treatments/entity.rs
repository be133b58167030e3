//! Treatment entity

use crate::error::{Error, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A treatment (service) offered by the clinic
///
/// Appointments reference a treatment for their default price and for the
/// duration used in slot-conflict math, so these fields are assumed stable
/// once bookings exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub duration_minutes: i64,
    pub price: f64,
    pub image_url: Option<String>,
}

impl Treatment {
    /// Create a new treatment
    pub fn new(name: impl Into<String>, duration_minutes: i64, price: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            duration_minutes,
            price,
            image_url: None,
        }
    }

    /// Duration must be positive and the price above zero
    pub fn validate(&self) -> Result<()> {
        if self.duration_minutes <= 0 {
            return Err(Error::Validation(
                "treatment duration must be greater than zero".to_string(),
            ));
        }
        if self.price <= 0.0 {
            return Err(Error::Validation(
                "treatment price must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Length of the slot a booking of this treatment occupies
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration_minutes)
    }
}
