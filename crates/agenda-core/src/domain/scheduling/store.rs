//! Entity store trait for the booking engine
//!
//! Abstracts the durable storage the engine consults: entity lookups,
//! overlap queries and appointment writes. "Not found" is `Ok(None)`,
//! distinct from a store failure.

use super::entity::{Appointment, Slot};
use super::state::AppointmentStatus;
use crate::domain::clients::Client;
use crate::domain::treatments::Treatment;
use crate::domain::users::SystemUser;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Storage operations consumed by [`super::BookingService`]
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    // ========== Referenced entities ==========

    /// Look up a client by id
    async fn find_client(&self, id: Uuid) -> Result<Option<Client>>;

    /// Look up a treatment by id
    async fn find_treatment(&self, id: Uuid) -> Result<Option<Treatment>>;

    /// Look up the system user behind a practitioner reference.
    ///
    /// Role checking is the engine's job; this returns whatever user the
    /// id resolves to.
    async fn find_practitioner_user(&self, id: Uuid) -> Result<Option<SystemUser>>;

    // ========== Appointment reads ==========

    /// Get an appointment by id
    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>>;

    /// All appointments of one practitioner whose occupied interval
    /// overlaps `slot` (half-open semantics), regardless of status
    async fn find_overlapping(&self, practitioner_id: Uuid, slot: &Slot)
        -> Result<Vec<Appointment>>;

    /// List all appointments, ordered by start time
    async fn find_all(&self) -> Result<Vec<Appointment>>;

    /// List appointments of one client
    async fn find_by_client(&self, client_id: Uuid) -> Result<Vec<Appointment>>;

    /// List appointments of one practitioner
    async fn find_by_practitioner(&self, practitioner_id: Uuid) -> Result<Vec<Appointment>>;

    /// List appointments starting within `[start, end)`
    async fn find_by_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>>;

    /// List appointments in a given status
    async fn find_by_status(&self, status: AppointmentStatus) -> Result<Vec<Appointment>>;

    // ========== Appointment writes ==========

    /// Insert a new appointment
    async fn insert_appointment(&self, appointment: &Appointment) -> Result<()>;

    /// Replace all mutable fields of an appointment
    async fn update_appointment(&self, appointment: &Appointment) -> Result<()>;

    /// Persist only the status column
    async fn update_appointment_status(&self, id: Uuid, status: AppointmentStatus) -> Result<()>;

    /// Hard-delete an appointment (administrative removal)
    async fn delete_appointment(&self, id: Uuid) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify trait is object-safe
    fn _assert_object_safe(_: &dyn SchedulingStore) {}
}
