//! Booking engine
//!
//! Orchestrates creation and mutation of appointments: referential and
//! temporal validation, slot-conflict detection, the status lifecycle and
//! the access policy. Every mutation authorizes the actor before touching
//! the store.

use super::entity::{Appointment, NewAppointment, Slot};
use super::locks::PractitionerLocks;
use super::policy::{authorize, Actor, AppointmentAction};
use super::repository::SqliteSchedulingStore;
use super::state::AppointmentStatus;
use super::store::SchedulingStore;
use crate::domain::users::Role;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

/// Service for booking and mutating appointments
pub struct BookingService {
    store: Arc<dyn SchedulingStore>,
    locks: PractitionerLocks,
}

impl BookingService {
    /// Create a booking service over any entity store
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self {
            store,
            locks: PractitionerLocks::new(),
        }
    }

    /// Create a booking service over the SQLite store
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self::new(Arc::new(SqliteSchedulingStore::new(pool)))
    }

    // ========== Queries ==========

    /// List all appointments
    pub async fn all(&self) -> Result<Vec<Appointment>> {
        self.store.find_all().await
    }

    /// Get an appointment by id
    pub async fn by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        self.store.find_appointment(id).await
    }

    /// List appointments of one practitioner
    pub async fn by_practitioner(&self, practitioner_id: Uuid) -> Result<Vec<Appointment>> {
        self.store.find_by_practitioner(practitioner_id).await
    }

    /// List appointments starting within `[start, end)`
    pub async fn by_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        self.store.find_by_period(start, end).await
    }

    /// List appointments in a given status
    pub async fn by_status(&self, status: AppointmentStatus) -> Result<Vec<Appointment>> {
        self.store.find_by_status(status).await
    }

    /// List one client's appointments.
    ///
    /// Staff may look at any client; a client only at themselves.
    pub async fn client_appointments(
        &self,
        actor: &Actor,
        client_id: Uuid,
    ) -> Result<Vec<Appointment>> {
        match actor.role {
            Some(Role::Admin) | Some(Role::Practitioner) => {}
            Some(Role::Client) if actor.id == client_id => {}
            Some(Role::Client) => return Err(Error::Forbidden),
            None => return Err(Error::NotAuthenticated),
        }
        self.store.find_by_client(client_id).await
    }

    // ========== Mutations ==========

    /// Book a new appointment.
    ///
    /// All three references must resolve, the practitioner reference must
    /// carry the practitioner role, and the requested slot must be free of
    /// non-cancelled bookings for that practitioner. The charged amount
    /// defaults to the treatment's price; the initial status is always
    /// `Scheduled`.
    pub async fn create(&self, actor: &Actor, input: NewAppointment) -> Result<Appointment> {
        authorize(actor, AppointmentAction::Create, None)?;

        self.store
            .find_client(input.client_id)
            .await?
            .ok_or(Error::ReferenceNotFound("client"))?;
        let treatment = self
            .store
            .find_treatment(input.treatment_id)
            .await?
            .ok_or(Error::ReferenceNotFound("treatment"))?;
        let practitioner = self
            .store
            .find_practitioner_user(input.practitioner_id)
            .await?
            .ok_or(Error::ReferenceNotFound("practitioner"))?;
        if practitioner.role != Role::Practitioner {
            return Err(Error::InvalidPractitioner(practitioner.id));
        }

        let start_at = input.start_at.ok_or(Error::MissingStartTime)?;
        let slot = Slot::new(start_at, treatment.duration());

        // Exclusive per-practitioner section: the conflict check and the
        // insert must not interleave with another booking for the same
        // practitioner.
        let _guard = self.locks.acquire(input.practitioner_id).await;

        self.ensure_slot_free(input.practitioner_id, &slot, None).await?;

        let appointment = Appointment {
            id: input.id.unwrap_or_else(Uuid::new_v4),
            start_at,
            client_id: input.client_id,
            treatment_id: input.treatment_id,
            practitioner_id: input.practitioner_id,
            charged_amount: match input.charged_amount {
                Some(amount) if amount > 0.0 => amount,
                _ => treatment.price,
            },
            status: AppointmentStatus::Scheduled,
            notes: input.notes.unwrap_or_default(),
        };

        self.store.insert_appointment(&appointment).await?;
        tracing::info!(
            appointment_id = %appointment.id,
            practitioner_id = %appointment.practitioner_id,
            start_at = %appointment.start_at,
            "Booked appointment"
        );
        Ok(appointment)
    }

    /// Replace an appointment's mutable fields.
    ///
    /// When the start time, practitioner or treatment changed relative to
    /// the stored row, the slot-conflict check runs again (excluding the
    /// appointment itself) before anything is written.
    pub async fn update(&self, actor: &Actor, appointment: &Appointment) -> Result<()> {
        authorize(actor, AppointmentAction::Update, Some(appointment))?;

        let existing = self
            .store
            .find_appointment(appointment.id)
            .await?
            .ok_or(Error::AppointmentNotFound(appointment.id))?;

        let slot_moved = appointment.start_at != existing.start_at
            || appointment.practitioner_id != existing.practitioner_id
            || appointment.treatment_id != existing.treatment_id;

        if slot_moved {
            let treatment = self
                .store
                .find_treatment(appointment.treatment_id)
                .await?
                .ok_or(Error::ReferenceNotFound("treatment"))?;
            let slot = appointment.slot(treatment.duration());

            let _guard = self.locks.acquire(appointment.practitioner_id).await;
            self.ensure_slot_free(appointment.practitioner_id, &slot, Some(appointment.id))
                .await?;
            self.store.update_appointment(appointment).await?;
        } else {
            self.store.update_appointment(appointment).await?;
        }

        tracing::debug!(appointment_id = %appointment.id, "Updated appointment");
        Ok(())
    }

    /// Change an appointment's status, persisting only the status column.
    ///
    /// Staff may force any transition between known statuses.
    pub async fn change_status(
        &self,
        actor: &Actor,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<()> {
        authorize(actor, AppointmentAction::ChangeStatus, None)?;

        let existing = self
            .store
            .find_appointment(id)
            .await?
            .ok_or(Error::AppointmentNotFound(id))?;

        self.store.update_appointment_status(id, status).await?;
        tracing::info!(
            appointment_id = %id,
            from = %existing.status,
            to = %status,
            "Changed appointment status"
        );
        Ok(())
    }

    /// Change an appointment's status from its wire label.
    ///
    /// An unknown label fails with `InvalidStatus` before anything is
    /// looked up or written.
    pub async fn change_status_label(&self, actor: &Actor, id: Uuid, label: &str) -> Result<()> {
        let status = AppointmentStatus::parse(label)?;
        self.change_status(actor, id, status).await
    }

    /// Record a reschedule request for an appointment.
    ///
    /// The requesting client must own the appointment; staff may submit
    /// the request on the owning client's behalf. Recording the marker
    /// status is the entire effect; no rebooking or notification happens
    /// here.
    pub async fn request_reschedule(
        &self,
        actor: &Actor,
        id: Uuid,
        requesting_client_id: Uuid,
    ) -> Result<()> {
        let appointment = self
            .store
            .find_appointment(id)
            .await?
            .ok_or(Error::AppointmentNotFound(id))?;

        authorize(actor, AppointmentAction::RequestReschedule, Some(&appointment))?;

        if appointment.client_id != requesting_client_id {
            return Err(Error::NotAuthorized);
        }
        self.store
            .find_client(requesting_client_id)
            .await?
            .ok_or(Error::ReferenceNotFound("client"))?;

        if !appointment.status.allows_reschedule_request() {
            return Err(Error::Validation(format!(
                "cannot request a reschedule for a '{}' appointment",
                appointment.status
            )));
        }

        self.store
            .update_appointment_status(id, AppointmentStatus::RescheduleRequested)
            .await?;
        tracing::info!(appointment_id = %id, "Reschedule requested");
        Ok(())
    }

    /// Administrative hard removal, bypassing the status lifecycle
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<()> {
        authorize(actor, AppointmentAction::Delete, None)?;

        self.store
            .find_appointment(id)
            .await?
            .ok_or(Error::AppointmentNotFound(id))?;
        self.store.delete_appointment(id).await?;
        tracing::warn!(appointment_id = %id, "Deleted appointment");
        Ok(())
    }

    /// Fail with `SlotUnavailable` when any non-cancelled appointment for
    /// the practitioner overlaps `slot`
    async fn ensure_slot_free(
        &self,
        practitioner_id: Uuid,
        slot: &Slot,
        exclude: Option<Uuid>,
    ) -> Result<()> {
        let overlapping = self.store.find_overlapping(practitioner_id, slot).await?;
        let conflict = overlapping
            .iter()
            .any(|a| Some(a.id) != exclude && a.status.blocks_slot());
        if conflict {
            tracing::debug!(
                practitioner_id = %practitioner_id,
                start = %slot.start,
                "Slot conflict"
            );
            return Err(Error::SlotUnavailable);
        }
        Ok(())
    }
}
