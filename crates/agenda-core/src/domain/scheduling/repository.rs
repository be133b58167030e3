//! SQLite-backed entity store for the booking engine

use super::entity::{Appointment, Slot};
use super::state::AppointmentStatus;
use super::store::SchedulingStore;
use crate::domain::clients::{Client, ClientRepository};
use crate::domain::treatments::{Treatment, TreatmentRepository};
use crate::domain::users::{SystemUser, UserRepository};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Concrete [`SchedulingStore`] over the shared SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteSchedulingStore {
    pool: SqlitePool,
    clients: ClientRepository,
    treatments: TreatmentRepository,
    users: UserRepository,
}

#[derive(sqlx::FromRow)]
struct AppointmentRow {
    id: String,
    start_at: DateTime<Utc>,
    client_id: String,
    treatment_id: String,
    practitioner_id: String,
    charged_amount: f64,
    status: String,
    notes: String,
}

impl AppointmentRow {
    fn into_appointment(self) -> Result<Appointment> {
        let parse_id = |field: &str, value: &str| {
            Uuid::parse_str(value)
                .map_err(|_| Error::Validation(format!("invalid {} '{}'", field, value)))
        };
        Ok(Appointment {
            id: parse_id("appointment id", &self.id)?,
            start_at: self.start_at,
            client_id: parse_id("client id", &self.client_id)?,
            treatment_id: parse_id("treatment id", &self.treatment_id)?,
            practitioner_id: parse_id("practitioner id", &self.practitioner_id)?,
            charged_amount: self.charged_amount,
            status: AppointmentStatus::parse(&self.status)?,
            notes: self.notes,
        })
    }
}

const APPOINTMENT_COLUMNS: &str =
    "id, start_at, client_id, treatment_id, practitioner_id, charged_amount, status, notes";

fn collect(rows: Vec<AppointmentRow>) -> Result<Vec<Appointment>> {
    rows.into_iter().map(AppointmentRow::into_appointment).collect()
}

impl SqliteSchedulingStore {
    /// Create a new store over the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            clients: ClientRepository::new(pool.clone()),
            treatments: TreatmentRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl SchedulingStore for SqliteSchedulingStore {
    async fn find_client(&self, id: Uuid) -> Result<Option<Client>> {
        self.clients.find_by_id(id).await
    }

    async fn find_treatment(&self, id: Uuid) -> Result<Option<Treatment>> {
        self.treatments.find_by_id(id).await
    }

    async fn find_practitioner_user(&self, id: Uuid) -> Result<Option<SystemUser>> {
        self.users.find_by_id(id).await
    }

    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>> {
        let row: Option<AppointmentRow> = sqlx::query_as(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AppointmentRow::into_appointment).transpose()
    }

    async fn find_overlapping(
        &self,
        practitioner_id: Uuid,
        slot: &Slot,
    ) -> Result<Vec<Appointment>> {
        // Each stored appointment occupies [start_at, start_at + its
        // treatment's duration). Integer-second arithmetic keeps the
        // half-open boundary comparison exact.
        let rows: Vec<AppointmentRow> = sqlx::query_as(
            "SELECT a.id, a.start_at, a.client_id, a.treatment_id, a.practitioner_id,
                    a.charged_amount, a.status, a.notes
             FROM appointments a
             JOIN treatments t ON t.id = a.treatment_id
             WHERE a.practitioner_id = ?
               AND CAST(strftime('%s', a.start_at) AS INTEGER) < ?
               AND CAST(strftime('%s', a.start_at) AS INTEGER) + t.duration_minutes * 60 > ?",
        )
        .bind(practitioner_id.to_string())
        .bind(slot.end.timestamp())
        .bind(slot.start.timestamp())
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn find_all(&self) -> Result<Vec<Appointment>> {
        let rows: Vec<AppointmentRow> = sqlx::query_as(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY start_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn find_by_client(&self, client_id: Uuid) -> Result<Vec<Appointment>> {
        let rows: Vec<AppointmentRow> = sqlx::query_as(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE client_id = ? ORDER BY start_at"
        ))
        .bind(client_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn find_by_practitioner(&self, practitioner_id: Uuid) -> Result<Vec<Appointment>> {
        let rows: Vec<AppointmentRow> = sqlx::query_as(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE practitioner_id = ? ORDER BY start_at"
        ))
        .bind(practitioner_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn find_by_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let rows: Vec<AppointmentRow> = sqlx::query_as(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE CAST(strftime('%s', start_at) AS INTEGER) >= ?
               AND CAST(strftime('%s', start_at) AS INTEGER) < ?
             ORDER BY start_at"
        ))
        .bind(start.timestamp())
        .bind(end.timestamp())
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn find_by_status(&self, status: AppointmentStatus) -> Result<Vec<Appointment>> {
        let rows: Vec<AppointmentRow> = sqlx::query_as(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE status = ? ORDER BY start_at"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<()> {
        sqlx::query(
            "INSERT INTO appointments (id, start_at, client_id, treatment_id, practitioner_id, charged_amount, status, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(appointment.id.to_string())
        .bind(appointment.start_at)
        .bind(appointment.client_id.to_string())
        .bind(appointment.treatment_id.to_string())
        .bind(appointment.practitioner_id.to_string())
        .bind(appointment.charged_amount)
        .bind(appointment.status.as_str())
        .bind(&appointment.notes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_appointment(&self, appointment: &Appointment) -> Result<()> {
        sqlx::query(
            "UPDATE appointments
             SET start_at = ?, client_id = ?, treatment_id = ?, practitioner_id = ?, charged_amount = ?, status = ?, notes = ?
             WHERE id = ?",
        )
        .bind(appointment.start_at)
        .bind(appointment.client_id.to_string())
        .bind(appointment.treatment_id.to_string())
        .bind(appointment.practitioner_id.to_string())
        .bind(appointment.charged_amount)
        .bind(appointment.status.as_str())
        .bind(&appointment.notes)
        .bind(appointment.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_appointment_status(&self, id: Uuid, status: AppointmentStatus) -> Result<()> {
        sqlx::query("UPDATE appointments SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
