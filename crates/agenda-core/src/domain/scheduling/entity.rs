//! Appointment entity, booking input and time slots

use super::state::AppointmentStatus;
use crate::domain::datetime;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The half-open interval `[start, end)` a booking occupies for one
/// practitioner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    /// Slot starting at `start` and lasting `duration`
    pub fn new(start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    /// Half-open overlap: two slots conflict iff
    /// `start_a < end_b && start_b < end_a`. Boundary-adjacent slots do
    /// not overlap.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A booked session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub start_at: DateTime<Utc>,
    pub client_id: Uuid,
    pub treatment_id: Uuid,
    pub practitioner_id: Uuid,
    pub charged_amount: f64,
    pub status: AppointmentStatus,
    pub notes: String,
}

impl Appointment {
    /// The slot this appointment occupies, given its treatment's duration
    pub fn slot(&self, duration: Duration) -> Slot {
        Slot::new(self.start_at, duration)
    }
}

/// Input for booking an appointment
///
/// The id and charged amount are optional: a missing id is generated and a
/// missing (or zero) amount defaults to the treatment's price.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAppointment {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "datetime::flexible_opt::deserialize")]
    pub start_at: Option<DateTime<Utc>>,
    pub client_id: Uuid,
    pub treatment_id: Uuid,
    pub practitioner_id: Uuid,
    #[serde(default)]
    pub charged_amount: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewAppointment {
    /// Booking input with the mandatory references and a start time
    pub fn new(
        client_id: Uuid,
        treatment_id: Uuid,
        practitioner_id: Uuid,
        start_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            start_at: Some(start_at),
            client_id,
            treatment_id,
            practitioner_id,
            charged_amount: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, min, 0).unwrap()
    }

    #[test]
    fn test_overlapping_slots() {
        let a = Slot::new(at(10, 0), Duration::minutes(60));
        let b = Slot::new(at(10, 30), Duration::minutes(60));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_boundary_adjacent_slots_do_not_overlap() {
        let a = Slot::new(at(10, 0), Duration::minutes(60));
        let b = Slot::new(at(11, 0), Duration::minutes(60));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_contained_slot_overlaps() {
        let long = Slot::new(at(9, 0), Duration::minutes(180));
        let short = Slot::new(at(10, 0), Duration::minutes(30));
        assert!(long.overlaps(&short));
        assert!(short.overlaps(&long));
    }

    #[test]
    fn test_new_appointment_accepts_flexible_start() {
        let input: NewAppointment = serde_json::from_value(serde_json::json!({
            "start_at": "2024-01-01T10:00:00",
            "client_id": Uuid::new_v4(),
            "treatment_id": Uuid::new_v4(),
            "practitioner_id": Uuid::new_v4(),
        }))
        .unwrap();
        assert_eq!(input.start_at, Some(at(10, 0)));
        assert!(input.id.is_none());
        assert!(input.charged_amount.is_none());
    }
}
