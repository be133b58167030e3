//! Appointment status lifecycle
//!
//! Statuses round-trip as the clinic's Portuguese wire labels. Staff may
//! force any transition between known statuses via a status change; the
//! only status-gated path is the client-initiated reschedule request.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    /// Booked, awaiting confirmation. The only initial status.
    #[serde(rename = "agendado")]
    Scheduled,
    /// Confirmed by the clinic
    #[serde(rename = "confirmado")]
    Confirmed,
    /// The session took place
    #[serde(rename = "realizado")]
    Completed,
    /// Cancelled; never blocks a slot
    #[serde(rename = "cancelado")]
    Cancelled,
    /// A reschedule was requested and awaits staff action
    #[serde(rename = "reagendamento_solicitado")]
    RescheduleRequested,
}

impl AppointmentStatus {
    /// Parse a wire label, rejecting anything outside the closed set
    pub fn parse(label: &str) -> Result<Self> {
        match label {
            "agendado" => Ok(Self::Scheduled),
            "confirmado" => Ok(Self::Confirmed),
            "realizado" => Ok(Self::Completed),
            "cancelado" => Ok(Self::Cancelled),
            "reagendamento_solicitado" => Ok(Self::RescheduleRequested),
            other => Err(Error::InvalidStatus(other.to_string())),
        }
    }

    /// Convert to the wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "agendado",
            Self::Confirmed => "confirmado",
            Self::Completed => "realizado",
            Self::Cancelled => "cancelado",
            Self::RescheduleRequested => "reagendamento_solicitado",
        }
    }

    /// Whether an appointment in this status occupies its practitioner's
    /// slot for conflict detection
    ///
    /// Only cancellation frees the slot. Completed appointments keep
    /// blocking theirs, which only matters for intervals still in range.
    pub fn blocks_slot(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Whether a reschedule may be requested from this status
    ///
    /// Completed and cancelled sessions have nothing left to move;
    /// re-requesting an already-requested one is a harmless repeat.
    pub fn allows_reschedule_request(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Confirmed | Self::RescheduleRequested)
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Scheduled
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_labels_round_trip() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::RescheduleRequested,
        ] {
            assert_eq!(AppointmentStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let err = AppointmentStatus::parse("pendente").unwrap_err();
        assert!(matches!(err, Error::InvalidStatus(ref s) if s == "pendente"));
    }

    #[test]
    fn test_serde_uses_wire_labels() {
        let json = serde_json::to_string(&AppointmentStatus::RescheduleRequested).unwrap();
        assert_eq!(json, r#""reagendamento_solicitado""#);
        let back: AppointmentStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AppointmentStatus::RescheduleRequested);
    }

    #[test]
    fn test_only_cancelled_frees_the_slot() {
        assert!(!AppointmentStatus::Cancelled.blocks_slot());
        assert!(AppointmentStatus::Scheduled.blocks_slot());
        assert!(AppointmentStatus::Confirmed.blocks_slot());
        assert!(AppointmentStatus::Completed.blocks_slot());
        assert!(AppointmentStatus::RescheduleRequested.blocks_slot());
    }

    #[test]
    fn test_reschedule_entry_states() {
        assert!(AppointmentStatus::Scheduled.allows_reschedule_request());
        assert!(AppointmentStatus::Confirmed.allows_reschedule_request());
        assert!(AppointmentStatus::RescheduleRequested.allows_reschedule_request());
        assert!(!AppointmentStatus::Completed.allows_reschedule_request());
        assert!(!AppointmentStatus::Cancelled.allows_reschedule_request());
    }
}
