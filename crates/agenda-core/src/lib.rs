//! Agenda Core Library
//!
//! This crate provides the scheduling core for a small therapy clinic:
//! - Booking engine (slot conflict detection, pricing defaults)
//! - Appointment status lifecycle and reschedule requests
//! - Role-gated access policy for appointment mutations
//! - Client, treatment, user and health-record management
//! - Storage (SQLite via sqlx)

pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::scheduling::{
        Actor, Appointment, AppointmentStatus, BookingService, NewAppointment,
    };
    pub use crate::domain::users::Role;
    pub use crate::error::{Error, Result};
}
