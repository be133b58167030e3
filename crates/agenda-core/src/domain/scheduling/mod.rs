//! Appointment scheduling: entities, status lifecycle, access policy and
//! the booking engine

pub mod entity;
pub mod locks;
pub mod policy;
pub mod repository;
pub mod service;
pub mod state;
pub mod store;

pub use entity::{Appointment, NewAppointment, Slot};
pub use policy::{Actor, AppointmentAction};
pub use repository::SqliteSchedulingStore;
pub use service::BookingService;
pub use state::AppointmentStatus;
pub use store::SchedulingStore;
