//! Treatments offered by the clinic

pub mod entity;
pub mod repository;
pub mod service;

pub use entity::Treatment;
pub use repository::TreatmentRepository;
pub use service::TreatmentService;
