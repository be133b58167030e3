//! Client health records (anamnese)

pub mod entity;
pub mod repository;

pub use entity::HealthRecord;
pub use repository::HealthRecordRepository;
