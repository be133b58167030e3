//! Clinic clients (the billed party for appointments)

pub mod entity;
pub mod repository;
pub mod service;

pub use entity::{Client, NewClient};
pub use repository::ClientRepository;
pub use service::ClientService;
