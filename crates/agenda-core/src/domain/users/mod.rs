//! System users and roles

pub mod entity;
pub mod repository;

pub use entity::{Role, SystemUser};
pub use repository::UserRepository;
