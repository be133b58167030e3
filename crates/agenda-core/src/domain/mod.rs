//! Domain model: clients, treatments, users, health records and scheduling

pub mod clients;
pub mod datetime;
pub mod records;
pub mod scheduling;
pub mod treatments;
pub mod users;
