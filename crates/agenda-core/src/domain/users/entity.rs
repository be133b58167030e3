//! System user entity and roles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Role of a system user
///
/// Wire strings are the clinic's Portuguese labels and must round-trip
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// A client of the clinic
    #[serde(rename = "cliente")]
    Client,
    /// A practitioner (massage therapist) who can be booked
    #[serde(rename = "massoterapeuta")]
    Practitioner,
    /// Clinic administrator
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    /// Create from the wire string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cliente" => Some(Self::Client),
            "massoterapeuta" => Some(Self::Practitioner),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to the wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "cliente",
            Self::Practitioner => "massoterapeuta",
            Self::Admin => "admin",
        }
    }

    /// Staff roles may mutate any appointment
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Practitioner)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A system user with credentials
///
/// The password hash is opaque to this crate; credential verification and
/// token issuance live outside the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub role: Role,
    pub active: bool,
    pub registered_at: DateTime<Utc>,
}

impl SystemUser {
    /// Create a new active user
    pub fn new(full_name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
            email: email.into(),
            password_hash: String::new(),
            phone: String::new(),
            role,
            active: true,
            registered_at: Utc::now(),
        }
    }
}
