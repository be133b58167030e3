//! Client entity and creation input

use crate::domain::datetime;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A client of the clinic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub full_name: String,
    /// Brazilian tax id, free-form
    pub cpf: Option<String>,
    pub email: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub registered_at: DateTime<Utc>,
    /// Soft-delete flag; rows are never physically removed
    pub active: bool,
}

/// Input for registering a client
///
/// Every field except the name is optional; the birth date accepts the
/// lenient format chain from [`crate::domain::datetime`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewClient {
    pub full_name: String,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "datetime::flexible_date_opt::deserialize")]
    pub birth_date: Option<NaiveDate>,
}

impl NewClient {
    /// Create an input with just a name
    pub fn named(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    /// Materialize a client record: id generated, registered now, active
    pub fn into_client(self) -> Client {
        Client {
            id: Uuid::new_v4(),
            full_name: self.full_name,
            cpf: self.cpf,
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            birth_date: self.birth_date,
            registered_at: Utc::now(),
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_defaults() {
        let client = NewClient::named("Ana Souza").into_client();
        assert!(client.active);
        assert_eq!(client.email, "");
        assert!(client.birth_date.is_none());
    }

    #[test]
    fn test_deserialize_iso_birth_date() {
        let input: NewClient =
            serde_json::from_str(r#"{"full_name": "Ana", "birth_date": "1990-02-01"}"#).unwrap();
        assert_eq!(input.birth_date, NaiveDate::from_ymd_opt(1990, 2, 1));
    }

    #[test]
    fn test_deserialize_brazilian_birth_date() {
        let input: NewClient =
            serde_json::from_str(r#"{"full_name": "Ana", "birth_date": "01/02/1990"}"#).unwrap();
        assert_eq!(input.birth_date, NaiveDate::from_ymd_opt(1990, 2, 1));
    }

    #[test]
    fn test_deserialize_bad_birth_date_is_rejected() {
        let result = serde_json::from_str::<NewClient>(
            r#"{"full_name": "Ana", "birth_date": "primeiro de fevereiro"}"#,
        );
        assert!(result.is_err());
    }
}
