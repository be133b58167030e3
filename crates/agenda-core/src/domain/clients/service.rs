//! Client service

use super::entity::{Client, NewClient};
use super::repository::ClientRepository;
use crate::error::{Error, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Service for client registration and lookup
#[derive(Debug, Clone)]
pub struct ClientService {
    repository: ClientRepository,
}

impl ClientService {
    /// Create a new client service
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: ClientRepository::new(pool),
        }
    }

    /// List all clients
    pub async fn all(&self) -> Result<Vec<Client>> {
        self.repository.find_all().await
    }

    /// Get a client by id
    pub async fn by_id(&self, id: Uuid) -> Result<Option<Client>> {
        self.repository.find_by_id(id).await
    }

    /// Partial name search
    pub async fn by_name(&self, name: &str) -> Result<Vec<Client>> {
        self.repository.find_by_name(name).await
    }

    /// List clients by active flag
    pub async fn by_active(&self, active: bool) -> Result<Vec<Client>> {
        self.repository.find_by_active(active).await
    }

    /// Register a new client
    ///
    /// A non-empty email must not already be in use.
    pub async fn register(&self, input: NewClient) -> Result<Client> {
        if let Some(email) = input.email.as_deref() {
            if !email.is_empty() && self.repository.find_by_email(email).await?.is_some() {
                return Err(Error::EmailTaken(email.to_string()));
            }
        }

        let client = input.into_client();
        self.repository.create(&client).await?;
        tracing::info!(client_id = %client.id, "Registered client");
        Ok(client)
    }

    /// Update an existing client
    pub async fn update(&self, client: &Client) -> Result<()> {
        self.repository.update(client).await
    }

    /// Soft-delete a client; the record is kept with its active flag off
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repository.soft_delete(id).await
    }
}
