//! Access policy for appointment mutations
//!
//! Decides whether an actor may perform a mutation before the booking
//! engine does anything durable. A denial must leave no side effect, so
//! the engine consults this before writing.

use super::entity::Appointment;
use crate::domain::users::Role;
use crate::error::{Error, Result};
use uuid::Uuid;

/// The authenticated (or anonymous) caller of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    /// `None` means the caller carries no authenticated role
    pub role: Option<Role>,
}

impl Actor {
    /// An authenticated actor
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role: Some(role) }
    }

    /// A caller with no authenticated identity
    pub fn anonymous() -> Self {
        Self {
            id: Uuid::nil(),
            role: None,
        }
    }

    /// Staff actors (admin or practitioner)
    pub fn is_staff(&self) -> bool {
        self.role.is_some_and(|r| r.is_staff())
    }
}

/// Appointment mutations gated by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    Create,
    Update,
    ChangeStatus,
    RequestReschedule,
    Delete,
}

/// Authorize `actor` to perform `action`, first matching rule wins:
///
/// 1. admin: every mutation;
/// 2. practitioner: every mutation (not scoped to their own appointments);
/// 3. client: only a reschedule request on an appointment they own;
/// 4. anyone else: not authenticated.
pub fn authorize(
    actor: &Actor,
    action: AppointmentAction,
    appointment: Option<&Appointment>,
) -> Result<()> {
    match actor.role {
        Some(Role::Admin) | Some(Role::Practitioner) => Ok(()),
        Some(Role::Client) => match action {
            AppointmentAction::RequestReschedule
                if appointment.is_some_and(|a| a.client_id == actor.id) =>
            {
                Ok(())
            }
            _ => Err(Error::Forbidden),
        },
        None => Err(Error::NotAuthenticated),
    }
}
