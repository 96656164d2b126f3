//! Gadget store contract.
//!
//! The service layer only talks to persistence through [`GadgetStore`], so the
//! PostgreSQL repository and the in-memory store are interchangeable.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::gadget::{Gadget, GadgetChanges, GadgetStatus};

/// Errors surfaced by a gadget store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Gadget not found: {0}")]
    NotFound(Uuid),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Persistence operations required by the gadget service.
#[async_trait]
pub trait GadgetStore: Send + Sync {
    /// Persist a new gadget with status `Available`.
    async fn create(&self, name: &str) -> Result<Gadget, StoreError>;

    /// All gadgets in creation order, optionally restricted to one status.
    async fn find_many(&self, status: Option<GadgetStatus>) -> Result<Vec<Gadget>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Gadget>, StoreError>;

    /// Partial update. Fails with [`StoreError::NotFound`] if the gadget does not exist.
    async fn update(&self, id: Uuid, changes: GadgetChanges) -> Result<Gadget, StoreError>;

    /// Connectivity probe for health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Schema rules every store enforces on writes.
pub fn check_name(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::Constraint("gadget name must not be empty".into()));
    }
    Ok(())
}

/// Rejects changes that break the stored gadget's invariants.
///
/// `Destroyed` is terminal, so a destroyed gadget cannot take another status.
pub fn check_changes(current: &Gadget, changes: &GadgetChanges) -> Result<(), StoreError> {
    if let Some(name) = &changes.name {
        check_name(name)?;
    }

    if current.status == GadgetStatus::Destroyed {
        if let Some(status) = changes.status {
            if status != GadgetStatus::Destroyed {
                return Err(StoreError::Constraint(format!(
                    "gadget {} is destroyed and cannot become {}",
                    current.id, status
                )));
            }
        }
    }

    Ok(())
}

/// Applies already-checked changes to a gadget in place.
///
/// Lifecycle timestamps keep their first value.
pub fn apply_changes(gadget: &mut Gadget, changes: GadgetChanges) {
    if let Some(name) = changes.name {
        gadget.name = name;
    }
    if let Some(status) = changes.status {
        gadget.status = status;
    }
    if gadget.decommissioned_at.is_none() {
        gadget.decommissioned_at = changes.decommissioned_at;
    }
    if gadget.destroyed_at.is_none() {
        gadget.destroyed_at = changes.destroyed_at;
    }
}
