//! In-memory gadget store.
//!
//! Used by tests and by the `memory` store backend for local development.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::gadget_store::{apply_changes, check_changes, check_name, GadgetStore, StoreError};
use crate::models::gadget::{Gadget, GadgetChanges, GadgetStatus};

/// Gadget store backed by a vector in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryGadgetStore {
    gadgets: RwLock<Vec<Gadget>>,
    /// Whether to simulate database failures for testing.
    pub simulate_failure: bool,
}

impl InMemoryGadgetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose every operation fails.
    pub fn failing() -> Self {
        Self {
            gadgets: RwLock::default(),
            simulate_failure: true,
        }
    }

    /// Create a store pre-populated with gadgets.
    pub fn with_gadgets(gadgets: Vec<Gadget>) -> Self {
        Self {
            gadgets: RwLock::new(gadgets),
            simulate_failure: false,
        }
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.simulate_failure {
            return Err(StoreError::Database("simulated failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl GadgetStore for InMemoryGadgetStore {
    async fn create(&self, name: &str) -> Result<Gadget, StoreError> {
        self.check_available()?;
        check_name(name)?;

        let gadget = Gadget::new(name);
        self.gadgets.write().await.push(gadget.clone());
        Ok(gadget)
    }

    async fn find_many(&self, status: Option<GadgetStatus>) -> Result<Vec<Gadget>, StoreError> {
        self.check_available()?;

        let gadgets = self.gadgets.read().await;
        Ok(gadgets
            .iter()
            .filter(|g| status.map_or(true, |s| g.status == s))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Gadget>, StoreError> {
        self.check_available()?;

        let gadgets = self.gadgets.read().await;
        Ok(gadgets.iter().find(|g| g.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: GadgetChanges) -> Result<Gadget, StoreError> {
        self.check_available()?;

        let mut gadgets = self.gadgets.write().await;
        let gadget = gadgets
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(StoreError::NotFound(id))?;

        check_changes(gadget, &changes)?;
        apply_changes(gadget, changes);
        Ok(gadget.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}
