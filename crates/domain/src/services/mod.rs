//! Domain services for the Gadgets API.
//!
//! Services contain business logic that operates on domain models.

pub mod gadget_service;
pub mod gadget_store;
pub mod memory_store;

pub use gadget_service::{GadgetError, GadgetService, SelfDestructOutcome};
pub use gadget_store::{GadgetStore, StoreError};
pub use memory_store::InMemoryGadgetStore;
