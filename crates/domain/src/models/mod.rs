//! Domain models for the Gadgets API.

pub mod gadget;

pub use gadget::{Gadget, GadgetChanges, GadgetStatus};
