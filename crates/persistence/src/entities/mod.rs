//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod gadget;

pub use gadget::{GadgetEntity, GadgetStatusDb};
