//! Repository implementations for database operations.

pub mod gadget;

pub use gadget::GadgetRepository;
