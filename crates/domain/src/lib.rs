//! Domain layer for the Gadgets API backend.
//!
//! This crate contains:
//! - Domain models (Gadget, GadgetStatus, request/response payloads)
//! - The gadget store contract and an in-memory store
//! - The gadget lifecycle service and its error types

pub mod models;
pub mod services;
