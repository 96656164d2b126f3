//! Shared utilities for the Gadgets API backend.
//!
//! This crate provides small, dependency-light helpers used across the other crates:
//! - Random gadget name generation
//! - Self-destruct confirmation codes

pub mod confirmation;
pub mod naming;
