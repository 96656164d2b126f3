//! HTTP route handlers.

pub mod gadgets;
pub mod health;
pub mod openapi;
