//! Flutter-facing bindings for LifeGrid core.

pub mod api;
