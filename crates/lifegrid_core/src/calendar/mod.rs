//! Calendar time store.
//!
//! # Responsibility
//! - Address day records through the grid-relative `DayKey`.
//! - Own the in-memory nested record map.
//!
//! # Invariants
//! - Key derivation lives in `key` only.
//! - Other components observe the map through `CalendarStore` accessors.

pub mod key;
pub mod store;
