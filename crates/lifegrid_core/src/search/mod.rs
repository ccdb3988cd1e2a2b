//! Calendar search entry points.
//!
//! # Responsibility
//! - Score free-text queries against year titles, day titles and tasks.
//! - Debounce keystroke input before a scan runs.
//!
//! # Invariants
//! - Scans are synchronous and walk the whole store; there is no index.

pub mod debounce;
pub mod fuzzy;
