//! Core use-case services.
//!
//! # Responsibility
//! - Own in-memory session state and orchestrate repository calls.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - Services are constructed explicitly with injected repositories; there
//!   are no global store singletons.
//! - Storage failures degrade to defaults or status flags, never panics.

pub mod calendar_service;
pub mod notes_service;
pub mod profile_service;
pub mod reminder_service;
pub mod session;
