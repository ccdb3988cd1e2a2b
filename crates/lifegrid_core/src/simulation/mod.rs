//! Habit simulation over a life profile.
//!
//! # Responsibility
//! - Apply ephemeral per-category deltas to a base allocation.
//! - Compute lifetime-impact figures and the week-of-life breakdown.
//!
//! # Invariants
//! - Every function here is pure; deltas are never persisted.

pub mod delta;
pub mod impact;
pub mod life_weeks;
