//! Delta engine.
//!
//! # Responsibility
//! - Hold the active simulation's per-category minute deltas.
//! - Recompute a modified allocation from a base allocation and deltas.
//!
//! # Invariants
//! - At most one delta per category; a zero delta is removed, not stored.
//! - `Unallocated` additionally absorbs `-total_delta`.
//! - Each category is clamped to `[0, 1440]` independently, so clamping can
//!   leave the modified total away from 1440. No renormalisation happens.
//! - Minute arithmetic saturates; out-of-range deltas clamp instead of
//!   overflowing.

use crate::model::category::CategoryName;
use crate::model::profile::{clamp_minutes, ActivityAllocation, LifeProfile, ProfileValidationError};
use serde::{Deserialize, Serialize};

/// Simulated per-day change for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delta {
    pub name: CategoryName,
    pub delta_minutes: i64,
}

/// Active deltas for one simulation session, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaSet {
    deltas: Vec<Delta>,
}

impl DeltaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delta for `name`; zero removes it.
    pub fn set(&mut self, name: CategoryName, delta_minutes: i64) {
        if delta_minutes == 0 {
            self.remove(name);
            return;
        }
        match self.deltas.iter_mut().find(|delta| delta.name == name) {
            Some(delta) => delta.delta_minutes = delta_minutes,
            None => self.deltas.push(Delta {
                name,
                delta_minutes,
            }),
        }
    }

    /// Adds `by` to the current delta for `name`.
    pub fn adjust(&mut self, name: CategoryName, by: i64) {
        self.set(name, self.get(name).saturating_add(by));
    }

    pub fn remove(&mut self, name: CategoryName) {
        self.deltas.retain(|delta| delta.name != name);
    }

    /// Current delta for `name`, zero when absent.
    pub fn get(&self, name: CategoryName) -> i64 {
        self.deltas
            .iter()
            .find(|delta| delta.name == name)
            .map_or(0, |delta| delta.delta_minutes)
    }

    pub fn total(&self) -> i64 {
        self.deltas
            .iter()
            .fold(0_i64, |total, delta| total.saturating_add(delta.delta_minutes))
    }

    pub fn as_slice(&self) -> &[Delta] {
        &self.deltas
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn clear(&mut self) {
        self.deltas.clear();
    }
}

/// Recomputes the allocation with `deltas` applied.
pub fn apply_deltas(base: &[ActivityAllocation], deltas: &DeltaSet) -> Vec<ActivityAllocation> {
    let total_delta = deltas.total();
    base.iter()
        .map(|activity| {
            let mut minutes = activity
                .minutes_per_day
                .saturating_add(deltas.get(activity.name));
            if activity.name.is_unallocated() {
                minutes = minutes.saturating_sub(total_delta);
            }
            ActivityAllocation::new(activity.name, clamp_minutes(minutes))
        })
        .collect()
}

/// Folds the deltas into a copy of `profile` through validated edits.
///
/// Each non-`Unallocated` delta goes through `LifeProfile::set_allocation`, so
/// the committed profile always totals 1440 even where `apply_deltas` drifts.
pub fn commit_deltas(
    profile: &LifeProfile,
    deltas: &DeltaSet,
) -> Result<LifeProfile, ProfileValidationError> {
    let mut committed = profile.clone();
    for delta in deltas
        .as_slice()
        .iter()
        .filter(|delta| !delta.name.is_unallocated())
    {
        let target = committed
            .minutes_for(delta.name)
            .saturating_add(delta.delta_minutes);
        committed.set_allocation(delta.name, target)?;
    }
    Ok(committed)
}

#[cfg(test)]
mod tests {
    use super::{apply_deltas, commit_deltas, DeltaSet};
    use crate::model::category::{CategoryName, MINUTES_PER_DAY};
    use crate::model::profile::LifeProfile;

    #[test]
    fn zero_delta_is_removed() {
        let mut deltas = DeltaSet::new();
        deltas.set(CategoryName::Social, 15);
        deltas.set(CategoryName::Social, 0);
        assert!(deltas.is_empty());

        deltas.adjust(CategoryName::Hobbies, 10);
        deltas.adjust(CategoryName::Hobbies, -10);
        assert!(deltas.is_empty());
    }

    #[test]
    fn one_delta_per_category() {
        let mut deltas = DeltaSet::new();
        deltas.set(CategoryName::Sleep, 30);
        deltas.set(CategoryName::Sleep, -20);
        deltas.set(CategoryName::Exercise, 10);

        assert_eq!(deltas.as_slice().len(), 2);
        assert_eq!(deltas.get(CategoryName::Sleep), -20);
        assert_eq!(deltas.total(), -10);
    }

    #[test]
    fn clamping_can_drift_total_away_from_a_day() {
        let profile = LifeProfile::default();
        let mut deltas = DeltaSet::new();
        deltas.set(CategoryName::Exercise, -120);

        let modified = apply_deltas(&profile.activities, &deltas);
        let total = modified.iter().map(|a| a.minutes_per_day).sum::<i64>();
        // Exercise clamps at 0 (-60 lost) while Unallocated still gains 120.
        assert_eq!(total, MINUTES_PER_DAY + 60);
    }

    #[test]
    fn extreme_deltas_clamp_without_overflow() {
        let profile = LifeProfile::default();
        let mut deltas = DeltaSet::new();
        deltas.set(CategoryName::Exercise, i64::MAX);
        deltas.set(CategoryName::Sleep, i64::MAX);
        deltas.adjust(CategoryName::Exercise, 1);
        assert_eq!(deltas.get(CategoryName::Exercise), i64::MAX);
        assert_eq!(deltas.total(), i64::MAX);

        let modified = apply_deltas(&profile.activities, &deltas);
        let minutes_for = |name: CategoryName| {
            modified
                .iter()
                .find(|activity| activity.name == name)
                .map(|activity| activity.minutes_per_day)
        };
        assert_eq!(minutes_for(CategoryName::Exercise), Some(MINUTES_PER_DAY));
        assert_eq!(minutes_for(CategoryName::Unallocated), Some(0));

        deltas.clear();
        deltas.set(CategoryName::Unallocated, i64::MIN);
        deltas.set(CategoryName::Social, i64::MIN);
        let modified = apply_deltas(&profile.activities, &deltas);
        assert!(modified
            .iter()
            .all(|activity| (0..=MINUTES_PER_DAY).contains(&activity.minutes_per_day)));

        let committed = commit_deltas(&profile, &deltas).unwrap();
        assert_eq!(committed.minutes_for(CategoryName::Social), 0);
        assert_eq!(committed.total_minutes(), MINUTES_PER_DAY);
    }

    #[test]
    fn commit_keeps_profile_total() {
        let profile = LifeProfile::default();
        let mut deltas = DeltaSet::new();
        deltas.set(CategoryName::Exercise, 30);
        deltas.set(CategoryName::WorkStudy, -60);

        let committed = commit_deltas(&profile, &deltas).unwrap();
        assert_eq!(committed.minutes_for(CategoryName::Exercise), 90);
        assert_eq!(committed.minutes_for(CategoryName::WorkStudy), 420);
        assert_eq!(committed.minutes_for(CategoryName::Unallocated), 210);
        assert_eq!(committed.total_minutes(), MINUTES_PER_DAY);
    }
}
