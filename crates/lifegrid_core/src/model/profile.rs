//! Life profile domain model.
//!
//! # Responsibility
//! - Hold a user's age range and daily activity allocation.
//! - Enforce allocation invariants for onboarding and edits.
//!
//! # Invariants
//! - `target_age > current_age`.
//! - Exactly one allocation per category.
//! - Every `minutes_per_day` is within `[0, 1440]` and the total is 1440.
//! - `Unallocated` is derived as the remainder; callers never set it directly.

use crate::model::category::{CategoryName, MINUTES_PER_DAY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_CURRENT_AGE: u32 = 25;
const DEFAULT_TARGET_AGE: u32 = 80;

/// Minutes per day assigned to one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityAllocation {
    pub name: CategoryName,
    pub minutes_per_day: i64,
}

impl ActivityAllocation {
    pub fn new(name: CategoryName, minutes_per_day: i64) -> Self {
        Self {
            name,
            minutes_per_day,
        }
    }
}

/// Validation errors for life profile invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    InvalidAgeRange { current_age: u32, target_age: u32 },
    DuplicateCategory(CategoryName),
    MissingCategory(CategoryName),
    MinutesOutOfRange { name: CategoryName, minutes: i64 },
    OverAllocated { total: i64 },
    TotalMismatch { total: i64 },
    UnallocatedIsDerived,
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAgeRange {
                current_age,
                target_age,
            } => write!(
                f,
                "target age {target_age} must be greater than current age {current_age}"
            ),
            Self::DuplicateCategory(name) => write!(f, "duplicate allocation for `{name}`"),
            Self::MissingCategory(name) => write!(f, "missing allocation for `{name}`"),
            Self::MinutesOutOfRange { name, minutes } => write!(
                f,
                "minutes for `{name}` must be within 0..={MINUTES_PER_DAY}, got {minutes}"
            ),
            Self::OverAllocated { total } => write!(
                f,
                "allocated {total} minutes exceeds {MINUTES_PER_DAY} minutes per day"
            ),
            Self::TotalMismatch { total } => write!(
                f,
                "allocations sum to {total} minutes, expected {MINUTES_PER_DAY}"
            ),
            Self::UnallocatedIsDerived => {
                write!(f, "`Unallocated` is derived and cannot be set directly")
            }
        }
    }
}

impl Error for ProfileValidationError {}

/// A user's age range and daily time allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeProfile {
    pub current_age: u32,
    pub target_age: u32,
    pub activities: Vec<ActivityAllocation>,
}

impl Default for LifeProfile {
    fn default() -> Self {
        Self {
            current_age: DEFAULT_CURRENT_AGE,
            target_age: DEFAULT_TARGET_AGE,
            activities: vec![
                ActivityAllocation::new(CategoryName::Sleep, 480),
                ActivityAllocation::new(CategoryName::WorkStudy, 480),
                ActivityAllocation::new(CategoryName::Social, 120),
                ActivityAllocation::new(CategoryName::Exercise, 60),
                ActivityAllocation::new(CategoryName::Hobbies, 120),
                ActivityAllocation::new(CategoryName::Unallocated, 180),
            ],
        }
    }
}

impl LifeProfile {
    /// Builds a complete profile from onboarding input.
    ///
    /// Categories missing from `entries` start at zero; each entry is clamped
    /// to `[0, 1440]` and `Unallocated` receives the remainder.
    ///
    /// # Errors
    /// - `InvalidAgeRange` when `target_age <= current_age`.
    /// - `UnallocatedIsDerived` when `entries` names `Unallocated`.
    /// - `DuplicateCategory` when one category appears twice.
    /// - `OverAllocated` when the clamped entries exceed 1440 minutes.
    pub fn from_onboarding(
        current_age: u32,
        target_age: u32,
        entries: &[(CategoryName, i64)],
    ) -> Result<Self, ProfileValidationError> {
        validate_ages(current_age, target_age)?;

        let mut seen = BTreeSet::new();
        for (name, _) in entries {
            if name.is_unallocated() {
                return Err(ProfileValidationError::UnallocatedIsDerived);
            }
            if !seen.insert(*name) {
                return Err(ProfileValidationError::DuplicateCategory(*name));
            }
        }

        let mut activities = CategoryName::ALL
            .into_iter()
            .map(|name| {
                let minutes = entries
                    .iter()
                    .find(|(entry_name, _)| *entry_name == name)
                    .map_or(0, |(_, minutes)| clamp_minutes(*minutes));
                ActivityAllocation::new(name, minutes)
            })
            .collect::<Vec<_>>();

        let allocated = allocated_minutes(&activities);
        if allocated > MINUTES_PER_DAY {
            return Err(ProfileValidationError::OverAllocated { total: allocated });
        }
        set_minutes(
            &mut activities,
            CategoryName::Unallocated,
            MINUTES_PER_DAY - allocated,
        );

        Ok(Self {
            current_age,
            target_age,
            activities,
        })
    }

    /// Checks every profile invariant.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        validate_ages(self.current_age, self.target_age)?;

        let mut seen = BTreeSet::new();
        for activity in &self.activities {
            if !seen.insert(activity.name) {
                return Err(ProfileValidationError::DuplicateCategory(activity.name));
            }
            if !(0..=MINUTES_PER_DAY).contains(&activity.minutes_per_day) {
                return Err(ProfileValidationError::MinutesOutOfRange {
                    name: activity.name,
                    minutes: activity.minutes_per_day,
                });
            }
        }
        if let Some(missing) = CategoryName::ALL
            .into_iter()
            .find(|name| !seen.contains(name))
        {
            return Err(ProfileValidationError::MissingCategory(missing));
        }

        let total = self.total_minutes();
        if total != MINUTES_PER_DAY {
            return Err(ProfileValidationError::TotalMismatch { total });
        }
        Ok(())
    }

    /// Minutes per day for `name`, zero when absent.
    pub fn minutes_for(&self, name: CategoryName) -> i64 {
        self.activities
            .iter()
            .find(|activity| activity.name == name)
            .map_or(0, |activity| activity.minutes_per_day)
    }

    pub fn total_minutes(&self) -> i64 {
        self.activities
            .iter()
            .map(|activity| activity.minutes_per_day)
            .sum()
    }

    /// Remaining years until the target age, never negative.
    pub fn years_left(&self) -> u32 {
        self.target_age.saturating_sub(self.current_age)
    }

    /// Sets one category and rebalances `Unallocated`.
    ///
    /// `minutes` is clamped to what the other categories leave free, so the
    /// total stays at 1440. Returns the applied value.
    pub fn set_allocation(
        &mut self,
        name: CategoryName,
        minutes: i64,
    ) -> Result<i64, ProfileValidationError> {
        if name.is_unallocated() {
            return Err(ProfileValidationError::UnallocatedIsDerived);
        }

        let others = self
            .activities
            .iter()
            .filter(|activity| activity.name != name && !activity.name.is_unallocated())
            .map(|activity| activity.minutes_per_day)
            .sum::<i64>();
        let applied = minutes.clamp(0, (MINUTES_PER_DAY - others).max(0));

        set_minutes(&mut self.activities, name, applied);
        let allocated = allocated_minutes(&self.activities);
        set_minutes(
            &mut self.activities,
            CategoryName::Unallocated,
            (MINUTES_PER_DAY - allocated).max(0),
        );
        Ok(applied)
    }

    /// Replaces the age range after validation.
    pub fn set_ages(
        &mut self,
        current_age: u32,
        target_age: u32,
    ) -> Result<(), ProfileValidationError> {
        validate_ages(current_age, target_age)?;
        self.current_age = current_age;
        self.target_age = target_age;
        Ok(())
    }
}

/// Clamps a minute value into one day.
pub fn clamp_minutes(minutes: i64) -> i64 {
    minutes.clamp(0, MINUTES_PER_DAY)
}

fn validate_ages(current_age: u32, target_age: u32) -> Result<(), ProfileValidationError> {
    if target_age <= current_age {
        return Err(ProfileValidationError::InvalidAgeRange {
            current_age,
            target_age,
        });
    }
    Ok(())
}

fn allocated_minutes(activities: &[ActivityAllocation]) -> i64 {
    activities
        .iter()
        .filter(|activity| !activity.name.is_unallocated())
        .map(|activity| activity.minutes_per_day)
        .sum()
}

fn set_minutes(activities: &mut Vec<ActivityAllocation>, name: CategoryName, minutes: i64) {
    match activities.iter_mut().find(|activity| activity.name == name) {
        Some(activity) => activity.minutes_per_day = minutes,
        None => activities.push(ActivityAllocation::new(name, minutes)),
    }
}
