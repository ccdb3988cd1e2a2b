//! Lifetime-impact figures for a simulated change.
//!
//! Formulas are fixed:
//! - `annual_hours = |total_delta| * 365 / 60`
//! - `lifetime_days = annual_hours * years_left / 24`
//! - `lifetime_years = lifetime_days / 365`
//!
//! The magnitudes are unsigned; `direction` carries the sign of the delta.

use crate::model::category::CategoryName;
use crate::model::profile::LifeProfile;
use crate::simulation::delta::DeltaSet;
use serde::Serialize;

const DAYS_PER_YEAR: f64 = 365.0;
const MINUTES_PER_HOUR: f64 = 60.0;
const HOURS_PER_DAY: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactDirection {
    Gained,
    Lost,
    Unchanged,
}

impl ImpactDirection {
    pub fn from_delta(total_delta_minutes: i64) -> Self {
        match total_delta_minutes.signum() {
            1 => Self::Gained,
            -1 => Self::Lost,
            _ => Self::Unchanged,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Gained => "Gained",
            Self::Lost => "Lost",
            Self::Unchanged => "Unchanged",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LifetimeImpact {
    pub total_delta_minutes: i64,
    pub years_left: u32,
    pub annual_hours_changed: f64,
    pub lifetime_days_changed: f64,
    pub lifetime_years_changed: f64,
    pub direction: ImpactDirection,
}

/// Computes the impact of changing a day by `total_delta_minutes`.
pub fn lifetime_impact(total_delta_minutes: i64, current_age: u32, target_age: u32) -> LifetimeImpact {
    let years_left = target_age.saturating_sub(current_age);
    let annual_hours_changed = total_delta_minutes.unsigned_abs() as f64 * DAYS_PER_YEAR / MINUTES_PER_HOUR;
    let lifetime_days_changed = annual_hours_changed.abs() * f64::from(years_left) / HOURS_PER_DAY;
    LifetimeImpact {
        total_delta_minutes,
        years_left,
        annual_hours_changed,
        lifetime_days_changed,
        lifetime_years_changed: lifetime_days_changed / DAYS_PER_YEAR,
        direction: ImpactDirection::from_delta(total_delta_minutes),
    }
}

/// Impact of the whole delta set on `profile`.
pub fn simulation_impact(profile: &LifeProfile, deltas: &DeltaSet) -> LifetimeImpact {
    lifetime_impact(deltas.total(), profile.current_age, profile.target_age)
}

/// Impact of each active delta on its own, in delta order.
pub fn category_impacts(profile: &LifeProfile, deltas: &DeltaSet) -> Vec<(CategoryName, LifetimeImpact)> {
    deltas
        .as_slice()
        .iter()
        .map(|delta| {
            (
                delta.name,
                lifetime_impact(delta.delta_minutes, profile.current_age, profile.target_age),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{lifetime_impact, ImpactDirection};

    #[test]
    fn thirty_minutes_over_forty_years() {
        let impact = lifetime_impact(30, 40, 80);
        assert_eq!(impact.years_left, 40);
        assert_eq!(impact.annual_hours_changed, 182.5);
        assert!((impact.lifetime_days_changed - 304.1666).abs() < 1e-3);
        assert_eq!(impact.direction, ImpactDirection::Gained);
    }

    #[test]
    fn negative_delta_keeps_unsigned_magnitudes() {
        let impact = lifetime_impact(-60, 30, 31);
        assert_eq!(impact.annual_hours_changed, 365.0);
        assert_eq!(impact.direction, ImpactDirection::Lost);
        assert_eq!(impact.direction.label(), "Lost");
    }

    #[test]
    fn past_target_age_has_no_lifetime_change() {
        let impact = lifetime_impact(45, 90, 80);
        assert_eq!(impact.years_left, 0);
        assert_eq!(impact.lifetime_days_changed, 0.0);
        assert_eq!(lifetime_impact(0, 20, 80).direction, ImpactDirection::Unchanged);
    }
}
