//! Week-of-life breakdown backing the grid/orb views.
//!
//! One cell per week of life up to the target age. Lived weeks come first;
//! remaining weeks are split between categories in proportion to their
//! minutes per day, using largest remainders so the split adds up exactly.

use crate::model::category::{CategoryName, MINUTES_PER_DAY};
use crate::model::profile::ActivityAllocation;
use serde::Serialize;

pub const WEEKS_PER_YEAR: u32 = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryWeeks {
    pub name: CategoryName,
    pub weeks: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifeWeeks {
    pub total_weeks: u32,
    pub weeks_lived: u32,
    pub weeks_remaining: u32,
    /// Remaining weeks per category, in allocation order.
    pub per_category: Vec<CategoryWeeks>,
}

impl LifeWeeks {
    /// Category of week `index`; `None` for lived or out-of-range weeks.
    pub fn category_for_week(&self, index: u32) -> Option<CategoryName> {
        if index < self.weeks_lived || index >= self.total_weeks {
            return None;
        }
        let mut offset = index - self.weeks_lived;
        for entry in &self.per_category {
            if offset < entry.weeks {
                return Some(entry.name);
            }
            offset -= entry.weeks;
        }
        None
    }
}

/// Splits the weeks between `current_age` and `target_age` by allocation.
pub fn life_weeks(current_age: u32, target_age: u32, activities: &[ActivityAllocation]) -> LifeWeeks {
    let total_weeks = target_age.saturating_mul(WEEKS_PER_YEAR);
    let weeks_lived = current_age.saturating_mul(WEEKS_PER_YEAR).min(total_weeks);
    let weeks_remaining = total_weeks - weeks_lived;

    let remaining = u64::from(weeks_remaining);
    let day = MINUTES_PER_DAY as u64;
    let mut shares = activities
        .iter()
        .enumerate()
        .map(|(index, activity)| {
            let minutes = activity.minutes_per_day.clamp(0, MINUTES_PER_DAY) as u64;
            let scaled = remaining * minutes;
            (index, activity.name, scaled / day, scaled % day)
        })
        .collect::<Vec<_>>();

    let assigned = shares.iter().map(|(_, _, weeks, _)| *weeks).sum::<u64>();
    let mut leftover = remaining.saturating_sub(assigned);
    let mut by_remainder = shares.iter().map(|(index, _, _, rem)| (*index, *rem)).collect::<Vec<_>>();
    by_remainder.sort_by(|left, right| right.1.cmp(&left.1).then(left.0.cmp(&right.0)));
    for (index, remainder) in by_remainder {
        if leftover == 0 || remainder == 0 {
            break;
        }
        shares[index].2 += 1;
        leftover -= 1;
    }

    LifeWeeks {
        total_weeks,
        weeks_lived,
        weeks_remaining,
        per_category: shares
            .into_iter()
            .map(|(_, name, weeks, _)| CategoryWeeks {
                name,
                weeks: u32::try_from(weeks).unwrap_or(u32::MAX),
            })
            .collect(),
    }
}
