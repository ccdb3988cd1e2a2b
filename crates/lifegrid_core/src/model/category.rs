//! Fixed activity category registry.
//!
//! # Responsibility
//! - Enumerate the activity categories used to label time allocations.
//! - Provide display metadata (color, description) for each category.
//!
//! # Invariants
//! - The registry is fixed at compile time and never mutated.
//! - `Unallocated` is the slack category that absorbs remaining minutes.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Minutes in one day; the total every complete allocation must reach.
pub const MINUTES_PER_DAY: i64 = 1440;

/// Activity category name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoryName {
    Sleep,
    #[serde(rename = "Work/Study")]
    WorkStudy,
    Social,
    Exercise,
    Hobbies,
    Unallocated,
}

impl CategoryName {
    /// All categories in registry order.
    pub const ALL: [CategoryName; 6] = [
        CategoryName::Sleep,
        CategoryName::WorkStudy,
        CategoryName::Social,
        CategoryName::Exercise,
        CategoryName::Hobbies,
        CategoryName::Unallocated,
    ];

    /// Stable display label, also used on the wire.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sleep => "Sleep",
            Self::WorkStudy => "Work/Study",
            Self::Social => "Social",
            Self::Exercise => "Exercise",
            Self::Hobbies => "Hobbies",
            Self::Unallocated => "Unallocated",
        }
    }

    /// Parses a display label, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|name| name.label().eq_ignore_ascii_case(normalized))
    }

    pub fn is_unallocated(self) -> bool {
        self == Self::Unallocated
    }

    /// Registry metadata for this category.
    pub fn category(self) -> &'static ActivityCategory {
        &CATEGORIES[self as usize]
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display metadata for one activity category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCategory {
    pub name: CategoryName,
    /// CSS-style hex color used by grid/orb views.
    pub color: &'static str,
    pub description: &'static str,
}

static CATEGORIES: [ActivityCategory; 6] = [
    ActivityCategory {
        name: CategoryName::Sleep,
        color: "#6366f1",
        description: "Time spent sleeping or resting",
    },
    ActivityCategory {
        name: CategoryName::WorkStudy,
        color: "#f59e0b",
        description: "Work, school and study time",
    },
    ActivityCategory {
        name: CategoryName::Social,
        color: "#ec4899",
        description: "Time with friends, family and community",
    },
    ActivityCategory {
        name: CategoryName::Exercise,
        color: "#10b981",
        description: "Physical activity and sport",
    },
    ActivityCategory {
        name: CategoryName::Hobbies,
        color: "#3b82f6",
        description: "Creative pursuits and personal interests",
    },
    ActivityCategory {
        name: CategoryName::Unallocated,
        color: "#9ca3af",
        description: "Time not assigned to any category",
    },
];

/// Returns the full category registry in display order.
pub fn categories() -> &'static [ActivityCategory] {
    &CATEGORIES
}

#[cfg(test)]
mod tests {
    use super::{categories, CategoryName};

    #[test]
    fn registry_order_matches_enum_discriminants() {
        for (index, category) in categories().iter().enumerate() {
            assert_eq!(category.name as usize, index);
            assert_eq!(category.name.category().name, category.name);
        }
    }

    #[test]
    fn parse_accepts_wire_labels() {
        assert_eq!(CategoryName::parse("work/study"), Some(CategoryName::WorkStudy));
        assert_eq!(CategoryName::parse(" Sleep "), Some(CategoryName::Sleep));
        assert_eq!(CategoryName::parse("naps"), None);
    }

    #[test]
    fn serde_uses_display_labels() {
        let json = serde_json::to_string(&CategoryName::WorkStudy).unwrap();
        assert_eq!(json, "\"Work/Study\"");
    }
}
