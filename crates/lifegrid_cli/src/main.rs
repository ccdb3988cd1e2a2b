//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `lifegrid_core` linkage.
//! - Print one deterministic simulation so arithmetic regressions are visible
//!   without the UI shell.

use chrono::Local;
use lifegrid_core::{simulation_impact, CategoryName, DayKey, DeltaSet, LifeProfile};

fn main() {
    println!("lifegrid_core ping={}", lifegrid_core::ping());
    println!("lifegrid_core version={}", lifegrid_core::core_version());
    println!(
        "lifegrid_core today_key={}",
        DayKey::from_date(&Local::now().date_naive())
    );

    let profile = LifeProfile::default();
    let mut deltas = DeltaSet::new();
    deltas.set(CategoryName::Exercise, 30);
    let impact = simulation_impact(&profile, &deltas);
    println!(
        "lifegrid_core sample_delta=Exercise:+30 annual_hours={:.1} lifetime_days={:.1} direction={}",
        impact.annual_hours_changed,
        impact.lifetime_days_changed,
        impact.direction.label()
    );
}
