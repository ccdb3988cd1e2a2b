use lifegrid_core::simulation::impact::{category_impacts, ImpactDirection};
use lifegrid_core::simulation::life_weeks::life_weeks;
use lifegrid_core::{
    apply_deltas, commit_deltas, simulation_impact, ActivityAllocation, CategoryName, DeltaSet,
    LifeProfile, MINUTES_PER_DAY,
};

fn minutes(allocation: &[ActivityAllocation]) -> Vec<i64> {
    allocation
        .iter()
        .map(|activity| activity.minutes_per_day)
        .collect()
}

fn base_profile() -> LifeProfile {
    LifeProfile::from_onboarding(
        35,
        80,
        &[
            (CategoryName::Sleep, 480),
            (CategoryName::WorkStudy, 480),
            (CategoryName::Social, 120),
            (CategoryName::Exercise, 120),
            (CategoryName::Hobbies, 60),
        ],
    )
    .unwrap()
}

#[test]
fn hobby_gain_is_paid_by_unallocated() {
    let profile = base_profile();
    assert_eq!(minutes(&profile.activities), vec![480, 480, 120, 120, 60, 180]);

    let mut deltas = DeltaSet::new();
    deltas.set(CategoryName::Hobbies, 30);

    let modified = apply_deltas(&profile.activities, &deltas);
    assert_eq!(minutes(&modified), vec![480, 480, 120, 120, 90, 150]);
    assert_eq!(
        modified.iter().map(|a| a.minutes_per_day).sum::<i64>(),
        MINUTES_PER_DAY
    );
}

#[test]
fn single_delta_moves_unallocated_by_its_negation() {
    let profile = LifeProfile::default();
    for (name, delta) in [
        (CategoryName::Sleep, -45),
        (CategoryName::Social, 20),
        (CategoryName::WorkStudy, 100),
    ] {
        let mut deltas = DeltaSet::new();
        deltas.set(name, delta);
        let modified = apply_deltas(&profile.activities, &deltas);
        let unallocated = modified
            .iter()
            .find(|activity| activity.name == CategoryName::Unallocated)
            .unwrap();
        assert_eq!(
            unallocated.minutes_per_day,
            profile.minutes_for(CategoryName::Unallocated) - delta
        );
    }
}

#[test]
fn zero_delta_equals_no_delta() {
    let profile = LifeProfile::default();
    let mut zero = DeltaSet::new();
    zero.set(CategoryName::Exercise, 0);

    assert_eq!(
        apply_deltas(&profile.activities, &zero),
        apply_deltas(&profile.activities, &DeltaSet::new())
    );
    assert_eq!(simulation_impact(&profile, &zero).direction, ImpactDirection::Unchanged);
}

#[test]
fn impact_reports_whole_set_and_each_category() {
    let profile = base_profile();
    let mut deltas = DeltaSet::new();
    deltas.set(CategoryName::Exercise, 30);
    deltas.set(CategoryName::Social, -90);

    let total = simulation_impact(&profile, &deltas);
    assert_eq!(total.total_delta_minutes, -60);
    assert_eq!(total.years_left, 45);
    assert_eq!(total.annual_hours_changed, 365.0);
    assert_eq!(total.direction, ImpactDirection::Lost);

    let per_category = category_impacts(&profile, &deltas);
    assert_eq!(per_category.len(), 2);
    assert_eq!(per_category[0].0, CategoryName::Exercise);
    assert_eq!(per_category[0].1.direction, ImpactDirection::Gained);
    assert_eq!(per_category[1].1.annual_hours_changed, 547.5);
}

#[test]
fn committed_simulation_stays_a_valid_profile() {
    let profile = base_profile();
    let mut deltas = DeltaSet::new();
    deltas.set(CategoryName::Sleep, 900);

    let committed = commit_deltas(&profile, &deltas).unwrap();
    committed.validate().unwrap();
    assert_eq!(committed.minutes_for(CategoryName::Unallocated), 0);

    let weeks = life_weeks(committed.current_age, committed.target_age, &committed.activities);
    assert_eq!(
        weeks.per_category.iter().map(|entry| entry.weeks).sum::<u32>(),
        weeks.weeks_remaining
    );
}
