//! End-to-end flows through the services over a file-backed store

mod common;

use common::{day, TestApp};
use elevation_tracker_app::error::AppError;
use elevation_tracker_app::services::{AchievementService, ChallengeService, SettingsService, WorkoutService};
use elevation_tracker_shared::{
    AddProgressRequest, ChallengeKind, ChallengeStatus, CreateChallengeRequest, DistanceUnit,
    EditWorkoutRequest, HeightUnit, MetricKind, WeightUnit,
};

#[test]
fn test_climbing_challenge_end_to_end() {
    let mut app = TestApp::new();
    let ride = app.log(Some(500.0), None);
    let mass_kg = app.state.mass_kg().unwrap();
    assert_eq!(mass_kg, 80.0);

    let everest = ChallengeService::add_to_my_challenges(app.store(), "everest", day(2)).unwrap();
    let update = ChallengeService::add_progress(
        app.store(),
        AddProgressRequest {
            instance_id: everest.instance_id.clone(),
            workout_ids: vec![ride.id],
        },
        mass_kg,
    )
    .unwrap();
    assert!((update.contribution - 608.643114621201).abs() < 1e-9);
    assert!(!update.completed_now);

    // Everything survives a reopen of the same file
    let mut app = app.reopen();
    let mine = ChallengeService::list_my_challenges(app.store()).unwrap();
    assert_eq!(mine.len(), 1);
    assert!((mine[0].progress - 608.643114621201).abs() < 1e-9);
    assert_eq!(mine[0].status, ChallengeStatus::Active);

    let unlocked: Vec<&str> = AchievementService::badges(app.store())
        .unwrap()
        .into_iter()
        .filter(|s| s.unlocked)
        .map(|s| s.badge.id)
        .collect();
    assert_eq!(unlocked, vec!["first-ride", "eiffel"]);
}

#[test]
fn test_custom_distance_challenge_completes() {
    let mut app = TestApp::new();
    let now = app.tick();
    let template = ChallengeService::create_custom(
        app.store(),
        CreateChallengeRequest {
            title: "Coast to coast".to_string(),
            kind: ChallengeKind::Distance,
            target: 10.0,
            height_unit: HeightUnit::Meters,
            distance_unit: DistanceUnit::Miles,
        },
        now,
    )
    .unwrap();
    assert_eq!(template.target_value, 16.09);

    let first = app.log(None, Some(6.0));
    let second = app.log(Some(250.0), Some(4.5));
    let instance = ChallengeService::add_to_my_challenges(app.store(), &template.id, day(3)).unwrap();

    let update = ChallengeService::add_progress(
        app.store(),
        AddProgressRequest {
            instance_id: instance.instance_id,
            workout_ids: vec![first.id, second.id],
        },
        80.0,
    )
    .unwrap();
    assert!((update.contribution - 10.5 * 1.60934).abs() < 1e-9);
    assert!(update.completed_now);
    assert!(update.newly_unlocked.is_empty());

    // Deleting the template leaves the started instance alone
    ChallengeService::delete_custom(app.store(), &template.id).unwrap();
    let mine = ChallengeService::list_my_challenges(app.store()).unwrap();
    assert_eq!(mine[0].status, ChallengeStatus::Completed);
}

#[test]
fn test_edit_then_lifetime_facts() {
    let mut app = TestApp::new();
    let ride = app.log(Some(300.0), Some(20.0));

    let edited = WorkoutService::edit_workout(
        app.store(),
        EditWorkoutRequest {
            id: ride.id,
            date: day(4),
            title: "Corrected".to_string(),
            metric: MetricKind::Energy,
            value: 500.0,
        },
    )
    .unwrap();
    assert_eq!(edited.distance_miles(), None);

    let facts = AchievementService::lifetime_facts(app.store(), 80.0).unwrap();
    assert!((facts.totals.climbing_meters - 608.643114621201).abs() < 1e-9);
    assert_eq!(facts.totals.distance_km, 0.0);
    assert_eq!(facts.distance_comparison, "Start your journey!");
}

#[test]
fn test_weight_in_pounds_drives_conversion() {
    let mut app = TestApp::new();
    SettingsService::set_units(app.store(), Some(WeightUnit::Lbs), None, 80.0).unwrap();
    SettingsService::set_body_weight(app.store(), 176.4).unwrap();

    let mass_kg = app.state.mass_kg().unwrap();
    assert!((mass_kg - 176.4 * 0.453592).abs() < 1e-9);

    let result = AchievementService::calculate(app.store(), 500.0, mass_kg).unwrap();
    assert!((result.elevation.meters - 608.6).abs() < 0.5);
}

#[test]
fn test_incompatible_progress_is_reported() {
    let mut app = TestApp::new();
    let run = app.log(None, Some(5.0));
    let everest = ChallengeService::add_to_my_challenges(app.store(), "everest", day(5)).unwrap();

    let err = ChallengeService::add_progress(
        app.store(),
        AddProgressRequest {
            instance_id: everest.instance_id,
            workout_ids: vec![run.id],
        },
        80.0,
    )
    .unwrap_err();
    assert_eq!(err.code(), "NO_COMPATIBLE_WORKOUTS");
    assert_eq!(err.user_message(), "No compatible workouts selected (check units)");
    assert!(matches!(err, AppError::Engine(_)));
}
