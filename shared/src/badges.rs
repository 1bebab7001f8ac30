//! Achievement badges unlocked by cumulative climbing

use std::collections::BTreeSet;

use crate::models::Badge;

/// Badge catalog, ascending by threshold
pub const BADGE_CATALOG: &[Badge] = &[
    Badge { id: "first-ride", threshold_meters: 10.0, display_name: "First Ride" },
    Badge { id: "eiffel", threshold_meters: 324.0, display_name: "Eiffel Tower" },
    Badge { id: "montblanc", threshold_meters: 4807.0, display_name: "Mont Blanc" },
    Badge { id: "kilimanjaro", threshold_meters: 5895.0, display_name: "Kilimanjaro" },
    Badge { id: "k2", threshold_meters: 8611.0, display_name: "K2" },
    Badge { id: "everest", threshold_meters: 8848.0, display_name: "Mt. Everest" },
];

/// Badges reached by `cumulative_meters` that are not yet in `unlocked`, in
/// catalog order.
///
/// Never revokes anything; a NaN total unlocks nothing.
pub fn evaluate_badges(
    cumulative_meters: f64,
    unlocked: &BTreeSet<String>,
) -> Vec<&'static Badge> {
    BADGE_CATALOG
        .iter()
        .filter(|b| cumulative_meters >= b.threshold_meters && !unlocked.contains(b.id))
        .collect()
}

/// Union of the stored set and the newly unlocked badges
pub fn unlock(unlocked: &BTreeSet<String>, newly: &[&Badge]) -> BTreeSet<String> {
    let mut next = unlocked.clone();
    next.extend(newly.iter().map(|b| b.id.to_string()));
    next
}
