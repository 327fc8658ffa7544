//! Group → well assignment: bulk generation, randomized reshuffling, and
//! single-well paint/erase edits.
//!
//! Every structural edit finishes by renumbering the affected groups, so each
//! group's replicate numbers stay `1..=k` in canonical well order.

use super::error::AnalysisError;
use crate::core::models::experiment::LayoutDirection;
use crate::core::models::group::Group;
use crate::core::models::layout::{LayoutAssignment, WellAssignment};
use crate::core::models::plate::PlateFormat;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// Places `replicates` consecutive wells per group, in group order.
///
/// Wells are taken in canonical order for [`LayoutDirection::ByRow`] and in
/// column-major order for [`LayoutDirection::ByColumn`]. Fails without
/// producing a layout when the groups do not fit on the plate.
#[instrument(level = "debug", skip(groups), fields(groups = groups.len()))]
pub fn generate(
    plate: PlateFormat,
    groups: &[Group],
    replicates: usize,
    direction: LayoutDirection,
) -> Result<LayoutAssignment, AnalysisError> {
    let available = plate.well_count();
    let required = groups.len().checked_mul(replicates).unwrap_or(usize::MAX);
    if required > available {
        return Err(AnalysisError::Capacity {
            required,
            available,
        });
    }

    let mut wells = match direction {
        LayoutDirection::ByRow => plate.well_order(),
        LayoutDirection::ByColumn => plate.column_order(),
    };

    let mut layout = LayoutAssignment::new();
    for group in groups {
        for replicate in 1..=replicates {
            // Capacity was checked above, so the traversal cannot run dry here.
            if let Some(well) = wells.next() {
                layout.insert(&well, WellAssignment::new(&group.name, replicate));
            }
        }
    }
    debug!("Generated layout with {} occupied wells", layout.len());
    Ok(layout)
}

/// Shuffles the occupied payloads onto the first `n` wells of the canonical
/// order, where `n` is the number of occupied wells.
///
/// Payloads are collected in canonical order of their current wells and paired
/// with a Fisher–Yates permutation of the target wells. The multiset of
/// `(group, replicate)` payloads is preserved exactly.
#[instrument(level = "debug", skip_all, fields(occupied = layout.len()))]
pub fn randomize(
    plate: PlateFormat,
    layout: &LayoutAssignment,
    rng: &mut impl Rng,
) -> LayoutAssignment {
    let payloads: Vec<WellAssignment> = layout
        .entries(plate)
        .into_iter()
        .map(|(_, assignment)| assignment.clone())
        .collect();
    if payloads.is_empty() {
        return layout.clone();
    }

    let mut wells: Vec<String> = plate.well_order().take(payloads.len()).collect();
    wells.shuffle(rng);

    let mut shuffled = LayoutAssignment::new();
    for (well, payload) in wells.iter().zip(payloads) {
        shuffled.insert(well, payload);
    }
    shuffled
}

/// Assigns `group` to `well` as its next replicate, then closes any gap left in
/// the group the well previously held. Painting a well with the group it
/// already holds does nothing.
pub fn paint_well(plate: PlateFormat, layout: &mut LayoutAssignment, well: &str, group: &str) {
    let previous = layout.group_of(well).map(str::to_string);
    if previous.as_deref() == Some(group) {
        return;
    }

    let next = layout.count_of(group) + 1;
    layout.insert(well, WellAssignment::new(group, next));

    if let Some(previous) = previous {
        layout.renumber(plate, &previous);
    }
    layout.renumber(plate, group);
}

/// Clears `well` and renumbers the group it held. Returns the removed entry.
pub fn erase_well(
    plate: PlateFormat,
    layout: &mut LayoutAssignment,
    well: &str,
) -> Option<WellAssignment> {
    let removed = layout.remove(well)?;
    layout.renumber(plate, &removed.group);
    Some(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn groups(names: &[&str]) -> Vec<Group> {
        names.iter().map(|n| Group::new(n, "#000000")).collect()
    }

    fn replicates_by_group(layout: &LayoutAssignment) -> HashMap<String, Vec<usize>> {
        let mut map: HashMap<String, Vec<usize>> = HashMap::new();
        for (_, assignment) in layout.iter() {
            map.entry(assignment.group.clone())
                .or_default()
                .push(assignment.replicate);
        }
        for reps in map.values_mut() {
            reps.sort_unstable();
        }
        map
    }

    fn assert_contiguous(layout: &LayoutAssignment) {
        for (group, reps) in replicates_by_group(layout) {
            let expected: Vec<usize> = (1..=reps.len()).collect();
            assert_eq!(reps, expected, "group {} has gaps", group);
        }
    }

    #[test]
    fn generate_by_row_fills_canonical_order() {
        let layout = generate(
            PlateFormat::Six,
            &groups(&["Ctrl", "Drug"]),
            3,
            LayoutDirection::ByRow,
        )
        .unwrap();
        assert_eq!(layout.wells_of(PlateFormat::Six, "Ctrl"), vec!["A1", "A2", "A3"]);
        assert_eq!(layout.wells_of(PlateFormat::Six, "Drug"), vec!["B1", "B2", "B3"]);
        assert_eq!(layout.get("B3"), Some(&WellAssignment::new("Drug", 3)));
    }

    #[test]
    fn generate_by_column_fills_column_major_order() {
        let layout = generate(
            PlateFormat::Six,
            &groups(&["Ctrl", "Drug"]),
            2,
            LayoutDirection::ByColumn,
        )
        .unwrap();
        assert_eq!(layout.wells_of(PlateFormat::Six, "Ctrl"), vec!["A1", "B1"]);
        assert_eq!(layout.wells_of(PlateFormat::Six, "Drug"), vec!["A2", "B2"]);
    }

    #[test]
    fn generate_never_leaves_replicate_gaps() {
        let layout = generate(
            PlateFormat::NinetySix,
            &groups(&["A", "B", "C", "D", "E"]),
            7,
            LayoutDirection::ByColumn,
        )
        .unwrap();
        assert_eq!(layout.len(), 35);
        assert_contiguous(&layout);
    }

    #[test]
    fn generate_fails_when_layout_exceeds_capacity() {
        let result = generate(
            PlateFormat::Six,
            &groups(&["A", "B", "C"]),
            3,
            LayoutDirection::ByRow,
        );
        assert_eq!(
            result,
            Err(AnalysisError::Capacity {
                required: 9,
                available: 6
            })
        );
    }

    #[test]
    fn generate_rejects_replicate_counts_that_overflow() {
        let result = generate(
            PlateFormat::Six,
            &groups(&["A", "B"]),
            usize::MAX,
            LayoutDirection::ByRow,
        );
        assert_eq!(
            result,
            Err(AnalysisError::Capacity {
                required: usize::MAX,
                available: 6
            })
        );
    }

    #[test]
    fn generate_fills_plate_exactly_at_capacity() {
        let layout = generate(
            PlateFormat::Twelve,
            &groups(&["A", "B", "C"]),
            4,
            LayoutDirection::ByRow,
        )
        .unwrap();
        assert_eq!(layout.len(), 12);
    }

    #[test]
    fn randomize_preserves_payloads_and_occupies_leading_wells() {
        let plate = PlateFormat::NinetySix;
        let layout = generate(plate, &groups(&["A", "B", "C"]), 4, LayoutDirection::ByColumn)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let shuffled = randomize(plate, &layout, &mut rng);

        assert_eq!(shuffled.len(), layout.len());
        let mut before: Vec<WellAssignment> = layout.iter().map(|(_, a)| a.clone()).collect();
        let mut after: Vec<WellAssignment> = shuffled.iter().map(|(_, a)| a.clone()).collect();
        before.sort_by(|a, b| (&a.group, a.replicate).cmp(&(&b.group, b.replicate)));
        after.sort_by(|a, b| (&a.group, a.replicate).cmp(&(&b.group, b.replicate)));
        assert_eq!(before, after);

        let leading: Vec<String> = plate.well_order().take(12).collect();
        for well in &leading {
            assert!(shuffled.get(well).is_some(), "{} should be occupied", well);
        }
    }

    #[test]
    fn randomize_is_reproducible_for_a_fixed_seed() {
        let plate = PlateFormat::TwentyFour;
        let layout =
            generate(plate, &groups(&["A", "B", "C", "D"]), 5, LayoutDirection::ByRow).unwrap();
        let first = randomize(plate, &layout, &mut StdRng::seed_from_u64(42));
        let second = randomize(plate, &layout, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn randomize_reaches_every_position() {
        let plate = PlateFormat::Six;
        let layout = generate(plate, &groups(&["A", "B", "C"]), 2, LayoutDirection::ByRow)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen_in_a1: HashMap<(String, usize), usize> = HashMap::new();
        for _ in 0..600 {
            let shuffled = randomize(plate, &layout, &mut rng);
            let payload = shuffled.get("A1").unwrap();
            *seen_in_a1
                .entry((payload.group.clone(), payload.replicate))
                .or_default() += 1;
        }
        // Six payloads, uniform shuffle: each lands in A1 about 100 times.
        assert_eq!(seen_in_a1.len(), 6);
        for count in seen_in_a1.values() {
            assert!((50..=150).contains(count), "skewed count {}", count);
        }
    }

    #[test]
    fn randomize_empty_layout_is_a_no_op() {
        let layout = LayoutAssignment::new();
        let shuffled = randomize(PlateFormat::Six, &layout, &mut StdRng::seed_from_u64(0));
        assert!(shuffled.is_empty());
    }

    #[test]
    fn paint_well_appends_next_replicate() {
        let plate = PlateFormat::Six;
        let mut layout = LayoutAssignment::new();
        paint_well(plate, &mut layout, "B2", "Ctrl");
        paint_well(plate, &mut layout, "A1", "Ctrl");
        // Renumbering follows canonical order, so A1 becomes replicate 1.
        assert_eq!(layout.get("A1").unwrap().replicate, 1);
        assert_eq!(layout.get("B2").unwrap().replicate, 2);
    }

    #[test]
    fn paint_over_other_group_closes_its_gap() {
        let plate = PlateFormat::Six;
        let mut layout =
            generate(plate, &groups(&["Ctrl", "Drug"]), 3, LayoutDirection::ByRow).unwrap();
        paint_well(plate, &mut layout, "A2", "Drug");

        assert_eq!(layout.get("A1").unwrap(), &WellAssignment::new("Ctrl", 1));
        assert_eq!(layout.get("A3").unwrap(), &WellAssignment::new("Ctrl", 2));
        assert_eq!(layout.get("A2").unwrap(), &WellAssignment::new("Drug", 1));
        assert_eq!(layout.get("B3").unwrap(), &WellAssignment::new("Drug", 4));
        assert_contiguous(&layout);
    }

    #[test]
    fn paint_with_same_group_is_a_no_op() {
        let plate = PlateFormat::Six;
        let mut layout =
            generate(plate, &groups(&["Ctrl"]), 2, LayoutDirection::ByRow).unwrap();
        let before = layout.clone();
        paint_well(plate, &mut layout, "A2", "Ctrl");
        assert_eq!(layout, before);
    }

    #[test]
    fn erase_well_renumbers_remaining_wells() {
        let plate = PlateFormat::Six;
        let mut layout =
            generate(plate, &groups(&["Ctrl"]), 3, LayoutDirection::ByRow).unwrap();
        let removed = erase_well(plate, &mut layout, "A1");
        assert_eq!(removed, Some(WellAssignment::new("Ctrl", 1)));
        assert_eq!(layout.get("A2").unwrap().replicate, 1);
        assert_eq!(layout.get("A3").unwrap().replicate, 2);
        assert_eq!(erase_well(plate, &mut layout, "B1"), None);
    }
}
