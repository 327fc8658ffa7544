use super::plate::PlateFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The group held by a single well and its 1-based replicate number within that group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellAssignment {
    pub group: String,
    pub replicate: usize,
}

impl WellAssignment {
    pub fn new(group: &str, replicate: usize) -> Self {
        Self {
            group: group.to_string(),
            replicate,
        }
    }
}

/// Mapping from well name to the group placed on it.
///
/// For every group the replicate numbers of its wells are kept contiguous
/// (`1..=k`) in canonical well order; see [`LayoutAssignment::renumber`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutAssignment {
    wells: BTreeMap<String, WellAssignment>,
}

impl LayoutAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    pub fn get(&self, well: &str) -> Option<&WellAssignment> {
        self.wells.get(well)
    }

    pub fn group_of(&self, well: &str) -> Option<&str> {
        self.wells.get(well).map(|a| a.group.as_str())
    }

    pub fn insert(&mut self, well: &str, assignment: WellAssignment) -> Option<WellAssignment> {
        self.wells.insert(well.to_string(), assignment)
    }

    pub fn remove(&mut self, well: &str) -> Option<WellAssignment> {
        self.wells.remove(well)
    }

    pub fn clear(&mut self) {
        self.wells.clear();
    }

    /// Iterates entries in lexical well-name order. Use [`LayoutAssignment::entries`]
    /// for the canonical plate order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WellAssignment)> {
        self.wells.iter().map(|(w, a)| (w.as_str(), a))
    }

    /// Occupied wells in canonical well order.
    pub fn entries(&self, plate: PlateFormat) -> Vec<(String, &WellAssignment)> {
        plate
            .well_order()
            .filter_map(|well| self.wells.get(&well).map(|a| (well, a)))
            .collect()
    }

    /// Wells holding `group`, in canonical well order.
    pub fn wells_of(&self, plate: PlateFormat, group: &str) -> Vec<String> {
        plate
            .well_order()
            .filter(|well| self.group_of(well) == Some(group))
            .collect()
    }

    pub fn count_of(&self, group: &str) -> usize {
        self.wells.values().filter(|a| a.group == group).count()
    }

    /// Reassigns `1, 2, 3, …` to the wells of `group` in canonical well order.
    pub fn renumber(&mut self, plate: PlateFormat, group: &str) {
        let mut next = 1;
        for well in plate.well_order() {
            if let Some(assignment) = self.wells.get_mut(&well) {
                if assignment.group == group {
                    assignment.replicate = next;
                    next += 1;
                }
            }
        }
    }

    /// Removes every well holding `group` and returns how many were removed.
    pub fn remove_group(&mut self, group: &str) -> usize {
        let before = self.wells.len();
        self.wells.retain(|_, a| a.group != group);
        before - self.wells.len()
    }

    /// Distinct group names in canonical order of first appearance.
    pub fn groups(&self, plate: PlateFormat) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for (_, assignment) in self.entries(plate) {
            if !seen.contains(&assignment.group) {
                seen.push(assignment.group.clone());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_from(entries: &[(&str, &str, usize)]) -> LayoutAssignment {
        let mut layout = LayoutAssignment::new();
        for (well, group, replicate) in entries {
            layout.insert(well, WellAssignment::new(group, *replicate));
        }
        layout
    }

    #[test]
    fn renumber_walks_canonical_order_not_lexical_order() {
        // Lexically "A10" sorts before "A2"; canonical order puts A2 first.
        let mut layout = layout_from(&[("A10", "Ctrl", 1), ("A2", "Ctrl", 7)]);
        layout.renumber(PlateFormat::NinetySix, "Ctrl");
        assert_eq!(layout.get("A2").unwrap().replicate, 1);
        assert_eq!(layout.get("A10").unwrap().replicate, 2);
    }

    #[test]
    fn renumber_leaves_other_groups_untouched() {
        let mut layout = layout_from(&[("A1", "Ctrl", 5), ("A2", "Drug", 9)]);
        layout.renumber(PlateFormat::Six, "Ctrl");
        assert_eq!(layout.get("A1").unwrap().replicate, 1);
        assert_eq!(layout.get("A2").unwrap().replicate, 9);
    }

    #[test]
    fn remove_group_drops_only_that_group() {
        let mut layout = layout_from(&[("A1", "Ctrl", 1), ("A2", "Drug", 1), ("A3", "Ctrl", 2)]);
        assert_eq!(layout.remove_group("Ctrl"), 2);
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.group_of("A2"), Some("Drug"));
    }

    #[test]
    fn wells_of_and_groups_follow_canonical_order() {
        let layout = layout_from(&[("B1", "Drug", 2), ("A3", "Drug", 1), ("A1", "Ctrl", 1)]);
        let plate = PlateFormat::Six;
        assert_eq!(layout.wells_of(plate, "Drug"), vec!["A3", "B1"]);
        assert_eq!(layout.groups(plate), vec!["Ctrl", "Drug"]);
        assert_eq!(layout.count_of("Drug"), 2);
    }

    #[test]
    fn serializes_as_flat_well_map() {
        let layout = layout_from(&[("A1", "Ctrl", 1)]);
        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json, serde_json::json!({"A1": {"group": "Ctrl", "replicate": 1}}));
    }
}
