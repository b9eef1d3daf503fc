//! Presets and the display-set matching algorithm.

use std::collections::BTreeSet;
use std::fmt;

use scenewatch_common::error::{WatchError, WatchResult};

use crate::displays::DisplaySet;

/// A named display configuration mapped to OBS targets.
///
/// Immutable once constructed; the whole table is replaced on config
/// reload, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub name: String,
    pub displays: Vec<String>,
    pub profile_name: String,
    pub scene_collection_name: String,
}

impl Preset {
    /// Case-insensitive, order-independent, cardinality-exact comparison
    /// against the current display set.
    pub fn matches(&self, current: &DisplaySet) -> bool {
        if self.displays.len() != current.len() {
            tracing::trace!(preset = %self.name, "Mismatch: number of displays");
            return false;
        }

        let ours: BTreeSet<String> = self.displays.iter().map(|d| d.to_lowercase()).collect();
        for id in current.iter() {
            if !ours.contains(&id.to_lowercase()) {
                tracing::trace!(
                    preset = %self.name,
                    display = %id,
                    "Mismatch: display not in preset"
                );
                return false;
            }
        }

        true
    }

    /// Whether two presets name the same display set (ignoring case and
    /// order). Such a pair could both match one physical configuration.
    fn collides_with(&self, other: &Preset) -> bool {
        if self.displays.len() != other.displays.len() {
            return false;
        }
        let ours: BTreeSet<String> = self.displays.iter().map(|d| d.to_lowercase()).collect();
        other
            .displays
            .iter()
            .all(|d| ours.contains(&d.to_lowercase()))
    }

    /// Identity for change detection: displays as an unordered set, so a
    /// file rewrite that only reorders entries compares equal.
    fn identity(&self) -> (&str, &str, &str, BTreeSet<&str>) {
        (
            &self.name,
            &self.profile_name,
            &self.scene_collection_name,
            self.displays.iter().map(String::as_str).collect(),
        )
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name='{}', displays=[{}], profile='{}', scene_collection='{}'",
            self.name,
            self.displays.join(", "),
            self.profile_name,
            self.scene_collection_name
        )
    }
}

/// The validated preset collection.
///
/// Iteration order is config-file order, used only for deterministic error
/// reporting — matching is order-independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetTable {
    presets: Vec<Preset>,
}

impl PresetTable {
    /// Build a table, rejecting it wholesale if any two presets collide.
    pub fn new(presets: Vec<Preset>) -> WatchResult<Self> {
        Self::validate(&presets)?;
        Ok(Self { presets })
    }

    /// All presets matching the current display set.
    ///
    /// Callers must treat zero matches as "no applicable preset" and more
    /// than one as "ambiguous configuration" — only a unique match may
    /// trigger an action.
    pub fn matching(&self, current: &DisplaySet) -> Vec<&Preset> {
        tracing::debug!(displays = %current, "Matching presets");
        self.presets.iter().filter(|p| p.matches(current)).collect()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    fn validate(presets: &[Preset]) -> WatchResult<()> {
        let mut collisions = Vec::new();
        for (i, first) in presets.iter().enumerate() {
            for second in &presets[i + 1..] {
                if first.collides_with(second) {
                    collisions.push(format!("\"{}\" and \"{}\"", first.name, second.name));
                }
            }
        }

        if collisions.is_empty() {
            Ok(())
        } else {
            Err(WatchError::validation(format!(
                "presets with identical display sets: {}",
                collisions.join(", ")
            )))
        }
    }

    /// Unordered structural equality, used for reload change detection.
    pub(crate) fn same_presets(&self, other: &PresetTable) -> bool {
        if self.presets.len() != other.presets.len() {
            return false;
        }
        let mut ours: Vec<_> = self.presets.iter().map(Preset::identity).collect();
        let mut theirs: Vec<_> = other.presets.iter().map(Preset::identity).collect();
        ours.sort();
        theirs.sort();
        ours == theirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn preset(name: &str, displays: &[&str]) -> Preset {
        Preset {
            name: name.to_string(),
            displays: displays.iter().map(|s| s.to_string()).collect(),
            profile_name: format!("{name}Profile"),
            scene_collection_name: format!("{name}Scenes"),
        }
    }

    fn set(ids: &[&str]) -> DisplaySet {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn home_away_table() -> PresetTable {
        PresetTable::new(vec![
            preset("Home", &["eDP-1", "HDMI-1"]),
            preset("Away", &["eDP-1"]),
        ])
        .unwrap()
    }

    #[test]
    fn matches_ignoring_case_and_order() {
        let table = home_away_table();
        let matches = table.matching(&set(&["hdmi-1", "edp-1"]));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Home");
    }

    #[test]
    fn matches_single_display_preset() {
        let table = home_away_table();
        let matches = table.matching(&set(&["eDP-1"]));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Away");
    }

    #[test]
    fn superset_never_matches() {
        let table = home_away_table();
        assert!(table.matching(&set(&["eDP-1", "HDMI-1", "DP-1"])).is_empty());
    }

    #[test]
    fn partial_overlap_never_matches() {
        let table = home_away_table();
        assert!(table.matching(&set(&["HDMI-1"])).is_empty());
        assert!(table.matching(&set(&["eDP-1", "DP-1"])).is_empty());
    }

    #[test]
    fn empty_set_matches_nothing() {
        let table = home_away_table();
        assert!(table.matching(&DisplaySet::new()).is_empty());
    }

    #[test]
    fn validation_rejects_case_insensitive_collisions() {
        let err = PresetTable::new(vec![
            preset("Desk", &["HDMI-1", "DP-2"]),
            preset("Dock", &["dp-2", "hdmi-1"]),
        ])
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("\"Desk\" and \"Dock\""), "got: {message}");
    }

    #[test]
    fn validation_accepts_distinct_sets() {
        assert!(PresetTable::new(vec![
            preset("A", &["eDP-1"]),
            preset("B", &["eDP-1", "HDMI-1"]),
            preset("C", &["DP-1"]),
        ])
        .is_ok());
    }

    #[test]
    fn same_presets_ignores_order() {
        let a = home_away_table();
        let b = PresetTable::new(vec![
            preset("Away", &["eDP-1"]),
            preset("Home", &["HDMI-1", "eDP-1"]),
        ])
        .unwrap();

        // Table reordering compares equal; within a preset the displays are
        // a set as well.
        assert!(a.same_presets(&b));
    }

    #[test]
    fn same_presets_detects_target_change() {
        let a = home_away_table();
        let mut changed = vec![preset("Home", &["eDP-1", "HDMI-1"]), preset("Away", &["eDP-1"])];
        changed[1].profile_name = "OtherProfile".to_string();
        let b = PresetTable::new(changed).unwrap();

        assert!(!a.same_presets(&b));
    }

    fn flip_case(s: &str, mask: u32) -> String {
        s.chars()
            .enumerate()
            .map(|(i, c)| {
                if mask >> (i % 32) & 1 == 1 {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    }

    proptest! {
        #[test]
        fn matching_is_case_and_order_insensitive(
            masks in proptest::collection::vec(any::<u32>(), 3),
            rotation in 0usize..3,
        ) {
            let names = ["eDP-1", "HDMI-1", "DP-3"];
            let target = preset("Desk", &names);

            let mut ids: Vec<String> = names
                .iter()
                .zip(&masks)
                .map(|(name, mask)| flip_case(name, *mask))
                .collect();
            ids.rotate_left(rotation);

            let current: DisplaySet = ids.into_iter().collect();
            prop_assert!(target.matches(&current));
        }

        #[test]
        fn dropping_a_display_never_matches(
            mask in any::<u32>(),
            dropped in 0usize..3,
        ) {
            let names = ["eDP-1", "HDMI-1", "DP-3"];
            let target = preset("Desk", &names);

            let current: DisplaySet = names
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != dropped)
                .map(|(_, name)| flip_case(name, mask))
                .collect();
            prop_assert!(!target.matches(&current));
        }
    }
}
