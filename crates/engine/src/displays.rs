//! Display set tracking.

use std::collections::BTreeSet;
use std::fmt;

/// A set of display identifiers at a point in time.
///
/// Membership is case-sensitive; preset matching lower-cases both sides, so
/// `eDP-1` and `edp-1` are distinct members here but equivalent for
/// matching purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplaySet(BTreeSet<String>);

impl DisplaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Returns whether the identifier was newly inserted.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    /// Returns whether the identifier was present.
    pub fn remove(&mut self, id: &str) -> bool {
        self.0.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for DisplaySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<String>> for DisplaySet {
    fn from(ids: Vec<String>) -> Self {
        ids.into_iter().collect()
    }
}

impl fmt::Display for DisplaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}")?;
        }
        write!(f, "]")
    }
}

/// Owns the last-known display set.
///
/// Adapters submit whole replacement sets or add/remove deltas; matching
/// consumers take snapshots. A mutation does not imply a debounce decision
/// by itself — the engine restarts its timer alongside every mutation
/// event, including duplicates.
#[derive(Debug, Default)]
pub struct DisplaySetTracker {
    current: DisplaySet,
}

impl DisplaySetTracker {
    pub fn new(initial: DisplaySet) -> Self {
        Self { current: initial }
    }

    /// Replace the set with an authoritative full enumeration.
    /// Returns whether the set actually changed.
    pub fn replace(&mut self, set: DisplaySet) -> bool {
        if self.current == set {
            return false;
        }
        self.current = set;
        true
    }

    /// Note a single display attach. A duplicate report returns false.
    pub fn note_added(&mut self, id: impl Into<String>) -> bool {
        self.current.insert(id)
    }

    /// Note a single display detach. A report for an unknown display
    /// returns false.
    pub fn note_removed(&mut self, id: &str) -> bool {
        self.current.remove(id)
    }

    /// Snapshot of the current set.
    pub fn current(&self) -> DisplaySet {
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> DisplaySet {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn adds_and_removes_are_idempotent() {
        let mut tracker = DisplaySetTracker::default();

        assert!(tracker.note_added("eDP-1"));
        assert!(!tracker.note_added("eDP-1"));
        assert_eq!(tracker.current(), set(&["eDP-1"]));

        assert!(tracker.note_removed("eDP-1"));
        assert!(!tracker.note_removed("eDP-1"));
        assert!(tracker.current().is_empty());
    }

    #[test]
    fn replace_detects_change() {
        let mut tracker = DisplaySetTracker::new(set(&["eDP-1"]));

        assert!(!tracker.replace(set(&["eDP-1"])));
        assert!(tracker.replace(set(&["eDP-1", "HDMI-1"])));
        assert_eq!(tracker.current(), set(&["HDMI-1", "eDP-1"]));
    }

    #[test]
    fn current_is_a_snapshot() {
        let mut tracker = DisplaySetTracker::new(set(&["eDP-1"]));
        let snapshot = tracker.current();

        tracker.note_added("HDMI-1");
        assert_eq!(snapshot, set(&["eDP-1"]));
        assert_eq!(tracker.current().len(), 2);
    }

    #[test]
    fn display_set_formats_sorted() {
        let displays = set(&["eDP-1", "DP-3", "HDMI-1"]);
        assert_eq!(displays.to_string(), "[DP-3, HDMI-1, eDP-1]");
    }
}
