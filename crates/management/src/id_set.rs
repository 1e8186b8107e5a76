//! Ordered, duplicate-free identifier lists used for content AIDs and the
//! user blacklist.

use serde::{Deserialize, Deserializer, Serialize};

/// A set of string identifiers that keeps insertion order for display.
///
/// Every operation is total: bad input (blank lines, repeats) is skipped,
/// never reported as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IdentifierSet {
    ids: Vec<String>,
}

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single identifier. Returns `true` if it was appended.
    pub fn add_one(&mut self, id: &str) -> bool {
        let id = id.trim();
        if id.is_empty() || self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Add one identifier per line of `text`. Blank lines and identifiers
    /// already present (including repeats within `text`) are skipped.
    /// Returns how many were appended.
    pub fn add_bulk(&mut self, text: &str) -> usize {
        text.split('\n').filter(|line| self.add_one(line)).count()
    }

    /// Remove an exact match. Returns `true` if something was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = IdentifierSet::new();
        for id in iter {
            set.add_one(id.as_ref());
        }
        set
    }
}

// Incoming lists are normalised the same way the editor would.
impl<'de> Deserialize<'de> for IdentifierSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = Vec::<String>::deserialize(deserializer)?;
        Ok(ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(set: &IdentifierSet) -> Vec<&str> {
        set.iter().collect()
    }

    #[test]
    fn test_add_one_trims_and_is_idempotent() {
        let mut set = IdentifierSet::new();
        assert!(set.add_one("  AID001 "));
        assert!(!set.add_one("AID001"));
        assert!(!set.add_one("   "));
        assert!(!set.add_one(""));
        assert_eq!(ids(&set), vec!["AID001"]);
    }

    #[test]
    fn test_add_bulk_dedups_against_set_and_batch() {
        let mut set = IdentifierSet::new();
        set.add_one("A");

        let added = set.add_bulk("A\nB\nB\nC");
        assert_eq!(added, 2);
        assert_eq!(ids(&set), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_add_bulk_skips_blank_lines_and_crlf() {
        let mut set = IdentifierSet::new();
        let added = set.add_bulk("AID010\r\n\r\n  \nAID011\n");
        assert_eq!(added, 2);
        assert_eq!(ids(&set), vec!["AID010", "AID011"]);
    }

    #[test]
    fn test_remove_then_add_restores_membership() {
        let mut set: IdentifierSet = ["X", "Y", "Z"].into_iter().collect();
        assert!(set.remove("Y"));
        assert!(!set.remove("Y"));
        assert!(!set.contains("Y"));

        set.add_one("Y");
        assert_eq!(ids(&set), vec!["X", "Z", "Y"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_remove_is_exact_match() {
        let mut set: IdentifierSet = ["AID001"].into_iter().collect();
        assert!(!set.remove(" AID001"));
        assert!(!set.remove("aid001"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_deserialize_deduplicates() {
        let set: IdentifierSet = serde_json::from_str(r#"["A", "B", "A", " ", "C"]"#).unwrap();
        assert_eq!(ids(&set), vec!["A", "B", "C"]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["A","B","C"]"#);
    }
}
