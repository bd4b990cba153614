//! Domain models for option lists, boolean tables, and mapped rows.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single user supplied option name. Uniqueness is not enforced.
pub type OptionName = String;

/// Option names in order of first appearance in the raw text.
pub type OptionList = Vec<OptionName>;

/// One complete assignment of booleans, in option order.
pub type BooleanRow = Vec<bool>;

/// Every assignment for a given option count, in binary counting order.
pub type BooleanTable = Vec<BooleanRow>;

/// Option name to value mapping for one row of the table.
///
/// Keys keep first-insertion order. Inserting a name that is already present overwrites its
/// value in place, so duplicate option names collapse onto a single key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedRow {
    entries: Vec<(OptionName, bool)>,
}

impl MappedRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, overwriting any earlier entry with the same name.
    pub fn insert(&mut self, name: impl Into<OptionName>, value: bool) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }
}

impl<S: Into<OptionName>> FromIterator<(S, bool)> for MappedRow {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut row = MappedRow::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}

impl Serialize for MappedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// How a single synchronization step touched the navigation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryUpdate {
    /// Blank text; the location was neither read nor written.
    Skipped,
    /// The current entry was overwritten in place.
    Replaced,
    /// A new entry was pushed, then overwritten with the live text.
    Pushed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_overwrite_in_place() {
        let row: MappedRow = [("a", false), ("b", true), ("a", true)].into_iter().collect();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("a"), Some(true));
        let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn serializes_as_object_in_insertion_order() {
        let row: MappedRow = [("zeta", true), ("alpha", false)].into_iter().collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"zeta":true,"alpha":false}"#);
    }
}
