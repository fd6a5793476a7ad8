//! Metadata search field definitions and their option values.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A catalogue search field backed by a CSW queryable property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    /// Form parameter name.
    pub name: String,
    /// Catalogue property queried with `GetDomain`.
    pub property: String,
    /// Whether the parameter accepts a comma separated list.
    #[serde(default)]
    pub multi: bool,
    /// Values never offered as options. Compared case-insensitively.
    #[serde(default)]
    pub blacklist: Vec<String>,
    /// Replacement for spaces in option values, if any.
    #[serde(default)]
    pub space_char: Option<String>,
}

impl MetadataField {
    pub fn new(name: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property: property.into(),
            multi: false,
            blacklist: Vec::new(),
            space_char: None,
        }
    }

    pub fn with_multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    pub fn with_blacklist<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_space_char(mut self, space_char: impl Into<String>) -> Self {
        self.space_char = Some(space_char.into());
        self
    }

    pub fn is_blacklisted(&self, value: &str) -> bool {
        self.blacklist
            .iter()
            .any(|blocked| blocked.eq_ignore_ascii_case(value))
    }
}

/// One legal value of a field.
///
/// Identity and ordering use `value` only, so a set of items holds each
/// value once regardless of its display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectItem {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SelectItem {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name, falling back to the raw value.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.value)
    }
}

impl PartialEq for SelectItem {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for SelectItem {}

impl Hash for SelectItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for SelectItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SelectItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_blacklist_ignores_case() {
        let field = MetadataField::new("organisation", "OrganisationName")
            .with_blacklist(["Unknown"]);
        assert!(field.is_blacklisted("unknown"));
        assert!(field.is_blacklisted("UNKNOWN"));
        assert!(!field.is_blacklisted("Known"));
    }

    #[test]
    fn test_select_items_dedupe_by_value() {
        let items: BTreeSet<SelectItem> = [
            SelectItem::new("b"),
            SelectItem::new("a").with_name("First"),
            SelectItem::new("a"),
        ]
        .into_iter()
        .collect();

        let values: Vec<_> = items.iter().map(|i| i.value.as_str()).collect();
        assert_eq!(values, vec!["a", "b"]);
        // first insert wins
        assert_eq!(items.iter().next().unwrap().display_name(), "First");
    }

    #[test]
    fn test_field_from_yaml_defaults() {
        let field: MetadataField =
            serde_yaml::from_str("name: keyword\nproperty: Subject\n").unwrap();
        assert_eq!(field, MetadataField::new("keyword", "Subject"));
    }
}
