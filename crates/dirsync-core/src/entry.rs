//! Directory entry snapshots
//!
//! A [`DirectoryEntry`] is a read-only snapshot of one directory object as
//! returned by a search. Attribute names are normalized to lowercase at
//! construction; values keep the order the server returned them in.

use std::collections::HashMap;

/// One directory object returned by a search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryEntry {
    dn: String,
    attributes: HashMap<String, Vec<String>>,
}

impl DirectoryEntry {
    /// Create an entry with the given distinguished name.
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute using builder style. The name is lowercased.
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        values: Vec<String>,
    ) -> Self {
        self.insert(name, values);
        self
    }

    /// Add a single-valued attribute using builder style.
    pub fn with_value(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_attribute(name, vec![value.into()])
    }

    /// Insert an attribute, replacing any previous values. The name is
    /// lowercased.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.attributes.insert(name.into().to_lowercase(), values);
    }

    /// The entry's distinguished name.
    pub fn dn(&self) -> &str {
        &self.dn
    }

    /// First value of an attribute, if present and non-empty.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of an attribute.
    pub fn values(&self, name: &str) -> &[String] {
        self.attributes
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check whether the attribute has at least one value.
    pub fn has(&self, name: &str) -> bool {
        !self.values(name).is_empty()
    }

    /// Number of attributes on the entry.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check whether the entry carries no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names_lowercased() {
        let entry = DirectoryEntry::new("cn=Jane Doe,dc=example,dc=com")
            .with_value("sAMAccountName", "jdoe");

        assert_eq!(entry.first("samaccountname"), Some("jdoe"));
        assert_eq!(entry.first("sAMAccountName"), Some("jdoe"));
    }

    #[test]
    fn test_first_of_missing_attribute() {
        let entry = DirectoryEntry::new("cn=Jane Doe,dc=example,dc=com");
        assert_eq!(entry.first("mail"), None);
        assert!(!entry.has("mail"));
    }

    #[test]
    fn test_first_of_empty_value_list() {
        let entry = DirectoryEntry::new("cn=x,dc=example,dc=com").with_attribute("mail", vec![]);
        assert_eq!(entry.first("mail"), None);
    }

    #[test]
    fn test_values_preserve_order() {
        let entry = DirectoryEntry::new("cn=x,dc=example,dc=com").with_attribute(
            "memberOf",
            vec![
                "cn=staff,dc=example,dc=com".to_string(),
                "cn=admins,dc=example,dc=com".to_string(),
            ],
        );

        assert_eq!(entry.values("memberof").len(), 2);
        assert_eq!(entry.values("memberof")[0], "cn=staff,dc=example,dc=com");
        assert_eq!(entry.first("memberof"), Some("cn=staff,dc=example,dc=com"));
    }

    #[test]
    fn test_insert_replaces() {
        let mut entry = DirectoryEntry::new("cn=x,dc=example,dc=com");
        entry.insert("mail", vec!["old@example.com".to_string()]);
        entry.insert("MAIL", vec!["new@example.com".to_string()]);

        assert_eq!(entry.first("mail"), Some("new@example.com"));
        assert_eq!(entry.len(), 1);
    }
}
