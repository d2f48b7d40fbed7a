//! Canonical substring search over records

use crate::record::Record;

/// Fields searched when no rule is configured
pub const DEFAULT_SEARCH_FIELDS: [&str; 3] = ["user", "title", "description"];

/// Case-insensitive substring match over a fixed set of record fields.
///
/// Both the term and the field values are lower-cased. An empty term
/// matches every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRule {
    fields: Vec<String>,
}

impl SearchRule {
    /// Rule over the given field names
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Searched field names
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether `record` matches `term`
    pub fn matches(&self, record: &Record, term: &str) -> bool {
        let term = term.to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.fields.iter().any(|field| {
            record
                .get(field)
                .map(|value| value.to_lowercase().contains(&term))
                .unwrap_or(false)
        })
    }

    /// Filter `records`, keeping their order
    pub fn filter<'a, I>(&self, records: I, term: &str) -> Vec<Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records
            .into_iter()
            .filter(|r| self.matches(r, term))
            .cloned()
            .collect()
    }
}

impl Default for SearchRule {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_FIELDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Payload;
    use proptest::prelude::*;

    fn record(user: &str, title: &str, description: &str) -> Record {
        Record::new(
            "id",
            Payload::from([
                ("user".into(), user.into()),
                ("title".into(), title.into()),
                ("description".into(), description.into()),
                ("type".into(), "holiday".into()),
            ]),
        )
    }

    #[test]
    fn test_case_insensitive_both_sides() {
        let rule = SearchRule::default();
        let r = record("Alice", "Summer Trip", "beach");
        assert!(rule.matches(&r, "alice"));
        assert!(rule.matches(&r, "TRIP"));
        assert!(rule.matches(&r, "Each"));
        assert!(!rule.matches(&r, "holiday"));
        assert!(rule.matches(&r, ""));
    }

    #[test]
    fn test_filter_keeps_order() {
        let rule = SearchRule::default();
        let records = vec![
            record("a", "one", ""),
            record("b", "two", ""),
            record("c", "ones", ""),
        ];
        let hits = rule.filter(&records, "one");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].get("user"), Some("a"));
        assert_eq!(hits[1].get("user"), Some("c"));
    }

    proptest! {
        #[test]
        fn prop_match_iff_substring_of_some_field(
            user in "[a-zA-Z ]{0,8}",
            title in "[a-zA-Z ]{0,8}",
            description in "[a-zA-Z ]{0,8}",
            term in "[a-zA-Z]{0,3}",
        ) {
            let r = record(&user, &title, &description);
            let needle = term.to_lowercase();
            let expected = [&user, &title, &description]
                .iter()
                .any(|v| v.to_lowercase().contains(&needle));
            prop_assert_eq!(SearchRule::default().matches(&r, &term), expected);
        }
    }
}
