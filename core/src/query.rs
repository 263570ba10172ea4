//! Query parameters understood by every v2 endpoint.
//!
//! These change what the server sends back, never how the response is
//! decoded.

use std::collections::BTreeMap;

/// Builder for `include`, sparse fieldsets and page parameters.
///
/// ```
/// use patreon_core::QueryOptions;
///
/// let options = QueryOptions::new()
///     .include(["tiers", "creator"])
///     .fields("campaign", ["summary", "patron_count"])
///     .page_size(20);
/// assert!(!options.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    include: Vec<String>,
    fields: BTreeMap<String, Vec<String>>,
    page_size: Option<u32>,
    page_cursor: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relationships whose targets should be sent in `included`. Repeated
    /// calls append.
    pub fn include<I, S>(mut self, relationships: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include
            .extend(relationships.into_iter().map(Into::into).filter(|s: &String| !s.is_empty()));
        self
    }

    /// Attributes to return for resources of `resource_type`.
    pub fn fields<I, S>(mut self, resource_type: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .entry(resource_type.into())
            .or_default()
            .extend(names.into_iter().map(Into::into).filter(|s: &String| !s.is_empty()));
        self
    }

    /// Maximum number of primary resources per page. Zero means the
    /// server's default.
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = (size != 0).then_some(size);
        self
    }

    /// Opaque cursor from a previous page's pagination metadata.
    pub fn page_cursor(mut self, cursor: impl Into<String>) -> Self {
        let cursor = cursor.into();
        self.page_cursor = (!cursor.is_empty()).then_some(cursor);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// Query parameters in key order.
    pub(crate) fn pairs(&self) -> BTreeMap<String, String> {
        let mut pairs = BTreeMap::new();
        if !self.include.is_empty() {
            pairs.insert("include".to_string(), self.include.join(","));
        }
        for (resource_type, names) in &self.fields {
            if !names.is_empty() {
                pairs.insert(format!("fields[{resource_type}]"), names.join(","));
            }
        }
        if let Some(size) = self.page_size {
            pairs.insert("page[count]".to_string(), size.to_string());
        }
        if let Some(cursor) = &self.page_cursor {
            pairs.insert("page[cursor]".to_string(), cursor.clone());
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_have_no_pairs() {
        assert!(QueryOptions::new().is_empty());
        assert!(QueryOptions::new().page_size(0).page_cursor("").include([""]).is_empty());
    }

    #[test]
    fn pairs_are_sorted_and_comma_joined() {
        let options = QueryOptions::new()
            .page_cursor("abc")
            .page_size(10)
            .include(["tiers"])
            .include(["creator"])
            .fields("tier", ["title"])
            .fields("campaign", ["summary", "vanity"]);
        let pairs: Vec<_> = options.pairs().into_iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("fields[campaign]".to_string(), "summary,vanity".to_string()),
                ("fields[tier]".to_string(), "title".to_string()),
                ("include".to_string(), "tiers,creator".to_string()),
                ("page[count]".to_string(), "10".to_string()),
                ("page[cursor]".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn fields_for_same_type_accumulate() {
        let options = QueryOptions::new().fields("user", ["full_name"]).fields("user", ["email"]);
        assert_eq!(options.pairs()["fields[user]"], "full_name,email");
    }
}
