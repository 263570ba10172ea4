//! JSON:API wire shapes.
//!
//! Attributes stay an opaque JSON map here; they are decoded into a typed
//! schema only once the resource's `type` tag has been inspected.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

/// A `(type, id)` pair addressing one resource within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// A primary or included resource as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: Relationships,
}

impl RawResource {
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.kind.clone(), self.id.clone())
    }
}

/// The `relationships` block of a resource, keyed by relationship name.
///
/// A name missing from the map means the server did not describe that
/// relationship at all, which is different from describing it as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Relationships(HashMap<String, Relationship>);

impl Relationships {
    pub fn get(&self, name: &str) -> Option<&Relationship> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

impl FromIterator<(String, Relationship)> for Relationships {
    fn from_iter<I: IntoIterator<Item = (String, Relationship)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One relationship object. `data` is `None` for `"data": null` and when
/// the server only sent `links`/`meta`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<Linkage>,
}

/// Resource linkage: a single identifier or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

/// A compound document. `D` is `RawResource` for single-resource endpoints
/// and `Vec<RawResource>` for list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Document<D> {
    pub data: D,
    #[serde(default)]
    pub included: Vec<RawResource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relationships(json: &str) -> Relationships {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn null_data_and_empty_list_are_distinct() {
        let rels = relationships(r#"{"creator":{"data":null},"tiers":{"data":[]}}"#);
        assert_eq!(rels.get("creator").unwrap().data, None);
        assert_eq!(rels.get("tiers").unwrap().data, Some(Linkage::Many(Vec::new())));
        assert!(!rels.contains("goals"));
    }

    #[test]
    fn links_only_relationship_has_no_data() {
        let rels = relationships(r#"{"campaign":{"links":{"related":"https://example.com"}}}"#);
        assert!(rels.contains("campaign"));
        assert_eq!(rels.get("campaign").unwrap().data, None);
    }

    #[test]
    fn to_one_linkage_parses_identifier() {
        let rels = relationships(r#"{"user":{"data":{"type":"user","id":"9"}}}"#);
        assert_eq!(
            rels.get("user").unwrap().data,
            Some(Linkage::One(ResourceIdentifier::new("user", "9")))
        );
    }

    #[test]
    fn raw_resource_defaults_missing_blocks() {
        let raw: RawResource = serde_json::from_str(r#"{"type":"tier","id":"3"}"#).unwrap();
        assert!(raw.attributes.is_empty());
        assert!(!raw.relationships.contains("campaign"));
        assert_eq!(raw.identifier(), ResourceIdentifier::new("tier", "3"));
    }

    #[test]
    fn document_without_included_defaults_to_empty() {
        let doc: Document<Vec<RawResource>> = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(doc.data.is_empty());
        assert!(doc.included.is_empty());
    }
}
