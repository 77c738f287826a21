//! JSON:API envelope types and codec
//!
//! The Fiska API speaks JSON:API: responses wrap a primary `data` member
//! (single resource or list), related resources ride along in `included`,
//! and list responses carry pagination `meta`. This module provides the
//! envelope types, the write-body builders for create/update, and the
//! relationship-denormalization utilities.

pub use included::{IncludedIndex, Related, related, related_many};

mod included;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Minimal reference to any resource; never carries attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// JSON:API type tag, e.g. `"contacts"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Server-assigned id.
    pub id: String,
}

impl ResourceIdentifier {
    /// Create an identifier.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// A named relationship on a resource: `{"data": null | {..} | [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// The resource linkage.
    pub data: RelationshipData,
}

/// Resource linkage: to-one (possibly null) or to-many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    /// To-one linkage; `None` is an explicit null.
    One(Option<ResourceIdentifier>),
    /// To-many linkage.
    Many(Vec<ResourceIdentifier>),
}

impl Relationship {
    /// A to-one reference.
    pub fn to_one(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            data: RelationshipData::One(Some(ResourceIdentifier::new(kind, id))),
        }
    }

    /// A to-many reference list.
    pub fn to_many<I, S>(kind: &str, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            data: RelationshipData::Many(
                ids.into_iter()
                    .map(|id| ResourceIdentifier::new(kind, id))
                    .collect(),
            ),
        }
    }

    /// An explicit clear (`data: null`), distinct from omitting the
    /// relationship entirely (omission = "do not change").
    pub fn clear() -> Self {
        Self {
            data: RelationshipData::One(None),
        }
    }
}

/// Ordered relationship map used in write bodies.
pub type Relationships = BTreeMap<String, Relationship>;

/// A resource snapshot, typed over its attribute shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource<A> {
    /// Server-assigned id.
    pub id: String,
    /// JSON:API type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Server-defined attributes, keyed by snake_case names.
    #[serde(default)]
    pub attributes: A,
    /// Named relationships to other resources.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,
}

/// A resource with untyped attributes, as found in `included`.
pub type RawResource = Resource<Map<String, Value>>;

impl<A> Resource<A> {
    /// The identifier for this resource.
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.kind.clone(), self.id.clone())
    }
}

/// Pagination metadata on list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMeta {
    /// Total matching resources across all pages; authoritative for `count`.
    pub total_count: u64,
    /// 1-based page number of this response.
    pub current_page: u32,
    /// Total number of pages for the current page size.
    pub total_pages: u32,
}

/// Single-resource response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de> + Default"))]
pub struct Document<A> {
    /// The primary resource.
    pub data: Resource<A>,
    /// Side-loaded related resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<RawResource>,
}

/// List response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de> + Default"))]
pub struct ListDocument<A> {
    /// The primary resources, in server order.
    pub data: Vec<Resource<A>>,
    /// Pagination metadata.
    pub meta: ListMeta,
    /// Side-loaded related resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<RawResource>,
}

impl<A> Document<A> {
    /// Build the `"type:id"` lookup over this response's `included` set.
    ///
    /// The index is scoped to this response; build it once and resolve all
    /// relationships against it.
    pub fn included_index(&self) -> IncludedIndex {
        IncludedIndex::new(&self.included)
    }

    /// Resolve a to-one relationship on the primary resource.
    ///
    /// Convenience for one-off access; for repeated traversal prefer
    /// [`Document::denormalize`].
    pub fn related<'a>(&'a self, index: &'a IncludedIndex, name: &str) -> Option<Related<'a>> {
        related(&self.data, index, name)
    }

    /// Bind the primary resource to its prebuilt included-index so
    /// relationship traversal does not rescan `included` per access.
    pub fn denormalize(self) -> Denormalized<A> {
        let index = IncludedIndex::new(&self.included);
        Denormalized {
            resource: self.data,
            index,
        }
    }
}

impl<A> ListDocument<A> {
    /// Build the `"type:id"` lookup over this response's `included` set.
    pub fn included_index(&self) -> IncludedIndex {
        IncludedIndex::new(&self.included)
    }
}

/// A primary resource paired with its response's included-index.
#[derive(Debug, Clone)]
pub struct Denormalized<A> {
    /// The primary resource.
    pub resource: Resource<A>,
    index: IncludedIndex,
}

impl<A> Denormalized<A> {
    /// Resolve a to-one relationship: the full resource when it was
    /// included, the bare identifier otherwise, `None` when the
    /// relationship itself is null or absent.
    pub fn related(&self, name: &str) -> Option<Related<'_>> {
        related(&self.resource, &self.index, name)
    }

    /// Resolve a to-many relationship, preserving member order. Members
    /// missing from `included` degrade to identifiers, never dropped.
    pub fn related_many(&self, name: &str) -> Vec<Related<'_>> {
        related_many(&self.resource, &self.index, name)
    }

    /// The included-index this view resolves against.
    pub fn included(&self) -> &IncludedIndex {
        &self.index
    }

    /// Shorthand for the primary resource's attributes.
    pub fn attributes(&self) -> &A {
        &self.resource.attributes
    }
}

/// Build the `{"data": {...}}` envelope for a create request.
pub fn new_resource<A: Serialize>(
    kind: &str,
    attributes: &A,
    relationships: Option<&Relationships>,
) -> Result<Value> {
    let mut data = Map::new();
    data.insert("type".into(), Value::String(kind.to_string()));
    data.insert("attributes".into(), serde_json::to_value(attributes)?);
    if let Some(relationships) = relationships {
        data.insert("relationships".into(), serde_json::to_value(relationships)?);
    }
    Ok(Value::Object(Map::from_iter([(
        "data".to_string(),
        Value::Object(data),
    )])))
}

/// Build the `{"data": {...}}` envelope for an update request.
///
/// Attributes are a partial patch: keys absent from the serialized
/// attributes are left untouched server-side, not nulled.
pub fn update_resource<A: Serialize>(
    id: &str,
    kind: &str,
    attributes: Option<&A>,
    relationships: Option<&Relationships>,
) -> Result<Value> {
    let mut data = Map::new();
    data.insert("id".into(), Value::String(id.to_string()));
    data.insert("type".into(), Value::String(kind.to_string()));
    if let Some(attributes) = attributes {
        data.insert("attributes".into(), serde_json::to_value(attributes)?);
    }
    if let Some(relationships) = relationships {
        data.insert("relationships".into(), serde_json::to_value(relationships)?);
    }
    Ok(Value::Object(Map::from_iter([(
        "data".to_string(),
        Value::Object(data),
    )])))
}

/// Unwrap a single-resource envelope into its typed form.
pub fn extract_document<A>(value: Value) -> Result<Document<A>>
where
    A: DeserializeOwned + Default,
{
    expect_data(&value, "single resource")?;
    serde_json::from_value(value)
        .map_err(|e| Error::Decode(format!("single-resource envelope: {e}")))
}

/// Unwrap a list envelope (with `meta`) into its typed form.
pub fn extract_list<A>(value: Value) -> Result<ListDocument<A>>
where
    A: DeserializeOwned + Default,
{
    expect_data(&value, "resource list")?;
    if value.get("meta").is_none() {
        return Err(Error::Decode(
            "expected list envelope with 'meta', got envelope without it".into(),
        ));
    }
    serde_json::from_value(value).map_err(|e| Error::Decode(format!("list envelope: {e}")))
}

fn expect_data(value: &Value, expected: &str) -> Result<()> {
    if value.get("data").is_none() {
        return Err(Error::Decode(format!(
            "expected JSON:API {expected} envelope with 'data', got: {}",
            summarize_shape(value)
        )));
    }
    Ok(())
}

fn summarize_shape(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Null => "null".to_string(),
        other => format!("{other}"),
    }
}
