//! Relationship resolution against the `included` side-table

use std::collections::HashMap;

use super::{RawResource, Relationship, RelationshipData, Resource, ResourceIdentifier};

/// A `"type:id"`-keyed lookup over a response's `included` resources.
///
/// Built once per response and discarded afterwards; no entity here
/// persists beyond one call's lifetime.
#[derive(Debug, Clone, Default)]
pub struct IncludedIndex {
    map: HashMap<String, RawResource>,
}

impl IncludedIndex {
    /// Index the given `included` set. An absent/empty set yields an empty
    /// index for which every lookup misses.
    pub fn new(included: &[RawResource]) -> Self {
        let mut map = HashMap::with_capacity(included.len());
        for resource in included {
            map.insert(Self::key(&resource.kind, &resource.id), resource.clone());
        }
        Self { map }
    }

    fn key(kind: &str, id: &str) -> String {
        format!("{kind}:{id}")
    }

    /// Exact lookup by (type, id).
    pub fn get(&self, kind: &str, id: &str) -> Option<&RawResource> {
        self.map.get(&Self::key(kind, id))
    }

    /// Lookup by a preformatted `"type:id"` key.
    pub fn by_key(&self, key: &str) -> Option<&RawResource> {
        self.map.get(key)
    }

    /// All included resources of one type, in unspecified order.
    pub fn of_kind(&self, kind: &str) -> Vec<&RawResource> {
        self.map.values().filter(|r| r.kind == kind).collect()
    }

    /// Number of indexed resources.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when nothing was included.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn resolve<'a>(&'a self, identifier: &'a ResourceIdentifier) -> Related<'a> {
        match self.get(&identifier.kind, &identifier.id) {
            Some(resource) => Related::Resource(resource),
            None => Related::Identifier(identifier),
        }
    }
}

/// The outcome of resolving one relationship member.
///
/// A member missing from `included` degrades to its identifier; it is never
/// dropped and resolution never fails for a dangling reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Related<'a> {
    /// The full resource was present in `included`.
    Resource(&'a RawResource),
    /// Only the bare reference is available.
    Identifier(&'a ResourceIdentifier),
}

impl<'a> Related<'a> {
    /// The referenced id, resolved or not.
    pub fn id(&self) -> &str {
        match self {
            Related::Resource(resource) => &resource.id,
            Related::Identifier(identifier) => &identifier.id,
        }
    }

    /// The referenced type tag, resolved or not.
    pub fn kind(&self) -> &str {
        match self {
            Related::Resource(resource) => &resource.kind,
            Related::Identifier(identifier) => &identifier.kind,
        }
    }

    /// The full resource, when resolution succeeded.
    pub fn resource(&self) -> Option<&'a RawResource> {
        match self {
            Related::Resource(resource) => Some(resource),
            Related::Identifier(_) => None,
        }
    }
}

/// Resolve a to-one relationship.
///
/// Returns `None` when the relationship is absent, explicitly null, or has
/// a to-many shape.
pub fn related<'a, A>(
    resource: &'a Resource<A>,
    index: &'a IncludedIndex,
    name: &str,
) -> Option<Related<'a>> {
    match resource.relationships.get(name)? {
        Relationship {
            data: RelationshipData::One(Some(identifier)),
        } => Some(index.resolve(identifier)),
        _ => None,
    }
}

/// Resolve a to-many relationship, preserving original member order.
///
/// Absent or to-one relationships resolve to an empty list.
pub fn related_many<'a, A>(
    resource: &'a Resource<A>,
    index: &'a IncludedIndex,
    name: &str,
) -> Vec<Related<'a>> {
    match resource.relationships.get(name) {
        Some(Relationship {
            data: RelationshipData::Many(identifiers),
        }) => identifiers.iter().map(|i| index.resolve(i)).collect(),
        _ => Vec::new(),
    }
}
