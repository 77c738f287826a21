//! Query string construction for list endpoints
//!
//! The Fiska API uses bracket-style nested parameters: `filter[name]=Acme`,
//! `page[number]=2`, `page[size]=25`, plus a comma-joined `include` list.
//! Encoding is deterministic for identical input so requests stay cache- and
//! log-friendly, and absent (`None`/`null`) values are omitted entirely.

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::{Error, Result};

/// Pagination cursor: the only continuity state list endpoints need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    /// Requested page size.
    pub size: u32,
}

impl Page {
    /// Page size used when the caller does not specify one.
    pub const DEFAULT_SIZE: u32 = 25;

    /// Create a page cursor.
    pub fn new(number: u32, size: u32) -> Self {
        Self { number, size }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// Structured list parameters, typed over a resource's filter shape.
///
/// The filter type is resource-specific and serialized into `filter[...]`
/// keys; fields set to `None` never appear in the query string.
#[derive(Debug, Clone)]
pub struct Query<F> {
    /// Typed filter, serialized under the `filter[...]` prefix.
    pub filter: Option<F>,
    /// Pagination cursor, serialized under the `page[...]` prefix.
    pub page: Option<Page>,
    /// Relationship names to side-load, comma-joined into `include`.
    pub include: Vec<String>,
    /// Upper bound on pages fetched by iteration; never serialized.
    pub max_pages: Option<u32>,
}

impl<F> Default for Query<F> {
    fn default() -> Self {
        Self {
            filter: None,
            page: None,
            include: Vec::new(),
            max_pages: None,
        }
    }
}

impl<F> Query<F> {
    /// An empty query (no filter, server-default pagination).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the typed filter.
    pub fn filter(mut self, filter: F) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the page cursor.
    pub fn page(mut self, number: u32, size: u32) -> Self {
        self.page = Some(Page::new(number, size));
        self
    }

    /// Add a relationship to side-load.
    pub fn include(mut self, name: impl Into<String>) -> Self {
        self.include.push(name.into());
        self
    }

    /// Bound the number of pages `iterate`/`list_all` will fetch.
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }
}

impl<F: Serialize> Query<F> {
    /// Flatten into ordered `(key, value)` pairs ready for URL encoding.
    pub fn to_pairs(&self) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::new();

        if let Some(filter) = &self.filter {
            let value = serde_json::to_value(filter)?;
            match value {
                Value::Object(map) => {
                    for (key, value) in &map {
                        push_bracketed(&mut pairs, "filter", key, value)?;
                    }
                }
                Value::Null => {}
                other => {
                    return Err(Error::Decode(format!(
                        "filter must serialize to an object, got {other}"
                    )));
                }
            }
        }

        if let Some(page) = &self.page {
            pairs.push(("page[number]".to_string(), page.number.to_string()));
            pairs.push(("page[size]".to_string(), page.size.to_string()));
        }

        if !self.include.is_empty() {
            pairs.push(("include".to_string(), self.include.join(",")));
        }

        Ok(pairs)
    }

    /// Encode into a URL query string.
    pub fn encode(&self) -> Result<String> {
        Ok(encode_pairs(&self.to_pairs()?))
    }
}

/// Percent-encode ordered pairs into a query string.
pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Append `prefix[key]=value` pairs for one filter entry.
///
/// `null` values are omitted; lists are comma-joined; a nested object gains
/// one more bracket level (`filter[date][from]=...`).
fn push_bracketed(
    pairs: &mut Vec<(String, String)>,
    prefix: &str,
    key: &str,
    value: &Value,
) -> Result<()> {
    let bracketed = format!("{prefix}[{key}]");
    match value {
        Value::Null => {}
        Value::Array(items) => {
            let mut joined = Vec::with_capacity(items.len());
            for item in items {
                joined.push(scalar_to_string(item).ok_or_else(|| {
                    Error::Decode(format!("filter list '{bracketed}' must contain scalars"))
                })?);
            }
            if !joined.is_empty() {
                pairs.push((bracketed, joined.join(",")));
            }
        }
        Value::Object(map) => {
            for (inner_key, inner_value) in map {
                push_bracketed(pairs, &bracketed, inner_key, inner_value)?;
            }
        }
        scalar => {
            if let Some(rendered) = scalar_to_string(scalar) {
                pairs.push((bracketed, rendered));
            }
        }
    }
    Ok(())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
