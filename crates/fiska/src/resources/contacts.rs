//! Contacts: the customers and suppliers invoices are addressed to.

use serde::{Deserialize, Serialize};

use crate::endpoint::{ApiResource, Archivable};

/// Marker type selecting the contacts endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Contact;

impl ApiResource for Contact {
    const KIND: &'static str = "contacts";
    const PATH: &'static str = "contacts";
    type Attributes = ContactAttributes;
    type Filter = ContactFilter;
}

impl Archivable for Contact {}

/// Contact attributes. Unset fields are omitted from request bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Set by archive/unarchive; read-only on create and update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

/// Server-side filter keys for listing contacts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_attributes_serialize_only_set_keys() {
        let attrs = ContactAttributes {
            email: Some("billing@acme.example".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&attrs).unwrap(),
            json!({"email": "billing@acme.example"})
        );
    }

    #[test]
    fn test_deserializes_with_missing_fields() {
        let attrs: ContactAttributes =
            serde_json::from_value(json!({"name": "Acme GmbH"})).unwrap();
        assert_eq!(attrs.name.as_deref(), Some("Acme GmbH"));
        assert_eq!(attrs.email, None);
    }
}
