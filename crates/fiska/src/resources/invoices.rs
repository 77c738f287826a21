//! Invoices, the central resource of the service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::endpoint::{ApiResource, Cancellable, HasPdf, IssuesEDocument, Payable};
use crate::jsonapi::{Relationship, Relationships};
use crate::types::Money;

/// Marker type selecting the invoices endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Invoice;

impl ApiResource for Invoice {
    const KIND: &'static str = "invoices";
    const PATH: &'static str = "invoices";
    type Attributes = InvoiceAttributes;
    type Filter = InvoiceFilter;
}

impl Cancellable for Invoice {}
impl Payable for Invoice {}
impl HasPdf for Invoice {}
impl IssuesEDocument for Invoice {}

impl Invoice {
    /// The `contact` to-one relationship, for create/update calls.
    pub fn contact(contact_id: impl Into<String>) -> Relationships {
        let mut relationships = Relationships::new();
        relationships.insert(
            "contact".to_string(),
            Relationship::to_one("contacts", contact_id),
        );
        relationships
    }
}

/// Invoice lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceState {
    Draft,
    Open,
    Paid,
    Cancelled,
}

/// Invoice attributes. Unset fields are omitted from request bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceAttributes {
    /// Sequential invoice number, server-assigned after issuance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// ISO 4217 currency code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_vat: Option<Money>,
    /// Read-only; transitions happen through cancel and payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<InvoiceState>,
}

/// Server-side filter keys for listing invoices.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<InvoiceState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
    /// Inclusive lower bound on `issue_date`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_after: Option<NaiveDate>,
    /// Inclusive upper bound on `issue_date`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_before: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_wire_names() {
        let state: InvoiceState = serde_json::from_value(json!("cancelled")).unwrap();
        assert_eq!(state, InvoiceState::Cancelled);
        assert_eq!(serde_json::to_value(InvoiceState::Draft).unwrap(), json!("draft"));
    }

    #[test]
    fn test_attributes_round_trip_money_and_dates() {
        let attrs: InvoiceAttributes = serde_json::from_value(json!({
            "number": "2026-0017",
            "issue_date": "2026-08-01",
            "total_amount": "121.00",
            "total_vat": 21,
            "state": "open"
        }))
        .unwrap();
        assert_eq!(
            attrs.issue_date,
            Some(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap())
        );
        assert_eq!(attrs.total_amount.as_ref().unwrap().as_str(), "121.00");
        assert_eq!(attrs.total_vat.as_ref().unwrap().as_str(), "21");
        assert_eq!(attrs.state, Some(InvoiceState::Open));
    }

    #[test]
    fn test_contact_relationship_shape() {
        let relationships = Invoice::contact("9");
        let value = serde_json::to_value(&relationships).unwrap();
        assert_eq!(
            value,
            json!({"contact": {"data": {"type": "contacts", "id": "9"}}})
        );
    }
}
