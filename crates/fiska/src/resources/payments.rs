//! Payments registered against invoices.
//!
//! Payments are created through the invoice endpoint's `create_payment`
//! (the server only accepts them nested under an invoice), but they are
//! listed and fetched through their own collection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::endpoint::ApiResource;
use crate::jsonapi::{Relationship, Relationships};
use crate::types::Money;

/// Marker type selecting the payments endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Payment;

impl ApiResource for Payment {
    const KIND: &'static str = "payments";
    const PATH: &'static str = "payments";
    type Attributes = PaymentAttributes;
    type Filter = PaymentFilter;
}

impl Payment {
    /// The `invoice` to-one relationship.
    pub fn invoice(invoice_id: impl Into<String>) -> Relationships {
        let mut relationships = Relationships::new();
        relationships.insert(
            "invoice".to_string(),
            Relationship::to_one("invoices", invoice_id),
        );
        relationships
    }
}

/// Payment attributes. Unset fields are omitted from request bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Server-side filter keys for listing payments.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PaymentFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    /// Inclusive lower bound on `paid_on`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_after: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_body_only_set_keys() {
        let attrs = PaymentAttributes {
            amount: Some(Money::new("50.00")),
            paid_on: NaiveDate::from_ymd_opt(2026, 8, 15),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&attrs).unwrap(),
            json!({"amount": "50.00", "paid_on": "2026-08-15"})
        );
    }
}
