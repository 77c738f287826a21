//! Concrete resource definitions.
//!
//! Each submodule pairs a zero-sized marker type implementing
//! [`ApiResource`](crate::endpoint::ApiResource) with typed attribute and
//! filter structs. Attribute fields are all optional and skipped when
//! unset, so the same struct serves create payloads, partial patches, and
//! responses with server-omitted fields.

pub mod contacts;
pub mod invoices;
pub mod payments;
pub mod products;

pub use contacts::{Contact, ContactAttributes, ContactFilter};
pub use invoices::{Invoice, InvoiceAttributes, InvoiceFilter, InvoiceState};
pub use payments::{Payment, PaymentAttributes, PaymentFilter};
pub use products::{Product, ProductAttributes, ProductFilter};
