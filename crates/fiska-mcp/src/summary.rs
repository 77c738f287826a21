//! Human-readable rendering of API results.
//!
//! Tool results go back to a language model as text, so the formatting
//! favors short labeled lines over JSON dumps.

use fiska::JobOutcome;
use fiska::jsonapi::{ListMeta, Resource};
use fiska::resources::{ContactAttributes, InvoiceAttributes};

fn field<'a>(value: &'a Option<String>) -> &'a str {
    value.as_deref().unwrap_or("-")
}

/// One line per contact: id, name, email.
pub fn contact_line(contact: &Resource<ContactAttributes>) -> String {
    format!(
        "#{} {} <{}>",
        contact.id,
        field(&contact.attributes.name),
        field(&contact.attributes.email),
    )
}

/// Full card for a single contact.
pub fn contact_card(contact: &Resource<ContactAttributes>) -> String {
    let attrs = &contact.attributes;
    let mut lines = vec![format!("Contact #{}: {}", contact.id, field(&attrs.name))];
    if attrs.email.is_some() {
        lines.push(format!("  email: {}", field(&attrs.email)));
    }
    if attrs.phone.is_some() {
        lines.push(format!("  phone: {}", field(&attrs.phone)));
    }
    if attrs.vat_number.is_some() {
        lines.push(format!("  VAT: {}", field(&attrs.vat_number)));
    }
    if attrs.city.is_some() || attrs.country.is_some() {
        lines.push(format!(
            "  address: {}, {}",
            field(&attrs.city),
            field(&attrs.country)
        ));
    }
    if attrs.archived == Some(true) {
        lines.push("  archived".to_string());
    }
    lines.join("\n")
}

/// One line per invoice: id, number, state, total.
pub fn invoice_line(invoice: &Resource<InvoiceAttributes>) -> String {
    let attrs = &invoice.attributes;
    format!(
        "#{} {} [{}] {} {}",
        invoice.id,
        field(&attrs.number),
        attrs
            .state
            .map(|s| format!("{s:?}").to_lowercase())
            .unwrap_or_else(|| "-".to_string()),
        attrs
            .total_amount
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string()),
        field(&attrs.currency),
    )
}

/// Full card for a single invoice, with an optional resolved contact name.
pub fn invoice_card(invoice: &Resource<InvoiceAttributes>, contact_name: Option<&str>) -> String {
    let attrs = &invoice.attributes;
    let mut lines = vec![format!(
        "Invoice #{}: {}",
        invoice.id,
        field(&attrs.number)
    )];
    if let Some(state) = attrs.state {
        lines.push(format!("  state: {}", format!("{state:?}").to_lowercase()));
    }
    if let Some(contact_name) = contact_name {
        lines.push(format!("  contact: {contact_name}"));
    }
    if let Some(issue_date) = attrs.issue_date {
        lines.push(format!("  issued: {issue_date}"));
    }
    if let Some(due_date) = attrs.due_date {
        lines.push(format!("  due: {due_date}"));
    }
    if let Some(total) = &attrs.total_amount {
        lines.push(format!("  total: {} {}", total, field(&attrs.currency)));
    }
    if attrs.description.is_some() {
        lines.push(format!("  description: {}", field(&attrs.description)));
    }
    lines.join("\n")
}

/// Header + lines for a list result, noting how much of the collection
/// the page covers.
pub fn listing<T>(
    label: &str,
    items: &[T],
    meta: &ListMeta,
    mut line: impl FnMut(&T) -> String,
) -> String {
    if items.is_empty() {
        return format!("No {label} found.");
    }
    let mut out = format!(
        "{} of {} {label} (page {} of {}):\n",
        items.len(),
        meta.total_count,
        meta.current_page,
        meta.total_pages
    );
    for item in items {
        out.push_str(&line(item));
        out.push('\n');
    }
    out.pop();
    out
}

/// Outcome of a finished trackable job.
pub fn job_outcome(label: &str, outcome: &JobOutcome) -> String {
    if outcome.success {
        format!("{label} finished (job {}).", outcome.job.id)
    } else {
        format!(
            "{label} failed (job {}): {}",
            outcome.job.id,
            outcome.errors.join("; ")
        )
    }
}
