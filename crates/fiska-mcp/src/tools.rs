//! Tool definitions and dispatch over the accounting client.
//!
//! Every tool resolves to one of two surfaces: a text summary on success
//! (including "nothing found"), or an `isError` text result carrying the
//! failure (API error, unknown tool, bad arguments). JSON-RPC errors are
//! reserved for protocol faults and never produced here.

use fiska::resources::{ContactAttributes, ContactFilter, InvoiceFilter, InvoiceState};
use fiska::{Client, PollOptions, Query};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::server::{ToolCallResult, ToolDefinition};
use crate::summary;

/// The tool surface, bound to one authenticated client.
pub struct Toolbox {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ListContactsArgs {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    archived: Option<bool>,
    #[serde(default)]
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GetArgs {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CreateContactArgs {
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    vat_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListInvoicesArgs {
    #[serde(default)]
    state: Option<InvoiceState>,
    #[serde(default)]
    contact_id: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CountInvoicesArgs {
    #[serde(default)]
    state: Option<InvoiceState>,
    #[serde(default)]
    contact_id: Option<String>,
}

const DEFAULT_LIMIT: u32 = 25;

impl Toolbox {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Dispatch a tool call by name. Unknown names and argument shape
    /// errors are reported to the caller, never panicked on.
    pub async fn call(&self, name: &str, arguments: &Value) -> ToolCallResult {
        let result = match name {
            "list_contacts" => self.list_contacts(arguments).await,
            "get_contact" => self.get_contact(arguments).await,
            "create_contact" => self.create_contact(arguments).await,
            "list_invoices" => self.list_invoices(arguments).await,
            "get_invoice" => self.get_invoice(arguments).await,
            "count_invoices" => self.count_invoices(arguments).await,
            "request_invoice_pdf" => self.request_invoice_pdf(arguments).await,
            _ => return ToolCallResult::error(format!("Unknown tool: {name}")),
        };

        match result {
            Ok(text) => ToolCallResult::text(text),
            Err(error) => ToolCallResult::error(error),
        }
    }

    async fn list_contacts(&self, arguments: &Value) -> Result<String, String> {
        let args: ListContactsArgs = parse_args(arguments)?;
        let filter = ContactFilter {
            name: args.name,
            email: args.email,
            archived: args.archived,
            ..Default::default()
        };
        let query = Query::new()
            .filter(filter)
            .page(1, args.limit.unwrap_or(DEFAULT_LIMIT));
        let page = self
            .client
            .contacts()
            .list(&query)
            .await
            .map_err(api_error)?;
        Ok(summary::listing(
            "contacts",
            &page.data,
            &page.meta,
            summary::contact_line,
        ))
    }

    async fn get_contact(&self, arguments: &Value) -> Result<String, String> {
        let args: GetArgs = parse_args(arguments)?;
        let document = self
            .client
            .contacts()
            .get(&args.id, &[])
            .await
            .map_err(api_error)?;
        Ok(summary::contact_card(&document.data))
    }

    async fn create_contact(&self, arguments: &Value) -> Result<String, String> {
        let args: CreateContactArgs = parse_args(arguments)?;
        let attributes = ContactAttributes {
            name: Some(args.name),
            email: args.email,
            phone: args.phone,
            vat_number: args.vat_number,
            ..Default::default()
        };
        let created = self
            .client
            .contacts()
            .create(&attributes, None)
            .await
            .map_err(api_error)?;
        Ok(format!(
            "Created contact #{}.\n{}",
            created.data.id,
            summary::contact_card(&created.data)
        ))
    }

    async fn list_invoices(&self, arguments: &Value) -> Result<String, String> {
        let args: ListInvoicesArgs = parse_args(arguments)?;
        let filter = InvoiceFilter {
            state: args.state,
            contact_id: args.contact_id,
            ..Default::default()
        };
        let query = Query::new()
            .filter(filter)
            .page(1, args.limit.unwrap_or(DEFAULT_LIMIT));
        let page = self
            .client
            .invoices()
            .list(&query)
            .await
            .map_err(api_error)?;
        Ok(summary::listing(
            "invoices",
            &page.data,
            &page.meta,
            summary::invoice_line,
        ))
    }

    async fn get_invoice(&self, arguments: &Value) -> Result<String, String> {
        let args: GetArgs = parse_args(arguments)?;
        let document = self
            .client
            .invoices()
            .get(&args.id, &["contact"])
            .await
            .map_err(api_error)?;
        let invoice = document.denormalize();
        let contact_name = invoice
            .related("contact")
            .and_then(|related| related.resource())
            .and_then(|resource| resource.attributes.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(summary::invoice_card(
            &invoice.resource,
            contact_name.as_deref(),
        ))
    }

    async fn count_invoices(&self, arguments: &Value) -> Result<String, String> {
        let args: CountInvoicesArgs = parse_args(arguments)?;
        let filter = InvoiceFilter {
            state: args.state,
            contact_id: args.contact_id,
            ..Default::default()
        };
        let count = self
            .client
            .invoices()
            .count(Some(filter))
            .await
            .map_err(api_error)?;
        Ok(format!("{count} matching invoices."))
    }

    async fn request_invoice_pdf(&self, arguments: &Value) -> Result<String, String> {
        let args: GetArgs = parse_args(arguments)?;
        let job = self
            .client
            .invoices()
            .request_pdf(&args.id)
            .await
            .map_err(api_error)?;
        let outcome = self
            .client
            .trackables()
            .wait_for_completion(&job.id, PollOptions::default())
            .await
            .map_err(api_error)?;
        Ok(summary::job_outcome(
            &format!("PDF generation for invoice #{}", args.id),
            &outcome,
        ))
    }

    /// Tool descriptors for `tools/list`.
    pub fn definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: "list_contacts".to_string(),
                description: Some(
                    "List contacts, optionally filtered by name, email, or archived state. \
                     Returns one line per contact with id, name, and email."
                        .to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "description": "Filter by contact name"},
                        "email": {"type": "string", "description": "Filter by email address"},
                        "archived": {"type": "boolean", "description": "Filter by archived state"},
                        "limit": {"type": "integer", "description": "Maximum results (default 25)"}
                    }
                }),
            },
            ToolDefinition {
                name: "get_contact".to_string(),
                description: Some("Fetch one contact by id.".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "id": {"type": "string", "description": "Contact id"}
                    },
                    "required": ["id"]
                }),
            },
            ToolDefinition {
                name: "create_contact".to_string(),
                description: Some(
                    "Create a contact. Name is required; email, phone, and VAT number \
                     are optional."
                        .to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "description": "Contact name"},
                        "email": {"type": "string", "description": "Email address"},
                        "phone": {"type": "string", "description": "Phone number"},
                        "vat_number": {"type": "string", "description": "VAT number"}
                    },
                    "required": ["name"]
                }),
            },
            ToolDefinition {
                name: "list_invoices".to_string(),
                description: Some(
                    "List invoices, optionally filtered by state (draft, open, paid, \
                     cancelled) or contact id. Returns one line per invoice with id, \
                     number, state, and total."
                        .to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "state": {
                            "type": "string",
                            "enum": ["draft", "open", "paid", "cancelled"],
                            "description": "Filter by invoice state"
                        },
                        "contact_id": {"type": "string", "description": "Filter by contact id"},
                        "limit": {"type": "integer", "description": "Maximum results (default 25)"}
                    }
                }),
            },
            ToolDefinition {
                name: "get_invoice".to_string(),
                description: Some(
                    "Fetch one invoice by id, including its contact.".to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "id": {"type": "string", "description": "Invoice id"}
                    },
                    "required": ["id"]
                }),
            },
            ToolDefinition {
                name: "count_invoices".to_string(),
                description: Some(
                    "Count invoices matching an optional state or contact filter, \
                     without fetching them."
                        .to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "state": {
                            "type": "string",
                            "enum": ["draft", "open", "paid", "cancelled"],
                            "description": "Filter by invoice state"
                        },
                        "contact_id": {"type": "string", "description": "Filter by contact id"}
                    }
                }),
            },
            ToolDefinition {
                name: "request_invoice_pdf".to_string(),
                description: Some(
                    "Request PDF generation for an invoice and wait for the server-side \
                     job to finish."
                        .to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "id": {"type": "string", "description": "Invoice id"}
                    },
                    "required": ["id"]
                }),
            },
        ]
    }
}

fn parse_args<'de, T: Deserialize<'de>>(arguments: &'de Value) -> Result<T, String> {
    T::deserialize(arguments).map_err(|e| format!("Invalid arguments: {e}"))
}

fn api_error(error: fiska::Error) -> String {
    format!("API error: {error}")
}
