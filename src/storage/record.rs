//! Record kinds and their line encoding
//!
//! Every record is one line of `|`-joined text fields, identifier first:
//!
//! ```text
//! fornecedores.txt:  id|nome|cnpj|telefone|email
//! ordens.txt:        id|fornecedor_id|valor|data|status|descricao
//! ```
//!
//! Field values are written verbatim. A value containing `|` or a line
//! break shifts or splits the line on the next read; nothing escapes it.

use serde::{Deserialize, Serialize};

/// Field separator inside a record line
pub const DELIMITER: char = '|';

/// Status given to purchase orders created without one
pub const DEFAULT_ORDER_STATUS: &str = "Pendente";

/// The two record kinds kept by this service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Supplier,
    PurchaseOrder,
}

impl RecordKind {
    /// Name of the store file under the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            RecordKind::Supplier => "fornecedores.txt",
            RecordKind::PurchaseOrder => "ordens.txt",
        }
    }

    /// Minimum number of fields (identifier included) of a well-formed line
    pub fn min_fields(&self) -> usize {
        match self {
            RecordKind::Supplier => 5,
            RecordKind::PurchaseOrder => 6,
        }
    }

    /// Short name used in logs and the CLI
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Supplier => "fornecedores",
            RecordKind::PurchaseOrder => "ordens",
        }
    }
}

/// A record type persisted by a [`RecordStore`](super::RecordStore).
pub trait Record: Sized + Send + 'static {
    /// Kind this type is stored as
    const KIND: RecordKind;

    /// Field values of a record that has not been assigned an id yet
    type Draft: Send + 'static;

    /// Builds a record from the fields of a well-formed line.
    ///
    /// `fields` always holds at least `KIND.min_fields()` entries.
    fn from_fields(fields: &[&str]) -> Self;

    /// Field values of a draft, in line order, without the identifier.
    fn draft_fields(draft: &Self::Draft) -> Vec<String>;
}

/// Splits a line into fields, or `None` when it is not well-formed for `kind`.
///
/// Only a line terminator is stripped; whitespace inside fields is part of
/// the value.
pub fn split_line(line: &str, kind: RecordKind) -> Option<Vec<&str>> {
    if line.trim().is_empty() {
        return None;
    }
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() < kind.min_fields() {
        return None;
    }
    Some(fields)
}

/// Encodes an identifier and its field values as one terminated line.
pub fn encode_line(id: u64, fields: &[String]) -> String {
    let mut line = id.to_string();
    for field in fields {
        line.push(DELIMITER);
        line.push_str(field);
    }
    line.push('\n');
    line
}

/// Parses a stored order value; blank or unparseable text is 0.
pub fn parse_value(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Formats an order value in its shortest decimal form.
pub fn format_value(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        "0".to_string()
    }
}

// ==================
// Suppliers
// ==================

/// A stored supplier ("fornecedor")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    /// Identifier exactly as stored
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cnpj")]
    pub tax_id: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub email: String,
}

/// Field values for a new supplier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSupplier {
    pub name: String,
    pub tax_id: String,
    pub phone: String,
    pub email: String,
}

impl Record for Supplier {
    const KIND: RecordKind = RecordKind::Supplier;
    type Draft = NewSupplier;

    fn from_fields(fields: &[&str]) -> Self {
        Self {
            id: fields[0].to_string(),
            name: fields[1].to_string(),
            tax_id: fields[2].to_string(),
            phone: fields[3].to_string(),
            email: fields[4].to_string(),
        }
    }

    fn draft_fields(draft: &NewSupplier) -> Vec<String> {
        vec![
            draft.name.clone(),
            draft.tax_id.clone(),
            draft.phone.clone(),
            draft.email.clone(),
        ]
    }
}

// ==================
// Purchase orders
// ==================

/// A stored purchase order ("ordem de compra")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Identifier exactly as stored
    pub id: String,
    /// Supplier reference, not checked against the supplier store
    #[serde(rename = "fornecedor_id")]
    pub supplier_id: String,
    #[serde(rename = "valor")]
    pub value: f64,
    #[serde(rename = "data")]
    pub date: String,
    pub status: String,
    #[serde(rename = "descricao")]
    pub description: String,
}

/// Field values for a new purchase order
#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchaseOrder {
    pub supplier_id: String,
    pub value: f64,
    pub date: String,
    pub status: String,
    pub description: String,
}

impl Default for NewPurchaseOrder {
    fn default() -> Self {
        Self {
            supplier_id: String::new(),
            value: 0.0,
            date: String::new(),
            status: DEFAULT_ORDER_STATUS.to_string(),
            description: String::new(),
        }
    }
}

impl Record for PurchaseOrder {
    const KIND: RecordKind = RecordKind::PurchaseOrder;
    type Draft = NewPurchaseOrder;

    fn from_fields(fields: &[&str]) -> Self {
        Self {
            id: fields[0].to_string(),
            supplier_id: fields[1].to_string(),
            value: parse_value(fields[2]),
            date: fields[3].to_string(),
            status: fields[4].to_string(),
            description: fields[5].to_string(),
        }
    }

    fn draft_fields(draft: &NewPurchaseOrder) -> Vec<String> {
        vec![
            draft.supplier_id.clone(),
            format_value(draft.value),
            draft.date.clone(),
            draft.status.clone(),
            draft.description.clone(),
        ]
    }
}
