//! API request types
//!
//! Decodes POST bodies into record drafts. Every body field is optional;
//! scalar values are accepted leniently and stored as text.

use serde_json::{Map, Value};

use crate::storage::{NewPurchaseOrder, NewSupplier, DEFAULT_ORDER_STATUS};

use super::errors::{ApiError, ApiResult};

/// Decodes a body as a UTF-8 JSON object.
///
/// An empty body is invalid JSON, same as any other parse failure.
pub fn parse_object(body: &[u8]) -> ApiResult<Map<String, Value>> {
    let text = std::str::from_utf8(body).map_err(|_| ApiError::InvalidEncoding)?;
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::NotAnObject),
    }
}

/// Parses a supplier creation body: `{nome, cnpj, telefone, email}`.
pub fn parse_new_supplier(body: &[u8]) -> ApiResult<NewSupplier> {
    let object = parse_object(body)?;
    Ok(NewSupplier {
        name: text(&object, "nome").unwrap_or_default(),
        tax_id: text(&object, "cnpj").unwrap_or_default(),
        phone: text(&object, "telefone").unwrap_or_default(),
        email: text(&object, "email").unwrap_or_default(),
    })
}

/// Parses an order creation body: `{fornecedor_id, valor, data, status, descricao}`.
pub fn parse_new_order(body: &[u8]) -> ApiResult<NewPurchaseOrder> {
    let object = parse_object(body)?;
    Ok(NewPurchaseOrder {
        supplier_id: text(&object, "fornecedor_id").unwrap_or_default(),
        value: decimal(&object, "valor"),
        date: text(&object, "data").unwrap_or_default(),
        status: text(&object, "status").unwrap_or_else(|| DEFAULT_ORDER_STATUS.to_string()),
        description: text(&object, "descricao").unwrap_or_default(),
    })
}

/// Text form of a field. Strings are taken verbatim, other values in their
/// JSON form; absent and `null` give `None`.
fn text(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Numeric form of a field; a number or numeric string, otherwise 0.
fn decimal(object: &Map<String, Value>, key: &str) -> f64 {
    let value = match object.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}
