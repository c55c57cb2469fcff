//! API response encoding
//!
//! Turns an [`Outcome`] into an HTTP response: a JSON body, the JSON
//! content type, and the CORS headers. Every outcome has a body except a
//! preflight. The status code comes from the [`StatusPolicy`]; bodies do
//! not depend on it.

use std::any::Any;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::storage::{PurchaseOrder, Supplier};

use super::errors::ApiError;
use super::summaries::{FinanceSummary, InventorySummary, ServiceStatus};

/// Error text for unknown routes
pub const NOT_FOUND_MESSAGE: &str = "Endpoint não encontrado";

/// Sent when a body cannot be serialized or a handler panicked
const FALLBACK_BODY: &[u8] = br#"{"error":"Falha interna do servidor"}"#;

/// Result of one API operation, independent of the transport
#[derive(Debug)]
pub enum Outcome {
    Suppliers(Vec<Supplier>),
    Orders(Vec<PurchaseOrder>),
    Inventory(InventorySummary),
    Finance(FinanceSummary),
    Status(ServiceStatus),
    Created { message: &'static str, id: u64 },
    Preflight,
    NotFound { path: Option<String> },
    /// A read failed; body is `{error}`
    ReadFailed(ApiError),
    /// A create failed; body is `{success: false, error}`
    WriteFailed(ApiError),
}

/// How outcomes map to HTTP status codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// Always 200; errors live only in the body
    #[default]
    Compatible,
    /// 201/204/400/404/500 as appropriate
    Conventional,
}

impl StatusPolicy {
    /// Status code for an outcome under this policy
    pub fn status_for(&self, outcome: &Outcome) -> StatusCode {
        if *self == StatusPolicy::Compatible {
            return StatusCode::OK;
        }
        match outcome {
            Outcome::Created { .. } => StatusCode::CREATED,
            Outcome::Preflight => StatusCode::NO_CONTENT,
            Outcome::NotFound { .. } => StatusCode::NOT_FOUND,
            Outcome::ReadFailed(e) | Outcome::WriteFailed(e) => e.status_code(),
            _ => StatusCode::OK,
        }
    }

    fn panic_status(&self) -> StatusCode {
        match self {
            StatusPolicy::Compatible => StatusCode::OK,
            StatusPolicy::Conventional => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct CreatedBody {
    success: bool,
    message: &'static str,
    id: u64,
}

#[derive(Serialize)]
struct FailureBody {
    success: bool,
    error: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
}

impl Outcome {
    /// Serialized JSON body, or `None` for a preflight.
    pub fn body(&self) -> Option<Vec<u8>> {
        let encoded = match self {
            Outcome::Preflight => return None,
            Outcome::Suppliers(records) => serde_json::to_vec(records),
            Outcome::Orders(records) => serde_json::to_vec(records),
            Outcome::Inventory(summary) => serde_json::to_vec(summary),
            Outcome::Finance(summary) => serde_json::to_vec(summary),
            Outcome::Status(status) => serde_json::to_vec(status),
            Outcome::Created { message, id } => serde_json::to_vec(&CreatedBody {
                success: true,
                message: *message,
                id: *id,
            }),
            Outcome::NotFound { path } => serde_json::to_vec(&ErrorBody {
                error: NOT_FOUND_MESSAGE.to_string(),
                path: path.as_deref(),
            }),
            Outcome::ReadFailed(e) => serde_json::to_vec(&ErrorBody {
                error: e.to_string(),
                path: None,
            }),
            Outcome::WriteFailed(e) => serde_json::to_vec(&FailureBody {
                success: false,
                error: e.to_string(),
            }),
        };

        Some(encoded.unwrap_or_else(|e| {
            error!(error = %e, "response serialization failed");
            FALLBACK_BODY.to_vec()
        }))
    }

    /// Encodes the outcome as a complete HTTP response.
    pub fn into_response(self, policy: StatusPolicy) -> Response {
        let status = policy.status_for(&self);
        match self.body() {
            Some(bytes) => json_response(status, bytes),
            None => {
                let mut response = Response::new(Body::empty());
                *response.status_mut() = status;
                apply_cors_headers(response.headers_mut());
                response
            }
        }
    }
}

/// Inserts the three CORS headers sent with every response.
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

/// Response for a handler that panicked.
pub fn panic_response(policy: StatusPolicy, _panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("request handler panicked");
    json_response(policy.panic_status(), FALLBACK_BODY.to_vec())
}

fn json_response(status: StatusCode, bytes: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    apply_cors_headers(headers);
    response
}
