//! API Layer for compras
//!
//! Maps HTTP requests onto record store operations.
//!
//! # Design Principles
//!
//! - Declarative route table, no nested conditionals
//! - Operations report a tagged [`Outcome`]; status codes are decided by
//!   the response codec, never by the operations
//! - Every request gets a JSON body, including unknown routes and failures
//!
//! # Supported Operations
//!
//! - list suppliers / list orders
//! - create supplier / create order
//! - stock and finance summaries (fixed values)
//! - status
//! - CORS preflight

mod errors;
mod handler;
mod request;
mod response;
mod router;
mod summaries;

pub use errors::{ApiError, ApiResult};
pub use handler::{ApiHandler, ORDER_CREATED, SUPPLIER_CREATED};
pub use request::{parse_new_order, parse_new_supplier, parse_object};
pub use response::{apply_cors_headers, panic_response, Outcome, StatusPolicy, NOT_FOUND_MESSAGE};
pub use router::{resolve, Operation, Route, RouteEntry, ROUTES};
pub use summaries::{FinanceSummary, InventorySummary, ServiceStatus};
