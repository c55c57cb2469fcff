//! Request routing
//!
//! A fixed table maps `(method, path)` to an [`Operation`]. `OPTIONS` is a
//! preflight on every path. Anything else resolves to [`Route::NotFound`].

use axum::http::Method;

/// Operations served by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListSuppliers,
    ListOrders,
    InventorySummary,
    FinanceSummary,
    Status,
    CreateSupplier,
    CreateOrder,
    Preflight,
}

impl Operation {
    /// Whether the operation consumes the request body
    pub fn reads_body(&self) -> bool {
        matches!(self, Operation::CreateSupplier | Operation::CreateOrder)
    }
}

/// One row of the route table
#[derive(Debug)]
pub struct RouteEntry {
    pub method: Method,
    pub path: &'static str,
    pub operation: Operation,
}

/// The route table
pub static ROUTES: [RouteEntry; 7] = [
    RouteEntry {
        method: Method::GET,
        path: "/api/fornecedores",
        operation: Operation::ListSuppliers,
    },
    RouteEntry {
        method: Method::GET,
        path: "/api/ordens",
        operation: Operation::ListOrders,
    },
    RouteEntry {
        method: Method::GET,
        path: "/api/estoque",
        operation: Operation::InventorySummary,
    },
    RouteEntry {
        method: Method::GET,
        path: "/api/financeiro",
        operation: Operation::FinanceSummary,
    },
    RouteEntry {
        method: Method::GET,
        path: "/api/status",
        operation: Operation::Status,
    },
    RouteEntry {
        method: Method::POST,
        path: "/api/fornecedores",
        operation: Operation::CreateSupplier,
    },
    RouteEntry {
        method: Method::POST,
        path: "/api/ordens",
        operation: Operation::CreateOrder,
    },
];

/// Result of routing a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Matched(Operation),
    /// No table entry; `path` is echoed back except for POST
    NotFound { path: Option<String> },
}

/// Resolves a method and a query-free path against the route table.
pub fn resolve(method: &Method, path: &str) -> Route {
    if method == Method::OPTIONS {
        return Route::Matched(Operation::Preflight);
    }

    ROUTES
        .iter()
        .find(|entry| entry.method == *method && entry.path == path)
        .map(|entry| Route::Matched(entry.operation))
        .unwrap_or_else(|| Route::NotFound {
            path: (method != Method::POST).then(|| path.to_string()),
        })
}
