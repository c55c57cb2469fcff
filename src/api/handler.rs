//! API Handler for compras
//!
//! Executes a routed [`Operation`] against the record stores and reports an
//! [`Outcome`]. Store I/O is blocking and runs on the blocking thread pool;
//! the per-store locks live inside the stores.

use std::sync::Arc;

use tracing::{error, info};

use crate::storage::{StorageResult, Stores};

use super::errors::{ApiError, ApiResult};
use super::request::{parse_new_order, parse_new_supplier};
use super::response::Outcome;
use super::router::{Operation, Route};
use super::summaries::{FinanceSummary, InventorySummary, ServiceStatus};

pub const SUPPLIER_CREATED: &str = "Fornecedor criado com sucesso";
pub const ORDER_CREATED: &str = "Ordem de compra criada com sucesso";

/// Shared, cloneable entry point for API operations
#[derive(Clone)]
pub struct ApiHandler {
    stores: Arc<Stores>,
}

impl ApiHandler {
    /// Create a handler over the given stores
    pub fn new(stores: Arc<Stores>) -> Self {
        Self { stores }
    }

    /// Handles a routed request. `body` is only consulted by create
    /// operations.
    pub async fn handle(&self, route: Route, body: &[u8]) -> Outcome {
        match route {
            Route::Matched(operation) => self.execute(operation, body).await,
            Route::NotFound { path } => Outcome::NotFound { path },
        }
    }

    /// Executes one operation.
    pub async fn execute(&self, operation: Operation, body: &[u8]) -> Outcome {
        match operation {
            Operation::ListSuppliers => {
                match self.blocking(|stores| stores.suppliers.load_all()).await {
                    Ok(records) => Outcome::Suppliers(records),
                    Err(e) => read_failed("fornecedores", e),
                }
            }
            Operation::ListOrders => match self.blocking(|stores| stores.orders.load_all()).await {
                Ok(records) => Outcome::Orders(records),
                Err(e) => read_failed("ordens", e),
            },
            Operation::InventorySummary => Outcome::Inventory(InventorySummary::mock()),
            Operation::FinanceSummary => Outcome::Finance(FinanceSummary::mock()),
            Operation::Status => Outcome::Status(ServiceStatus::online()),
            Operation::Preflight => Outcome::Preflight,
            Operation::CreateSupplier => self.create_supplier(body).await,
            Operation::CreateOrder => self.create_order(body).await,
        }
    }

    async fn create_supplier(&self, body: &[u8]) -> Outcome {
        let draft = match parse_new_supplier(body) {
            Ok(draft) => draft,
            Err(e) => return Outcome::WriteFailed(e),
        };
        match self
            .blocking(move |stores| stores.suppliers.append(&draft))
            .await
        {
            Ok(id) => {
                info!(id, "supplier created");
                Outcome::Created {
                    message: SUPPLIER_CREATED,
                    id,
                }
            }
            Err(e) => write_failed("fornecedores", e),
        }
    }

    async fn create_order(&self, body: &[u8]) -> Outcome {
        let draft = match parse_new_order(body) {
            Ok(draft) => draft,
            Err(e) => return Outcome::WriteFailed(e),
        };
        match self.blocking(move |stores| stores.orders.append(&draft)).await {
            Ok(id) => {
                info!(id, "purchase order created");
                Outcome::Created {
                    message: ORDER_CREATED,
                    id,
                }
            }
            Err(e) => write_failed("ordens", e),
        }
    }

    /// Runs a store call on the blocking pool.
    ///
    /// The call runs to completion even if the request future is dropped,
    /// so a started append always finishes and releases its lock.
    async fn blocking<T, F>(&self, f: F) -> ApiResult<T>
    where
        F: FnOnce(&Stores) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let stores = Arc::clone(&self.stores);
        tokio::task::spawn_blocking(move || f(&stores))
            .await
            .map_err(|e| ApiError::TaskFailed(e.to_string()))?
            .map_err(ApiError::from)
    }
}

fn read_failed(store: &'static str, e: ApiError) -> Outcome {
    error!(store, error = %e, "failed to load records");
    Outcome::ReadFailed(e)
}

fn write_failed(store: &'static str, e: ApiError) -> Outcome {
    error!(store, error = %e, "failed to append record");
    Outcome::WriteFailed(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn handler(temp_dir: &TempDir) -> ApiHandler {
        ApiHandler::new(Arc::new(Stores::open(temp_dir.path())))
    }

    #[tokio::test]
    async fn test_create_then_list_supplier() {
        let temp_dir = TempDir::new().unwrap();
        let handler = handler(&temp_dir);

        let created = handler
            .execute(
                Operation::CreateSupplier,
                br#"{"nome":"Acme","cnpj":"123","telefone":"555","email":"a@b.com"}"#,
            )
            .await;
        assert!(matches!(created, Outcome::Created { id: 1, .. }));

        match handler.execute(Operation::ListSuppliers, b"").await {
            Outcome::Suppliers(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].id, "1");
                assert_eq!(records[0].email, "a@b.com");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_body_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let handler = handler(&temp_dir);

        let outcome = handler.execute(Operation::CreateOrder, b"not json").await;
        assert!(matches!(outcome, Outcome::WriteFailed(ApiError::InvalidJson(_))));
        assert!(!temp_dir.path().join("ordens.txt").exists());
    }

    #[tokio::test]
    async fn test_not_found_route_passes_path_through() {
        let temp_dir = TempDir::new().unwrap();
        let outcome = handler(&temp_dir)
            .handle(
                Route::NotFound {
                    path: Some("/x".into()),
                },
                b"",
            )
            .await;
        assert!(matches!(outcome, Outcome::NotFound { path: Some(p) } if p == "/x"));
    }

    #[tokio::test]
    async fn test_storage_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("ordens.txt")).unwrap();
        let handler = handler(&temp_dir);

        let listed = handler.execute(Operation::ListOrders, b"").await;
        assert!(matches!(listed, Outcome::ReadFailed(ApiError::Storage(_))));

        let created = handler
            .execute(Operation::CreateOrder, br#"{"fornecedor_id":"1"}"#)
            .await;
        assert!(matches!(created, Outcome::WriteFailed(ApiError::Storage(_))));
    }
}
