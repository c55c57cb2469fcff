//! Stock and finance summaries
//!
//! Both are fixed stand-ins for services that live outside this one. They
//! are not derived from the record stores.

use serde::Serialize;

/// Inventory overview served at `/api/estoque`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySummary {
    pub total_itens: u32,
    pub valor_total: f64,
    pub itens_baixo_estoque: u32,
    pub status: &'static str,
}

/// Financial overview served at `/api/financeiro`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceSummary {
    pub contas_pagar: f64,
    pub saldo_disponivel: f64,
    pub pendencias: u32,
    pub status: &'static str,
}

/// Liveness payload served at `/api/status`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub message: &'static str,
}

impl InventorySummary {
    pub fn mock() -> Self {
        Self {
            total_itens: 42,
            valor_total: 12500.50,
            itens_baixo_estoque: 3,
            status: "OK",
        }
    }
}

impl FinanceSummary {
    pub fn mock() -> Self {
        Self {
            contas_pagar: 25000.00,
            saldo_disponivel: 50000.00,
            pendencias: 5,
            status: "OK",
        }
    }
}

impl ServiceStatus {
    pub fn online() -> Self {
        Self {
            status: "online",
            message: "Backend conectado",
        }
    }
}
