//! # Compras HTTP Server Module
//!
//! Serves the compras API over HTTP with axum.
//!
//! # Endpoints
//!
//! - `GET  /api/fornecedores` - List suppliers
//! - `GET  /api/ordens` - List purchase orders
//! - `GET  /api/estoque` - Stock summary
//! - `GET  /api/financeiro` - Finance summary
//! - `GET  /api/status` - Liveness
//! - `POST /api/fornecedores` - Create supplier
//! - `POST /api/ordens` - Create purchase order
//! - `OPTIONS *` - CORS preflight

pub mod config;
pub mod server;

pub use config::HttpServerConfig;
pub use server::{shutdown_signal, BoundServer, HttpServer, MAX_BODY_BYTES};
