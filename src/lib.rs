//! compras - HTTP data-access facade over append-only record files
//!
//! Suppliers ("fornecedores") and purchase orders ("ordens") are stored as
//! `|`-delimited lines and served as JSON.

pub mod api;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod storage;
