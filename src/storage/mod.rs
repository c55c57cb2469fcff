//! Record storage for compras
//!
//! Suppliers and purchase orders are kept in two append-only text files,
//! one record per line, `|`-delimited, identifier first.
//!
//! # Design Principles
//!
//! - Append-only (existing lines are never rewritten or reordered)
//! - Identifier = highest stored identifier + 1, starting at 1
//! - Malformed lines are skipped on read, never fatal
//! - Id assignment and append form one critical section per store
//! - File paths are explicit; nothing is global

mod errors;
mod record;
mod store;

pub use errors::{StorageError, StorageResult};
pub use record::{
    encode_line, format_value, parse_value, split_line, NewPurchaseOrder, NewSupplier,
    PurchaseOrder, Record, RecordKind, Supplier, DEFAULT_ORDER_STATUS, DELIMITER,
};
pub use store::{RecordStore, Stores};
