//! Retail Pulse core library
//!
//! Data backbone for a retail analytics dashboard over a synthetic
//! e-commerce dataset: spreadsheet ingestion and validation, derived
//! inventory/sales metrics, a reconciled local "synced" generation with
//! seed fallback, and the read accessors every display surface consumes.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod alerts;
pub mod analytics;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod events;
pub mod models;
pub mod queries;
pub mod sheets;
pub mod storage;
pub mod sync;

pub mod prelude {
    pub use crate::config::{load_config, AppConfig};
    pub use crate::dataset::{DataSnapshot, Dataset, Generation};
    pub use crate::errors::ServiceError;
    pub use crate::models::*;
    pub use crate::sheets::{SheetClient, SheetError};
    pub use crate::storage::{FileStore, KvStore, MemoryStore};
    pub use crate::sync::{SyncPhase, SyncService};
}
