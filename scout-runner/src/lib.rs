//! Stock Scout Runner: scan orchestration, sessions, ranking, export.
//!
//! This crate builds on `scout-core` to provide:
//! - TOML configuration with defaults for every section
//! - Explicit user sessions with BLAKE3 credential checks
//! - The scan pipeline (universe, history, evaluation, table)
//! - Table ranking with the penny filter
//! - CSV and JSON export

pub mod config;
pub mod export;
pub mod pipeline;
pub mod session;
pub mod table;

pub use config::{ConfigError, ScoutConfig};
pub use export::{export_csv, export_json, write_csv, write_json};
pub use pipeline::{RunError, ScanOutcome, Scout};
pub use session::{hash_password, AuthError, CredentialStore, ScanParams, Session};
pub use table::{assemble, RankedRow, ScoutTable, TableOptions};
