//! Service layer for business logic.
//!
//! This module contains services that sit between the catalog and its
//! callers: document persistence, session-scoped catalog operations,
//! export/import framing and the system report.

pub mod catalog;
pub mod exchange;
pub mod report;
pub mod store;

// Re-export commonly used types and functions
pub use catalog::{CatalogService, TermView};
pub use exchange::{ExportBundle, ExportScope};
pub use report::SystemReport;
pub use store::{read_catalog, session_id_for_client, write_catalog, DocumentStore};
