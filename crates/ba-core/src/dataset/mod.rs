//! Dataset ingestion: CSV loading and the row inclusion filter.

pub mod filter;
pub mod loader;
pub mod record;

pub use filter::{DropReason, RecordFilter};
pub use loader::{load_records, DataLoadError};
pub use record::AuditRecord;
