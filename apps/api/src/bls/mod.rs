//! BLS Occupational Employment and Wage Statistics ingestion.
//!
//! Pipeline: workbook rows (`reader`) → cell normalization (`normalize`) →
//! location resolution (`area`) → existence-checked inserts (`importer`),
//! persisted through a `SalaryStore` (`store` for PostgreSQL).

pub mod area;
pub mod error;
pub mod importer;
pub mod normalize;
pub mod reader;
pub mod row;
pub mod soc;
pub mod store;

pub use error::ImportError;
pub use importer::{ImportOptions, ImportSummary, SalaryImporter, SalaryStore};
pub use normalize::Cell;
pub use row::{AreaType, BlsRow, ImportScope};
