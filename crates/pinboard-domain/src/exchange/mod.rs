//! CSV import/export of whole boards.
//!
//! A board travels as five CSV files plus an `images/` folder. Export works
//! from a board snapshot; import validates everything before writing a row.

pub mod csv;
pub mod exporter;
pub mod importer;
pub mod models;

pub use exporter::{export_name, sanitize_filename, BoardExporter, ExportBundle};
pub use importer::{board_name_from_source, BoardImporter, ImportBundle, ValidatedImport};
pub use models::{CSV_FILES, IMAGES_DIR};
