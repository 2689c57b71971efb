//! Core contracts for synthtab.
//!
//! This crate defines the table schema model, the session document, and the
//! validation rules applied before any data is generated.

pub mod dtype;
pub mod error;
pub mod json_schema;
pub mod presets;
pub mod session;
pub mod table;
pub mod validation;

pub use dtype::{Dtype, ParamFamily};
pub use error::{Error, Result};
pub use json_schema::{session_json_schema, session_json_schema_value};
pub use presets::DomainPreset;
pub use session::{SessionConfig, TableEntry};
pub use table::{ColumnSpec, DEFAULT_ROW_COUNT, DomainInput, TableSpec};
pub use validation::{
    DEFAULT_MAX_ROWS, I64_LOWER, I64_UPPER, IssueSeverity, ValidatedTable, ValidationIssue,
    ValidationLimits, ValidationReport, load_session, validate_session, validate_session_json,
    validate_table,
};
