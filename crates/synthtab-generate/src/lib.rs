//! Schema-driven synthetic table generation for synthtab.
//!
//! Table specs from `synthtab-core` are validated, turned into rows through a
//! registry of per-dtype generators, and exported as CSV or a ZIP archive.

pub mod engine;
pub mod errors;
pub mod faker_rs;
pub mod generators;
pub mod model;
pub mod output;
pub mod row;
pub mod session;

pub use engine::{GenerationEngine, SessionOutcome, TableOutcome, hash_seed};
pub use errors::GenerationError;
pub use faker_rs::LocaleKey;
pub use generators::{GeneratedValue, Generator, GeneratorContext, GeneratorRegistry};
pub use model::{
    GenerateOptions, GeneratedRow, GeneratedTable, GenerationReport, TableReport, TableStatus,
};
pub use output::{to_archive, to_csv, write_archive, write_table_csv};
pub use row::RowGenerator;
pub use session::{GenerationSession, SessionTable};
