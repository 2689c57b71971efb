pub mod archive;
pub mod csv;

pub use archive::{to_archive, write_archive};
pub use csv::{to_csv, write_table_csv};
