use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::errors::GenerationError;
use crate::model::GeneratedTable;
use crate::output::csv::to_csv;

/// Bundle tables into a ZIP archive with one `<name>.csv` entry each.
pub fn to_archive<'a, I>(tables: I) -> Result<Vec<u8>, GenerationError>
where
    I: IntoIterator<Item = &'a GeneratedTable>,
{
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut entries = HashSet::new();

    for table in tables {
        let entry = format!("{}.csv", table.name);
        if !entries.insert(entry.clone()) {
            return Err(GenerationError::DuplicateArchiveEntry(entry));
        }
        writer.start_file(entry, options)?;
        writer.write_all(&to_csv(table)?)?;
    }

    if entries.is_empty() {
        return Err(GenerationError::EmptyArchive);
    }

    Ok(writer.finish()?.into_inner())
}

/// Write the archive to `path` and return its size in bytes.
pub fn write_archive<'a, I>(path: &Path, tables: I) -> Result<u64, GenerationError>
where
    I: IntoIterator<Item = &'a GeneratedTable>,
{
    let bytes = to_archive(tables)?;
    fs::write(path, &bytes)?;
    Ok(bytes.len() as u64)
}
