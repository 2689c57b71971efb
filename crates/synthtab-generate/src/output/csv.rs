use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::GeneratedTable;

/// Serialize a table as CSV bytes: header first, then rows in order.
pub fn to_csv(table: &GeneratedTable) -> Result<Vec<u8>, csv::Error> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, table)?;
    Ok(buffer)
}

/// Write a table as CSV and return the number of bytes written.
pub fn write_table_csv(path: &Path, table: &GeneratedTable) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let mut counting = CountingWriter::new(writer);
    write_records(&mut counting, table)?;
    counting.flush().map_err(csv::Error::from)?;
    Ok(counting.bytes_written())
}

fn write_records<W: Write>(out: W, table: &GeneratedTable) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);

    writer.write_record(&table.columns)?;

    for row in &table.rows {
        let record: Vec<String> = row.values.iter().map(|value| value.to_csv()).collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
