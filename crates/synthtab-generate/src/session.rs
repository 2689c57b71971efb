use synthtab_core::{SessionConfig, TableEntry, TableSpec};

use crate::model::GeneratedTable;

/// A configured table and its latest generated output, if any.
#[derive(Debug, Clone)]
pub struct SessionTable {
    pub id: String,
    pub spec: TableSpec,
    pub generated: Option<GeneratedTable>,
}

/// Caller-owned set of configured tables, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct GenerationSession {
    tables: Vec<SessionTable>,
}

impl GenerationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: SessionConfig) -> Self {
        let tables = config
            .tables
            .into_iter()
            .map(|entry| SessionTable {
                id: entry.id,
                spec: entry.spec,
                generated: None,
            })
            .collect();
        Self { tables }
    }

    /// Schema-only snapshot; generated rows are left out.
    pub fn to_config(&self) -> SessionConfig {
        SessionConfig {
            tables: self
                .tables
                .iter()
                .map(|table| TableEntry {
                    id: table.id.clone(),
                    spec: table.spec.clone(),
                })
                .collect(),
        }
    }

    /// Add a starter table under the next free `Table_<n>` id and return the id.
    pub fn add_table(&mut self) -> String {
        let mut n = self.tables.len() + 1;
        let id = loop {
            let candidate = format!("Table_{n}");
            if self.get(&candidate).is_none() {
                break candidate;
            }
            n += 1;
        };
        self.tables.push(SessionTable {
            id: id.clone(),
            spec: TableSpec::starter(id.clone()),
            generated: None,
        });
        id
    }

    /// Insert or replace a table spec; replacing drops stale output.
    pub fn insert(&mut self, id: impl Into<String>, spec: TableSpec) {
        let id = id.into();
        match self.tables.iter_mut().find(|table| table.id == id) {
            Some(table) => {
                table.spec = spec;
                table.generated = None;
            }
            None => self.tables.push(SessionTable {
                id,
                spec,
                generated: None,
            }),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<SessionTable> {
        let idx = self.tables.iter().position(|table| table.id == id)?;
        Some(self.tables.remove(idx))
    }

    pub fn get(&self, id: &str) -> Option<&SessionTable> {
        self.tables.iter().find(|table| table.id == id)
    }

    /// Mutable access to a spec; any previous output is discarded.
    pub fn spec_mut(&mut self, id: &str) -> Option<&mut TableSpec> {
        let table = self.tables.iter_mut().find(|table| table.id == id)?;
        table.generated = None;
        Some(&mut table.spec)
    }

    /// Attach generated output to a table. Returns false for unknown ids.
    pub fn set_generated(&mut self, id: &str, generated: GeneratedTable) -> bool {
        match self.tables.iter_mut().find(|table| table.id == id) {
            Some(table) => {
                table.generated = Some(generated);
                true
            }
            None => false,
        }
    }

    pub fn generated_tables(&self) -> impl Iterator<Item = &GeneratedTable> {
        self.tables
            .iter()
            .filter_map(|table| table.generated.as_ref())
    }

    pub fn tables(&self) -> &[SessionTable] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_table_skips_taken_ids() {
        let mut session = GenerationSession::new();
        session.insert("Table_2", TableSpec::starter("Existing"));

        let id = session.add_table();
        assert_eq!(id, "Table_3");
        let added = session.get(&id).unwrap();
        assert_eq!(added.spec.row_count, 10);
        assert_eq!(added.spec.columns.len(), 1);
    }

    #[test]
    fn config_snapshot_excludes_output() {
        let mut session = GenerationSession::new();
        let id = session.add_table();
        session.set_generated(
            &id,
            GeneratedTable {
                name: id.clone(),
                columns: vec!["index".to_string()],
                rows: Vec::new(),
            },
        );

        let config = session.to_config();
        assert_eq!(config.len(), 1);
        assert_eq!(session.generated_tables().count(), 1);

        session.spec_mut(&id).unwrap().row_count = 5;
        assert_eq!(session.generated_tables().count(), 0);
    }
}
