use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::Schema;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;
use crate::table::TableSpec;

/// One configured table keyed by its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct TableEntry {
    pub id: String,
    pub spec: TableSpec,
}

/// Persisted session configuration: table id to table spec, in document order.
///
/// Only schema is stored here; generated rows never reach this document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionConfig {
    pub tables: Vec<TableEntry>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document, keeping table order as written.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn get(&self, id: &str) -> Option<&TableSpec> {
        self.tables
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.spec)
    }

    /// Insert or replace a table, keeping its position when replaced.
    pub fn insert(&mut self, id: impl Into<String>, spec: TableSpec) {
        let id = id.into();
        match self.tables.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => entry.spec = spec,
            None => self.tables.push(TableEntry { id, spec }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}

impl Serialize for SessionConfig {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for entry in &self.tables {
            map.serialize_entry(&entry.id, &entry.spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SessionConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SessionVisitor)
    }
}

struct SessionVisitor;

impl<'de> Visitor<'de> for SessionVisitor {
    type Value = SessionConfig;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of table id to table spec")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut tables: Vec<TableEntry> = Vec::new();
        while let Some((id, mut spec)) = access.next_entry::<String, TableSpec>()? {
            if tables.iter().any(|entry| entry.id == id) {
                return Err(de::Error::custom(format!("duplicate table id '{id}'")));
            }
            if spec.name.trim().is_empty() {
                spec.name = id.clone();
            }
            tables.push(TableEntry { id, spec });
        }
        Ok(SessionConfig { tables })
    }
}

impl JsonSchema for SessionConfig {
    fn schema_name() -> String {
        "SessionConfig".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        <BTreeMap<String, TableSpec>>::json_schema(generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_document_order_and_fills_names() {
        let raw = r#"{
            "zeta": {"rows": 3, "columns": []},
            "alpha": {"name": "Alpha", "rows": 5, "columns": [], "metadata": null}
        }"#;
        let config = SessionConfig::from_json_str(raw).unwrap();
        let ids: Vec<_> = config.tables.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha"]);
        assert_eq!(config.tables[0].spec.name, "zeta");
        assert_eq!(config.tables[1].spec.name, "Alpha");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let raw = r#"{"t": {"columns": []}, "t": {"columns": []}}"#;
        assert!(SessionConfig::from_json_str(raw).is_err());
    }
}
