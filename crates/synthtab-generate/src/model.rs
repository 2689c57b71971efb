use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use synthtab_core::{ValidationIssue, ValidationLimits};

use crate::faker_rs::LocaleKey;
use crate::generators::GeneratedValue;

/// Options for the generation engine.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Session seed; a random one is drawn (and reported) when unset.
    pub seed: Option<u64>,
    /// Run id recorded in the report; a fresh UUID when unset.
    pub run_id: Option<String>,
    /// Reference date for date columns with open bounds.
    pub base_date: NaiveDate,
    pub locale: LocaleKey,
    pub limits: ValidationLimits,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: None,
            run_id: None,
            base_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            locale: LocaleKey::default(),
            limits: ValidationLimits::default(),
        }
    }
}

/// One generated row: a value per declared column, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedRow {
    pub values: Vec<GeneratedValue>,
}

/// Materialized output of one table spec.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<GeneratedRow>,
}

impl GeneratedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Values of one column, top to bottom.
    pub fn column_values<'a>(
        &'a self,
        name: &str,
    ) -> Option<impl Iterator<Item = &'a GeneratedValue> + use<'a>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(move |row| row.values.get(idx)))
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&GeneratedValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|row| row.values.get(idx))
    }
}

/// Outcome of one table in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Generated,
    Invalid,
    Failed,
    Cancelled,
}

impl TableStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TableStatus::Generated => "generated",
            TableStatus::Invalid => "invalid",
            TableStatus::Failed => "failed",
            TableStatus::Cancelled => "cancelled",
        }
    }
}

/// Summary of a generated table.
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub id: String,
    pub name: String,
    pub status: TableStatus,
    pub rows_requested: u64,
    pub rows_generated: u64,
    pub seed: u64,
    pub null_counts: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub locale: LocaleKey,
    pub base_date: NaiveDate,
    pub tables: Vec<TableReport>,
    pub rows_total: u64,
    pub generator_usage: BTreeMap<String, u64>,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<ValidationIssue>,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64, options: &GenerateOptions) -> Self {
        Self {
            run_id,
            seed,
            locale: options.locale,
            base_date: options.base_date,
            tables: Vec::new(),
            rows_total: 0,
            generator_usage: BTreeMap::new(),
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn record_generator_usage(&mut self, id: &str, count: u64) {
        *self.generator_usage.entry(id.to_string()).or_insert(0) += count;
    }

    pub fn record_warning(&mut self, issue: ValidationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }

    pub fn record_table(&mut self, table: TableReport) {
        self.rows_total += table.rows_generated;
        self.tables.push(table);
    }

    /// Whether every table was generated.
    pub fn is_complete(&self) -> bool {
        self.tables
            .iter()
            .all(|table| table.status == TableStatus::Generated)
    }
}
