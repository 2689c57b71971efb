use chrono::{Months, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::dtype::{Dtype, ParamFamily};

/// Row count given to tables that do not declare one.
pub const DEFAULT_ROW_COUNT: u64 = 10;

/// Span covered by date columns without explicit bounds.
const DEFAULT_DATE_SPAN_MONTHS: u32 = 30 * 12;

/// One column's generation rule and constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnSpec {
    /// Header of the column in exported files.
    pub name: String,
    pub dtype: Dtype,
    /// Whether cells may be emitted as null.
    #[serde(default)]
    pub nullable: bool,
    /// Chance (0-100) of a null cell when `nullable` is set.
    #[serde(default)]
    pub null_percentage: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Domain for `contains`/`custom` columns.
    #[serde(
        rename = "custom_values",
        alias = "custom_examples",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_domain"
    )]
    #[schemars(with = "DomainInput")]
    pub values: Vec<String>,
}

/// Accepted encodings of a column domain.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DomainInput {
    /// Comma-separated list, as typed in a form field.
    Text(String),
    List(Vec<String>),
}

impl DomainInput {
    /// Trimmed, non-empty entries in input order.
    pub fn into_values(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            DomainInput::Text(text) => text.split(',').map(str::to_string).collect(),
            DomainInput::List(items) => items,
        };
        raw.into_iter()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect()
    }
}

fn deserialize_domain<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = Option::<DomainInput>::deserialize(deserializer)?;
    Ok(input.map(DomainInput::into_values).unwrap_or_default())
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, dtype: Dtype) -> Self {
        Self {
            name: name.into(),
            dtype,
            nullable: false,
            null_percentage: 0,
            min: None,
            max: None,
            start_date: None,
            end_date: None,
            values: Vec::new(),
        }
    }

    /// Mark the column nullable with the given null percentage.
    pub fn with_nulls(mut self, null_percentage: u32) -> Self {
        self.nullable = true;
        self.null_percentage = null_percentage;
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Effective numeric bounds, falling back to the dtype defaults.
    pub fn numeric_bounds(&self) -> Option<(f64, f64)> {
        let (default_min, default_max) = self.dtype.default_range()?;
        Some((
            self.min.unwrap_or(default_min),
            self.max.unwrap_or(default_max),
        ))
    }

    /// Effective date bounds.
    ///
    /// Missing bounds are filled relative to `base`: an open end stops at
    /// `base` (or at the start when the start is later), an open start
    /// reaches thirty years back from the end.
    pub fn date_bounds(&self, base: NaiveDate) -> (NaiveDate, NaiveDate) {
        let span = Months::new(DEFAULT_DATE_SPAN_MONTHS);
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => (start, end),
            (Some(start), None) => (start, start.max(base)),
            (None, Some(end)) => (end.checked_sub_months(span).unwrap_or(NaiveDate::MIN), end),
            (None, None) => (
                base.checked_sub_months(span).unwrap_or(NaiveDate::MIN),
                base,
            ),
        }
    }

    /// Whether the column can emit nulls at all.
    pub fn emits_nulls(&self) -> bool {
        self.nullable && self.dtype != Dtype::Index && self.null_percentage > 0
    }

    pub fn family(&self) -> ParamFamily {
        self.dtype.family()
    }
}

/// Declarative schema for one synthetic table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TableSpec {
    /// Table name, also used for exported file names.
    #[serde(default)]
    pub name: String,
    /// Number of rows to generate.
    #[serde(rename = "rows", default = "default_row_count")]
    pub row_count: u64,
    /// Ordered columns; order is the output column order.
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

fn default_row_count() -> u64 {
    DEFAULT_ROW_COUNT
}

impl TableSpec {
    pub fn new(name: impl Into<String>, row_count: u64, columns: Vec<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            row_count,
            columns,
        }
    }

    /// A new table with a single `index` column and the default row count.
    pub fn starter(name: impl Into<String>) -> Self {
        Self::new(
            name,
            DEFAULT_ROW_COUNT,
            vec![ColumnSpec::new("index", Dtype::Index)],
        )
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_accepts_comma_separated_text() {
        let column: ColumnSpec = serde_json::from_str(
            r#"{"name": "tier", "dtype": "contains", "custom_values": " gold, silver ,,bronze "}"#,
        )
        .unwrap();
        assert_eq!(column.values, vec!["gold", "silver", "bronze"]);
    }

    #[test]
    fn domain_accepts_legacy_key_and_list() {
        let column: ColumnSpec = serde_json::from_str(
            r#"{"name": "code", "dtype": "custom", "custom_examples": ["A1", "", "B2"]}"#,
        )
        .unwrap();
        assert_eq!(column.values, vec!["A1", "B2"]);
    }

    #[test]
    fn date_bounds_fill_missing_sides() {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let start = NaiveDate::from_ymd_opt(2030, 5, 1).unwrap();

        let mut column = ColumnSpec::new("when", Dtype::Date);
        assert_eq!(
            column.date_bounds(base),
            (NaiveDate::from_ymd_opt(1994, 1, 1).unwrap(), base)
        );

        column.start_date = Some(start);
        assert_eq!(column.date_bounds(base), (start, start));
    }
}
