use std::collections::HashSet;

use jsonschema::JSONSchema;
use serde::Serialize;
use serde_json::Value;

use crate::dtype::{Dtype, ParamFamily};
use crate::error::{Error, Result};
use crate::json_schema::session_json_schema_value;
use crate::session::SessionConfig;
use crate::table::{ColumnSpec, TableSpec};

/// Row ceiling applied when no other limit is configured.
pub const DEFAULT_MAX_ROWS: u64 = 50_000;

/// Smallest `i64`, exact as `f64`.
pub const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
/// One past the largest `i64` (2^63), exact as `f64`.
pub const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// Structured validation issue with location and hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: String,
    /// JSON pointer into the configuration document.
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ValidationIssue {
    /// Create a new validation issue.
    pub fn new(
        severity: IssueSeverity,
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            path: path.into(),
            message: message.into(),
            hint,
        }
    }

    fn error(
        code: &str,
        path: impl Into<String>,
        message: impl Into<String>,
        hint: Option<&str>,
    ) -> Self {
        Self::new(
            IssueSeverity::Error,
            code,
            path,
            message,
            hint.map(str::to_string),
        )
    }

    fn warning(code: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Warning, code, path, message, None)
    }
}

/// Aggregated validation report with errors and warnings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns true when there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error issue.
    pub fn push_error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }

    /// Add a warning issue.
    pub fn push_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Whether any error carries the given code.
    pub fn has_error(&self, code: &str) -> bool {
        self.errors.iter().any(|issue| issue.code == code)
    }
}

/// Configurable bounds checked during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub max_rows: u64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

/// Table spec that passed validation, with accumulated warnings.
#[derive(Debug, Clone)]
pub struct ValidatedTable<'a> {
    pub spec: &'a TableSpec,
    pub warnings: Vec<ValidationIssue>,
}

/// Validate one table, collecting every issue instead of stopping at the first.
pub fn validate_table<'a>(
    spec: &'a TableSpec,
    limits: &ValidationLimits,
) -> std::result::Result<ValidatedTable<'a>, ValidationReport> {
    let mut report = ValidationReport::default();
    check_table(spec, limits, "", &mut report);

    if !report.is_ok() {
        return Err(report);
    }

    Ok(ValidatedTable {
        spec,
        warnings: report.warnings,
    })
}

/// Validate every table of a session; paths are prefixed with the table id.
pub fn validate_session(config: &SessionConfig, limits: &ValidationLimits) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut names = HashSet::new();

    for entry in &config.tables {
        let prefix = format!("/{}", escape_pointer(&entry.id));
        check_table(&entry.spec, limits, &prefix, &mut report);

        if !names.insert(entry.spec.name.as_str()) {
            report.push_warning(ValidationIssue::warning(
                "duplicate_table_name",
                format!("{prefix}/name"),
                format!(
                    "table name '{}' is used more than once; exports will collide",
                    entry.spec.name
                ),
            ));
        }
    }

    report
}

/// Validate a session JSON document against the session JSON Schema.
pub fn validate_session_json(
    session_json: &Value,
    session_schema: &Value,
) -> Result<ValidationReport> {
    let compiled =
        JSONSchema::compile(session_schema).map_err(|err| Error::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();

    if let Err(errors) = compiled.validate(session_json) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_violation",
                path,
                error.to_string(),
                None,
            ));
        }
    }

    Ok(report)
}

/// Load a session document: structural check first, then parsing.
///
/// Table-level rules are left to [`validate_table`] so that one invalid
/// table does not hide its siblings.
pub fn load_session(raw: &str) -> std::result::Result<SessionConfig, ValidationReport> {
    let document: Value = serde_json::from_str(raw)
        .map_err(|err| single_error("invalid_json", "/", err.to_string()))?;

    let schema = session_json_schema_value()
        .map_err(|err| single_error("schema_validation_error", "/", err.to_string()))?;

    let structural = validate_session_json(&document, &schema)
        .map_err(|err| single_error("schema_validation_error", "/", err.to_string()))?;
    if !structural.is_ok() {
        return Err(structural);
    }

    SessionConfig::from_json_str(raw)
        .map_err(|err| single_error("invalid_session_json", "/", err.to_string()))
}

fn single_error(code: &str, path: &str, message: String) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.push_error(ValidationIssue::error(code, path, message, None));
    report
}

fn check_table(
    spec: &TableSpec,
    limits: &ValidationLimits,
    prefix: &str,
    report: &mut ValidationReport,
) {
    if spec.name.trim().is_empty() {
        report.push_error(ValidationIssue::error(
            "empty_table_name",
            format!("{prefix}/name"),
            "table name must not be empty",
            None,
        ));
    } else if spec.name.contains(['/', '\\']) {
        report.push_error(ValidationIssue::error(
            "invalid_table_name",
            format!("{prefix}/name"),
            format!("table name '{}' contains a path separator", spec.name),
            Some("table names become file names inside exports"),
        ));
    }

    if spec.row_count == 0 || spec.row_count > limits.max_rows {
        report.push_error(ValidationIssue::error(
            "row_count_out_of_bounds",
            format!("{prefix}/rows"),
            format!(
                "rows must be between 1 and {} (got {})",
                limits.max_rows, spec.row_count
            ),
            None,
        ));
    }

    if spec.columns.is_empty() {
        report.push_warning(ValidationIssue::warning(
            "no_columns",
            format!("{prefix}/columns"),
            "table has no columns; rows will be empty",
        ));
    }

    let mut seen = HashSet::new();
    for (idx, column) in spec.columns.iter().enumerate() {
        let path = format!("{prefix}/columns/{idx}");

        if column.name.trim().is_empty() {
            report.push_error(ValidationIssue::error(
                "empty_column_name",
                format!("{path}/name"),
                "column name must not be empty",
                None,
            ));
        } else if !seen.insert(column.name.as_str()) {
            report.push_error(ValidationIssue::error(
                "duplicate_column_name",
                format!("{path}/name"),
                format!("column '{}' is declared more than once", column.name),
                Some("rename one of the columns"),
            ));
        }

        check_nullability(column, &path, report);

        match column.family() {
            ParamFamily::IntegerRange | ParamFamily::RealRange => {
                check_numeric_range(column, &path, report)
            }
            ParamFamily::DateRange => check_date_range(column, &path, report),
            ParamFamily::Domain => check_domain(column, &path, report),
            ParamFamily::Plain => {}
        }

        check_unused_parameters(column, &path, report);
    }
}

fn check_nullability(column: &ColumnSpec, path: &str, report: &mut ValidationReport) {
    if column.null_percentage > 100 {
        report.push_error(ValidationIssue::error(
            "null_percentage_out_of_range",
            format!("{path}/null_percentage"),
            format!(
                "null_percentage must be between 0 and 100 (got {})",
                column.null_percentage
            ),
            None,
        ));
    }

    if column.dtype == Dtype::Index {
        if column.nullable {
            report.push_warning(ValidationIssue::warning(
                "nullable_index_ignored",
                format!("{path}/nullable"),
                "index columns are never null",
            ));
        }
    } else if !column.nullable && column.null_percentage > 0 {
        report.push_warning(ValidationIssue::warning(
            "null_percentage_ignored",
            format!("{path}/null_percentage"),
            "null_percentage has no effect unless the column is nullable",
        ));
    }
}

fn check_numeric_range(column: &ColumnSpec, path: &str, report: &mut ValidationReport) {
    let Some((min, max)) = column.numeric_bounds() else {
        return;
    };

    if !min.is_finite() || !max.is_finite() {
        report.push_error(ValidationIssue::error(
            "non_finite_bound",
            format!("{path}/min"),
            format!("column '{}' has a non-finite bound", column.name),
            None,
        ));
        return;
    }

    if max < min {
        report.push_error(ValidationIssue::error(
            "invalid_range",
            format!("{path}/max"),
            format!(
                "column '{}': max ({max}) is less than min ({min})",
                column.name
            ),
            Some("swap min and max or widen the range"),
        ));
        return;
    }

    if !(max - min).is_finite() {
        report.push_error(ValidationIssue::error(
            "range_too_wide",
            format!("{path}/max"),
            format!(
                "column '{}': the span from {min} to {max} is not representable",
                column.name
            ),
            Some("narrow the range"),
        ));
        return;
    }

    match column.family() {
        ParamFamily::IntegerRange => {
            if min.ceil() < I64_LOWER || max.floor() >= I64_UPPER {
                report.push_error(ValidationIssue::error(
                    "integer_out_of_range",
                    format!("{path}/min"),
                    format!(
                        "column '{}': bounds {min}..{max} do not fit a 64-bit integer",
                        column.name
                    ),
                    None,
                ));
            } else if min.ceil() > max.floor() {
                report.push_error(ValidationIssue::error(
                    "no_integer_in_range",
                    format!("{path}/min"),
                    format!(
                        "column '{}': no integer lies between {min} and {max}",
                        column.name
                    ),
                    None,
                ));
            }
        }
        ParamFamily::RealRange => {
            let decimals = column.dtype.decimals().unwrap_or(2);
            let factor = 10_f64.powi(decimals as i32);
            if (min * factor).ceil() > (max * factor).floor() {
                report.push_warning(ValidationIssue::warning(
                    "range_below_precision",
                    format!("{path}/min"),
                    format!(
                        "column '{}': no {decimals}-decimal value lies between {min} and {max}",
                        column.name
                    ),
                ));
            }
        }
        _ => {}
    }
}

fn check_date_range(column: &ColumnSpec, path: &str, report: &mut ValidationReport) {
    if let (Some(start), Some(end)) = (column.start_date, column.end_date)
        && end < start
    {
        report.push_error(ValidationIssue::error(
            "invalid_date_range",
            format!("{path}/end_date"),
            format!(
                "column '{}': end_date {end} is before start_date {start}",
                column.name
            ),
            None,
        ));
    }
}

fn check_domain(column: &ColumnSpec, path: &str, report: &mut ValidationReport) {
    if !column.values.is_empty() {
        return;
    }

    match column.dtype {
        Dtype::Custom => report.push_error(ValidationIssue::error(
            "empty_custom_examples",
            format!("{path}/custom_values"),
            format!("custom column '{}' needs at least one example value", column.name),
            Some("provide comma-separated values"),
        )),
        _ if !column.nullable => report.push_error(ValidationIssue::error(
            "empty_domain",
            format!("{path}/custom_values"),
            format!(
                "column '{}' has no values to choose from and is not nullable",
                column.name
            ),
            Some("provide comma-separated values or mark the column nullable"),
        )),
        _ => {}
    }
}

fn check_unused_parameters(column: &ColumnSpec, path: &str, report: &mut ValidationReport) {
    let family = column.family();
    let mut unused = Vec::new();

    if !matches!(family, ParamFamily::IntegerRange | ParamFamily::RealRange) {
        if column.min.is_some() {
            unused.push("min");
        }
        if column.max.is_some() {
            unused.push("max");
        }
    }
    if family != ParamFamily::DateRange {
        if column.start_date.is_some() {
            unused.push("start_date");
        }
        if column.end_date.is_some() {
            unused.push("end_date");
        }
    }
    if family != ParamFamily::Domain && !column.values.is_empty() {
        unused.push("custom_values");
    }

    for field in unused {
        report.push_warning(ValidationIssue::warning(
            "unused_parameter",
            format!("{path}/{field}"),
            format!("{field} is ignored by dtype '{}'", column.dtype),
        ));
    }
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
