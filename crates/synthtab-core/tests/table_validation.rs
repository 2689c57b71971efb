use chrono::NaiveDate;
use synthtab_core::{
    ColumnSpec, Dtype, IssueSeverity, TableSpec, ValidationLimits, validate_table,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn codes(report: &synthtab_core::ValidationReport) -> Vec<&str> {
    report.errors.iter().map(|issue| issue.code.as_str()).collect()
}

#[test]
fn accepts_well_formed_table() {
    let spec = TableSpec::new(
        "Customers",
        3,
        vec![
            ColumnSpec::new("id", Dtype::Index),
            ColumnSpec::new("flag", Dtype::Contains).with_values(["Y", "N"]),
            ColumnSpec::new("score", Dtype::Number).with_range(1.0, 10.0),
            ColumnSpec::new("joined", Dtype::Date).with_dates(date(2020, 1, 1), date(2020, 12, 31)),
        ],
    );

    let validated = validate_table(&spec, &ValidationLimits::default()).expect("valid table");
    assert!(validated.warnings.is_empty());
}

#[test]
fn rejects_inverted_numeric_range() {
    let spec = TableSpec::new(
        "t",
        5,
        vec![ColumnSpec::new("n", Dtype::Number).with_range(10.0, 5.0)],
    );

    let report = validate_table(&spec, &ValidationLimits::default()).unwrap_err();
    assert_eq!(codes(&report), vec!["invalid_range"]);
    assert_eq!(report.errors[0].path, "/columns/0/max");
    assert_eq!(report.errors[0].severity, IssueSeverity::Error);
}

#[test]
fn rejects_inverted_date_range() {
    let spec = TableSpec::new(
        "t",
        5,
        vec![ColumnSpec::new("d", Dtype::Date).with_dates(date(2024, 6, 1), date(2024, 1, 1))],
    );

    let report = validate_table(&spec, &ValidationLimits::default()).unwrap_err();
    assert_eq!(codes(&report), vec!["invalid_date_range"]);
}

#[test]
fn rejects_empty_domain_only_when_not_nullable() {
    let strict = TableSpec::new("t", 5, vec![ColumnSpec::new("c", Dtype::Contains)]);
    let report = validate_table(&strict, &ValidationLimits::default()).unwrap_err();
    assert_eq!(codes(&report), vec!["empty_domain"]);

    let lenient = TableSpec::new(
        "t",
        5,
        vec![ColumnSpec::new("c", Dtype::Contains).with_nulls(20)],
    );
    assert!(validate_table(&lenient, &ValidationLimits::default()).is_ok());
}

#[test]
fn custom_columns_always_need_examples() {
    let spec = TableSpec::new(
        "t",
        5,
        vec![ColumnSpec::new("c", Dtype::Custom).with_nulls(50)],
    );
    let report = validate_table(&spec, &ValidationLimits::default()).unwrap_err();
    assert_eq!(codes(&report), vec!["empty_custom_examples"]);
}

#[test]
fn accumulates_every_violation() {
    let spec = TableSpec::new(
        "",
        0,
        vec![
            ColumnSpec::new("a", Dtype::Float).with_range(3.0, 1.0),
            ColumnSpec::new("a", Dtype::Contains),
            ColumnSpec::new("", Dtype::Name),
            ColumnSpec::new("age", Dtype::Age).with_range(1.2, 1.8),
        ],
    );

    let report = validate_table(&spec, &ValidationLimits::default()).unwrap_err();
    let found = codes(&report);
    for expected in [
        "empty_table_name",
        "row_count_out_of_bounds",
        "invalid_range",
        "duplicate_column_name",
        "empty_domain",
        "empty_column_name",
        "no_integer_in_range",
    ] {
        assert!(found.contains(&expected), "missing {expected} in {found:?}");
    }
}

#[test]
fn row_ceiling_is_configurable() {
    let spec = TableSpec::new("t", 2_000, vec![ColumnSpec::new("id", Dtype::Index)]);

    assert!(validate_table(&spec, &ValidationLimits::default()).is_ok());

    let report = validate_table(&spec, &ValidationLimits { max_rows: 1_000 }).unwrap_err();
    assert_eq!(codes(&report), vec!["row_count_out_of_bounds"]);
}

#[test]
fn default_ranges_apply_to_half_open_bounds() {
    let mut column = ColumnSpec::new("rating", Dtype::Ratings);
    column.min = Some(6.0);
    let spec = TableSpec::new("t", 1, vec![column]);

    let report = validate_table(&spec, &ValidationLimits::default()).unwrap_err();
    assert_eq!(codes(&report), vec!["invalid_range"]);
}

#[test]
fn rejects_out_of_range_null_percentage_and_bad_table_name() {
    let mut column = ColumnSpec::new("n", Dtype::Name).with_nulls(0);
    column.null_percentage = 101;
    let spec = TableSpec::new("reports/2024", 1, vec![column]);

    let report = validate_table(&spec, &ValidationLimits::default()).unwrap_err();
    assert_eq!(
        codes(&report),
        vec!["invalid_table_name", "null_percentage_out_of_range"]
    );
}

#[test]
fn warns_about_ignored_settings() {
    let mut ignored_nulls = ColumnSpec::new("city", Dtype::City);
    ignored_nulls.null_percentage = 30;
    let mut stray_range = ColumnSpec::new("email", Dtype::Email);
    stray_range.min = Some(1.0);
    let spec = TableSpec::new(
        "t",
        4,
        vec![
            ColumnSpec::new("id", Dtype::Index).with_nulls(10),
            ignored_nulls,
            stray_range,
        ],
    );

    let validated = validate_table(&spec, &ValidationLimits::default()).expect("valid table");
    let warnings: Vec<_> = validated
        .warnings
        .iter()
        .map(|issue| (issue.code.as_str(), issue.path.as_str()))
        .collect();
    assert_eq!(
        warnings,
        vec![
            ("nullable_index_ignored", "/columns/0/nullable"),
            ("null_percentage_ignored", "/columns/1/null_percentage"),
            ("unused_parameter", "/columns/2/min"),
        ]
    );
}

#[test]
fn validation_does_not_mutate_spec() {
    let spec = TableSpec::new(
        "t",
        0,
        vec![ColumnSpec::new("n", Dtype::Number).with_range(9.0, 1.0)],
    );
    let before = spec.clone();
    let _ = validate_table(&spec, &ValidationLimits::default());
    assert_eq!(spec, before);
}

#[test]
fn rejects_real_range_wider_than_f64() {
    let spec = TableSpec::new(
        "t",
        5,
        vec![ColumnSpec::new("x", Dtype::Float).with_range(-1e308, 1e308)],
    );

    let report = validate_table(&spec, &ValidationLimits::default()).unwrap_err();
    assert_eq!(codes(&report), vec!["range_too_wide"]);
    assert_eq!(report.errors[0].path, "/columns/0/max");
}

#[test]
fn rejects_integer_bounds_outside_i64() {
    for (min, max) in [(1e19, 2e19), (-1e19, 0.0), (0.0, 9_223_372_036_854_775_808.0)] {
        let spec = TableSpec::new(
            "t",
            5,
            vec![ColumnSpec::new("n", Dtype::Number).with_range(min, max)],
        );
        let report = validate_table(&spec, &ValidationLimits::default()).unwrap_err();
        assert_eq!(codes(&report), vec!["integer_out_of_range"], "{min}..{max}");
    }

    let widest = TableSpec::new(
        "t",
        5,
        vec![ColumnSpec::new("n", Dtype::Number).with_range(-9.2e18, 9.2e18)],
    );
    assert!(validate_table(&widest, &ValidationLimits::default()).is_ok());
}

#[test]
fn warns_when_real_range_has_no_value_at_precision() {
    let spec = TableSpec::new(
        "t",
        5,
        vec![
            ColumnSpec::new("tiny", Dtype::Float).with_range(0.001, 0.004),
            ColumnSpec::new("ok", Dtype::Float).with_range(0.001, 0.5),
            ColumnSpec::new("stars", Dtype::Ratings).with_range(4.01, 4.09),
        ],
    );

    let validated = validate_table(&spec, &ValidationLimits::default()).expect("warnings only");
    let warned: Vec<_> = validated
        .warnings
        .iter()
        .map(|issue| (issue.code.as_str(), issue.path.as_str()))
        .collect();
    assert_eq!(
        warned,
        vec![
            ("range_below_precision", "/columns/0/min"),
            ("range_below_precision", "/columns/2/min"),
        ]
    );
}
