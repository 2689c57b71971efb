use synthtab_core::{
    Dtype, SessionConfig, TableSpec, ValidationLimits, load_session, session_json_schema_value,
    validate_session, validate_session_json,
};

const SESSION: &str = r#"{
  "Table_2": {
    "name": "Orders",
    "rows": 25,
    "columns": [
      {"name": "index", "dtype": "index", "null_percentage": 0},
      {"name": "total", "dtype": "float", "min": 5, "max": 500},
      {"name": "status", "dtype": "contains", "custom_values": "open, shipped, closed"}
    ],
    "metadata": null
  },
  "Table_1": {
    "name": "Customers",
    "rows": 10,
    "columns": [
      {"name": "index", "dtype": "index"},
      {"name": "name", "dtype": "name", "nullable": true, "null_percentage": 10},
      {"name": "email", "dtype": "email"},
      {"name": "since", "dtype": "date", "start_date": "2020-01-01", "end_date": "2023-12-31"}
    ]
  }
}"#;

#[test]
fn loads_document_in_written_order() {
    let config = load_session(SESSION).expect("session loads");

    let names: Vec<_> = config
        .tables
        .iter()
        .map(|entry| entry.spec.name.as_str())
        .collect();
    assert_eq!(names, vec!["Orders", "Customers"]);

    let orders = config.get("Table_2").expect("orders table");
    assert_eq!(orders.row_count, 25);
    assert_eq!(orders.columns[2].values, vec!["open", "shipped", "closed"]);
    assert_eq!(orders.columns[1].dtype, Dtype::Float);
}

#[test]
fn saved_document_is_schema_only_and_reloads() {
    let config = load_session(SESSION).expect("session loads");
    let saved = config.to_json_pretty().expect("serialize session");

    assert!(!saved.contains("metadata"));
    assert!(!saved.contains("\"data\""));

    let reloaded = SessionConfig::from_json_str(&saved).expect("reload session");
    assert_eq!(reloaded, config);
}

#[test]
fn structural_check_reports_instance_paths() {
    let raw = r#"{"t": {"rows": -3, "columns": [{"name": "x", "dtype": "uuid"}]}}"#;

    let report = load_session(raw).unwrap_err();
    assert!(report.errors.iter().all(|issue| issue.code == "schema_violation"));
    let paths: Vec<_> = report.errors.iter().map(|issue| issue.path.as_str()).collect();
    assert!(paths.contains(&"/t/rows"), "paths: {paths:?}");
    assert!(paths.contains(&"/t/columns/0/dtype"), "paths: {paths:?}");
}

#[test]
fn schema_accepts_aliases_and_legacy_keys() {
    let schema = session_json_schema_value().expect("session schema");
    let document = serde_json::json!({
        "t": {
            "rows": 2,
            "columns": [
                {"name": "r", "dtype": "rating"},
                {"name": "c", "dtype": "custom", "custom_examples": "a,b"}
            ]
        }
    });

    let report = validate_session_json(&document, &schema).expect("compile schema");
    assert!(report.is_ok(), "unexpected issues: {:?}", report.errors);
}

#[test]
fn session_validation_prefixes_paths_and_flags_name_collisions() {
    let mut config = SessionConfig::new();
    config.insert("a/b", TableSpec::starter("Same"));
    config.insert("second", TableSpec::new("Same", 0, Vec::new()));

    let report = validate_session(&config, &ValidationLimits::default());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].path, "/second/rows");
    let warnings: Vec<_> = report.warnings.iter().map(|issue| issue.code.as_str()).collect();
    assert_eq!(warnings, vec!["no_columns", "duplicate_table_name"]);

    let first = validate_session(
        &SessionConfig {
            tables: config.tables[..1].to_vec(),
        },
        &ValidationLimits::default(),
    );
    assert!(first.is_ok());
}

#[test]
fn rejects_malformed_json() {
    let report = load_session("{not json").unwrap_err();
    assert_eq!(report.errors[0].code, "invalid_json");
}
