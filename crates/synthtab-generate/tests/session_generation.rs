use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use synthtab_core::{ColumnSpec, Dtype, TableSpec};
use synthtab_generate::{
    GenerateOptions, GenerationEngine, GenerationSession, TableStatus,
};

fn seeded_engine(seed: u64) -> GenerationEngine {
    GenerationEngine::new(GenerateOptions {
        seed: Some(seed),
        ..GenerateOptions::default()
    })
}

fn customers() -> TableSpec {
    TableSpec::new(
        "Customers",
        12,
        vec![
            ColumnSpec::new("index", Dtype::Index),
            ColumnSpec::new("name", Dtype::Name).with_nulls(25),
            ColumnSpec::new("email", Dtype::Email),
        ],
    )
}

fn orders() -> TableSpec {
    TableSpec::new(
        "Orders",
        7,
        vec![
            ColumnSpec::new("index", Dtype::Index),
            ColumnSpec::new("total", Dtype::Float).with_range(1.0, 99.0),
            ColumnSpec::new("status", Dtype::Contains).with_values(["open", "closed"]),
        ],
    )
}

#[test]
fn invalid_table_does_not_block_siblings() {
    let mut session = GenerationSession::new();
    session.insert("customers", customers());
    session.insert(
        "broken",
        TableSpec::new(
            "Broken",
            3,
            vec![ColumnSpec::new("n", Dtype::Number).with_range(10.0, 5.0)],
        ),
    );
    session.insert("orders", orders());

    let outcome = seeded_engine(1).generate_session(&session);

    let statuses: Vec<_> = outcome.tables.iter().map(|table| table.status()).collect();
    assert_eq!(
        statuses,
        vec![
            TableStatus::Generated,
            TableStatus::Invalid,
            TableStatus::Generated
        ]
    );

    let broken = &outcome.report.tables[1];
    assert_eq!(broken.rows_generated, 0);
    assert_eq!(broken.errors[0].code, "invalid_range");
    assert_eq!(broken.errors[0].path, "/broken/columns/0/max");

    assert_eq!(outcome.report.rows_total, 19);
    assert!(!outcome.report.is_complete());
    assert_eq!(outcome.generated().count(), 2);
}

#[test]
fn sibling_edits_do_not_change_other_tables() {
    let mut session = GenerationSession::new();
    session.insert("customers", customers());
    session.insert("orders", orders());
    let before = seeded_engine(99).generate_session(&session);

    session.spec_mut("orders").expect("orders").row_count = 40;
    let after = seeded_engine(99).generate_session(&session);

    let customers_before = before.tables[0].result.as_ref().expect("customers");
    let customers_after = after.tables[0].result.as_ref().expect("customers");
    assert_eq!(customers_before, customers_after);
    assert_eq!(
        after.tables[1].result.as_ref().expect("orders").row_count(),
        40
    );
}

#[test]
fn report_tracks_usage_nulls_and_seed() {
    let mut session = GenerationSession::new();
    session.insert("customers", customers());

    let outcome = seeded_engine(5).generate_session(&session);
    let report = &outcome.report;

    assert_eq!(report.seed, 5);
    assert_eq!(report.generator_usage.get("primitive.index"), Some(&12));
    assert_eq!(report.generator_usage.get("derive.email_from_name"), Some(&12));

    let table = &report.tables[0];
    let name_nulls = table.null_counts["name"];
    assert_eq!(
        report.generator_usage.get("faker.name").copied().unwrap_or(0),
        12 - name_nulls
    );
    assert_eq!(table.null_counts["index"], 0);

    let json = serde_json::to_value(report).expect("serialize report");
    assert_eq!(json["tables"][0]["status"], "generated");
}

#[test]
fn outcome_is_stored_back_into_session() {
    let mut session = GenerationSession::new();
    let id = session.add_table();
    session.insert("orders", orders());

    let outcome = seeded_engine(3).generate_session(&session);
    outcome.store_in(&mut session);

    assert_eq!(session.generated_tables().count(), 2);
    let starter = session.get(&id).and_then(|table| table.generated.as_ref());
    assert_eq!(starter.map(|table| table.row_count()), Some(10));
}

#[test]
fn cancelled_session_marks_every_table() {
    let mut session = GenerationSession::new();
    session.insert("customers", customers());
    session.insert("orders", orders());

    let engine = seeded_engine(1).with_cancel_flag(Arc::new(AtomicBool::new(true)));
    let outcome = engine.generate_session(&session);

    assert!(
        outcome
            .tables
            .iter()
            .all(|table| table.status() == TableStatus::Cancelled)
    );
    assert_eq!(outcome.generated().count(), 0);
}
