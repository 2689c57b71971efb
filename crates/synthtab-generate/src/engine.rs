use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use synthtab_core::{
    DEFAULT_MAX_ROWS, TableSpec, ValidatedTable, ValidationIssue, validate_table,
};

use crate::errors::GenerationError;
use crate::generators::GeneratorRegistry;
use crate::model::{GenerateOptions, GeneratedTable, GenerationReport, TableReport, TableStatus};
use crate::row::RowGenerator;
use crate::session::GenerationSession;

/// Result of generating one table of a session.
#[derive(Debug)]
pub struct TableOutcome {
    pub id: String,
    pub result: Result<GeneratedTable, GenerationError>,
}

impl TableOutcome {
    pub fn status(&self) -> TableStatus {
        match &self.result {
            Ok(_) => TableStatus::Generated,
            Err(GenerationError::Validation(_)) => TableStatus::Invalid,
            Err(GenerationError::Cancelled { .. }) => TableStatus::Cancelled,
            Err(_) => TableStatus::Failed,
        }
    }
}

/// Result of a session run: one outcome per table plus the run report.
#[derive(Debug)]
pub struct SessionOutcome {
    pub tables: Vec<TableOutcome>,
    pub report: GenerationReport,
}

impl SessionOutcome {
    pub fn generated(&self) -> impl Iterator<Item = &GeneratedTable> {
        self.tables
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
    }

    /// Store every generated table in the session it came from.
    pub fn store_in(&self, session: &mut GenerationSession) {
        for outcome in &self.tables {
            if let Ok(table) = &outcome.result {
                session.set_generated(&outcome.id, table.clone());
            }
        }
    }
}

/// Entry point for generating tables from specs.
#[derive(Debug)]
pub struct GenerationEngine {
    registry: GeneratorRegistry,
    options: GenerateOptions,
    cancel: Option<Arc<AtomicBool>>,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self::with_registry(GeneratorRegistry::new(), options)
    }

    pub fn with_registry(registry: GeneratorRegistry, options: GenerateOptions) -> Self {
        Self {
            registry,
            options,
            cancel: None,
        }
    }

    /// Stop between rows once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Validate `spec`, then generate its rows in order.
    ///
    /// Validation failures return every issue and no rows.
    pub fn generate_table(
        &self,
        spec: &TableSpec,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedTable, GenerationError> {
        let validated =
            validate_table(spec, &self.options.limits).map_err(GenerationError::Validation)?;
        for issue in &validated.warnings {
            debug!(table = %spec.name, code = %issue.code, path = %issue.path, "validation warning");
        }
        self.generate_validated(&validated, rng)
    }

    /// Generate a table with an RNG derived from the session seed and `id`.
    pub fn generate_table_seeded(
        &self,
        id: &str,
        spec: &TableSpec,
        seed: u64,
    ) -> Result<GeneratedTable, GenerationError> {
        let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(seed, id));
        self.generate_table(spec, &mut rng)
    }

    /// Generate every table of a session independently.
    ///
    /// Each table gets its own RNG seeded from the session seed and its id,
    /// so a failing or edited sibling never changes another table's output.
    pub fn generate_session(&self, session: &GenerationSession) -> SessionOutcome {
        let start = Instant::now();
        let run_id = self
            .options
            .run_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let seed = self.options.seed.unwrap_or_else(rand::random);
        let mut report = GenerationReport::new(run_id.clone(), seed, &self.options);
        let mut tables = Vec::with_capacity(session.len());

        info!(
            run_id = %run_id,
            tables = session.len(),
            seed,
            locale = %self.options.locale,
            "generation started"
        );

        for table in session.tables() {
            let table_seed = hash_seed(seed, &table.id);
            let mut table_report = TableReport {
                id: table.id.clone(),
                name: table.spec.name.clone(),
                status: TableStatus::Generated,
                rows_requested: table.spec.row_count,
                rows_generated: 0,
                seed: table_seed,
                null_counts: BTreeMap::new(),
                errors: Vec::new(),
                message: None,
            };

            let result = if self.is_cancelled() {
                Err(GenerationError::Cancelled { rows_generated: 0 })
            } else {
                match validate_table(&table.spec, &self.options.limits) {
                    Err(validation) => Err(GenerationError::Validation(validation)),
                    Ok(validated) => {
                        for issue in &validated.warnings {
                            report.record_warning(prefixed(issue, &table.id));
                        }
                        let table_start = Instant::now();
                        info!(
                            table = %table.spec.name,
                            rows = table.spec.row_count,
                            "generating table"
                        );
                        let mut rng = ChaCha8Rng::seed_from_u64(table_seed);
                        let result = self.generate_validated(&validated, &mut rng);
                        if let Ok(generated) = &result {
                            info!(
                                table = %generated.name,
                                rows_generated = generated.row_count(),
                                duration_ms = table_start.elapsed().as_millis() as u64,
                                "table generated"
                            );
                        }
                        result
                    }
                }
            };

            let outcome = TableOutcome {
                id: table.id.clone(),
                result,
            };
            table_report.status = outcome.status();

            match &outcome.result {
                Ok(generated) => {
                    table_report.rows_generated = generated.row_count() as u64;
                    self.record_usage(&table.spec, generated, &mut table_report, &mut report);
                }
                Err(GenerationError::Validation(validation)) => {
                    warn!(
                        table = %table.spec.name,
                        errors = validation.errors.len(),
                        "table skipped: invalid spec"
                    );
                    table_report.errors = validation
                        .errors
                        .iter()
                        .map(|issue| prefixed(issue, &table.id))
                        .collect();
                    for issue in &validation.warnings {
                        report.record_warning(prefixed(issue, &table.id));
                    }
                }
                Err(err) => {
                    warn!(table = %table.spec.name, error = %err, "table failed");
                    if let GenerationError::Cancelled { rows_generated } = err {
                        table_report.rows_generated = *rows_generated;
                    }
                    table_report.message = Some(err.to_string());
                }
            }

            report.record_table(table_report);
            tables.push(outcome);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            tables = report.tables.len(),
            rows_total = report.rows_total,
            duration_ms = report.duration_ms,
            complete = report.is_complete(),
            "generation completed"
        );

        SessionOutcome { tables, report }
    }

    fn generate_validated(
        &self,
        validated: &ValidatedTable<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedTable, GenerationError> {
        let spec = validated.spec;
        let generator =
            RowGenerator::new(spec, &self.registry, self.options.base_date, self.options.locale);
        let capacity = usize::try_from(spec.row_count.min(DEFAULT_MAX_ROWS)).unwrap_or(0);
        let mut rows = Vec::with_capacity(capacity);

        for row_index in 1..=spec.row_count {
            if self.is_cancelled() {
                return Err(GenerationError::Cancelled {
                    rows_generated: row_index - 1,
                });
            }
            rows.push(generator.generate_row(row_index, rng)?);
        }

        Ok(GeneratedTable {
            name: spec.name.clone(),
            columns: spec.column_names(),
            rows,
        })
    }

    fn record_usage(
        &self,
        spec: &TableSpec,
        generated: &GeneratedTable,
        table_report: &mut TableReport,
        report: &mut GenerationReport,
    ) {
        for (idx, column) in spec.columns.iter().enumerate() {
            let nulls = generated
                .rows
                .iter()
                .filter(|row| row.values.get(idx).is_some_and(|value| value.is_null()))
                .count() as u64;
            table_report.null_counts.insert(column.name.clone(), nulls);

            if let Some(generator) = self.registry.get(column.dtype) {
                let produced = generated.rows.len() as u64 - nulls;
                report.record_generator_usage(generator.id(), produced);
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

fn prefixed(issue: &ValidationIssue, id: &str) -> ValidationIssue {
    let mut issue = issue.clone();
    let segment = id.replace('~', "~0").replace('/', "~1");
    issue.path = format!("/{segment}{}", issue.path);
    issue
}

/// Derive a per-table seed from the session seed and a key.
pub fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
