mod registry;
mod workspace;

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use uuid::Uuid;

use registry::{
    RunContext, RunSettings, init_console_logging, init_run_logging, start_run, write_report,
};
use synthtab_core::{
    DomainPreset, Error as CoreError, ValidationLimits, ValidationReport, load_session,
    session_json_schema_value, validate_session,
};
use synthtab_generate::{
    GenerateOptions, GenerationEngine, GenerationError, GenerationSession, GeneratorRegistry,
    LocaleKey, write_archive, write_table_csv,
};
use workspace::{
    DEFAULT_SETTINGS_FILE, load_or_create_settings, load_settings, write_bytes_atomic,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("workspace error: {0}")]
    Workspace(#[from] workspace::WorkspaceError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{failed} of {total} table(s) were not generated")]
    Incomplete { failed: usize, total: usize },
}

#[derive(Parser, Debug)]
#[command(name = "synthtab", version, about = "Synthetic tabular data generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate every table of a session config into a new run directory.
    Generate(GenerateArgs),
    /// Check a session config and print every issue.
    Validate(ValidateArgs),
    /// Write a starter session config.
    Init(InitArgs),
    /// List supported dtypes and the parameters they read.
    Dtypes,
    /// Print the JSON Schema of session configs.
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Session config JSON.
    #[arg(long, value_name = "FILE")]
    config: PathBuf,
    /// Directory that receives run directories.
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Session seed; drawn at random and reported when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Faker locale (en_US or pt_BR).
    #[arg(long)]
    locale: Option<LocaleKey>,
    /// Upper bound for a table's row count.
    #[arg(long)]
    max_rows: Option<u64>,
    /// Reference date for open date ranges (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    base_date: Option<NaiveDate>,
    /// Also bundle every generated table into a ZIP archive.
    #[arg(long, default_value_t = false)]
    archive: bool,
    /// Tool settings file.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Session config JSON.
    #[arg(long, value_name = "FILE")]
    config: PathBuf,
    /// Upper bound for a table's row count.
    #[arg(long)]
    max_rows: Option<u64>,
    /// Print the report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Tool settings file.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,
}

#[derive(Args, Debug)]
struct InitArgs {
    /// Where to write the starter config.
    #[arg(long, default_value = "table_config.json")]
    out: PathBuf,
    /// Number of starter tables.
    #[arg(long, default_value_t = 1, conflicts_with = "preset")]
    tables: usize,
    /// Start from a domain table (retail, hr, supply_chain).
    #[arg(long)]
    preset: Option<DomainPreset>,
    /// Preset columns to keep, comma separated; all when omitted.
    #[arg(long, value_delimiter = ',', requires = "preset")]
    columns: Vec<String>,
    /// Preset row count; the lower domain bound when omitted.
    #[arg(long, requires = "preset")]
    rows: Option<u64>,
    /// Overwrite an existing file.
    #[arg(long, default_value_t = false)]
    force: bool,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Write the schema to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Validate(args) => {
            init_console_logging()?;
            run_validate(args)
        }
        Command::Init(args) => {
            init_console_logging()?;
            run_init(args)
        }
        Command::Dtypes => run_dtypes(),
        Command::Schema(args) => run_schema(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let settings = load_or_create_settings(&args.settings)?;

    let raw = std::fs::read_to_string(&args.config)?;
    let config = load_session(&raw).map_err(|report| rejected(&report))?;

    let limits = ValidationLimits {
        max_rows: args.max_rows.unwrap_or(settings.max_rows),
    };
    let archive_name =
        (args.archive || settings.write_archive).then(|| settings.archive_name.clone());
    let run_settings = RunSettings {
        seed: args.seed.or(settings.default_seed),
        locale: args.locale.unwrap_or(settings.default_locale),
        base_date: args.base_date.unwrap_or_else(|| Utc::now().date_naive()),
        max_rows: limits.max_rows,
        archive_name,
    };

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: Utc::now(),
        run_dir: args.out_dir.unwrap_or_else(|| settings.out_dir.clone()),
        source: args.config.clone(),
        settings: run_settings.clone(),
    };

    let run_paths = start_run(&run_ctx, &config)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        config = %args.config.display(),
        tables = config.len()
    );

    let timer = Instant::now();
    let options = GenerateOptions {
        seed: run_settings.seed,
        run_id: Some(run_id.clone()),
        base_date: run_settings.base_date,
        locale: run_settings.locale,
        limits,
    };
    let session = GenerationSession::from_config(config);
    let outcome = GenerationEngine::new(options).generate_session(&session);

    let mut stems = HashSet::new();
    for table_outcome in &outcome.tables {
        let Ok(table) = &table_outcome.result else {
            continue;
        };
        let stem = if stems.insert(table.name.clone()) {
            table.name.clone()
        } else {
            format!("{}__{}", table.name, table_outcome.id)
        };
        let path = run_paths.table_path(&stem);
        let bytes = write_table_csv(&path, table).map_err(GenerationError::from)?;
        tracing::info!(
            event = "table_written",
            table = %table.name,
            rows = table.row_count(),
            bytes,
            path = %path.display()
        );
    }

    write_report(&run_paths, &outcome.report)?;
    tracing::info!(event = "report_written", path = %run_paths.report_path.display());

    if let Some(archive_name) = &run_settings.archive_name {
        if outcome.generated().next().is_some() {
            let path = run_paths.archive_path(archive_name);
            let bytes = write_archive(&path, outcome.generated())?;
            tracing::info!(event = "archive_written", bytes, path = %path.display());
        } else {
            tracing::warn!(event = "archive_skipped", reason = "no table was generated");
        }
    }

    for table in &outcome.report.tables {
        println!(
            "{:<24} {:<10} {:>8} row(s)",
            table.id,
            table.status.as_str(),
            table.rows_generated
        );
        for issue in &table.errors {
            println!("  error   {} {}: {}", issue.code, issue.path, issue.message);
        }
        if let Some(message) = &table.message {
            println!("  {message}");
        }
    }
    println!("seed: {}", outcome.report.seed);
    println!("run directory: {}", run_paths.root.display());

    let total = outcome.report.tables.len();
    let failed = total - outcome.generated().count();
    let duration_ms = timer.elapsed().as_millis();

    if outcome.report.is_complete() {
        tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);
        Ok(())
    } else {
        tracing::warn!(event = "run_finished", status = "partial", failed, duration_ms = duration_ms);
        Err(CliError::Incomplete { failed, total })
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let settings = load_settings(&args.settings)?;
    let limits = ValidationLimits {
        max_rows: args.max_rows.unwrap_or(settings.max_rows),
    };

    let raw = std::fs::read_to_string(&args.config)?;
    let report = match load_session(&raw) {
        Ok(config) => validate_session(&config, &limits),
        Err(report) => report,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).map_err(CoreError::from)?);
    } else {
        print_report(&report);
    }

    tracing::info!(
        event = "config_validated",
        config = %args.config.display(),
        errors = report.errors.len(),
        warnings = report.warnings.len()
    );

    if report.is_ok() {
        Ok(())
    } else {
        Err(CliError::InvalidConfig(format!(
            "{} error(s) in {}",
            report.errors.len(),
            args.config.display()
        )))
    }
}

fn run_init(args: InitArgs) -> Result<(), CliError> {
    if args.tables == 0 {
        return Err(CliError::InvalidConfig(
            "--tables must be at least 1".to_string(),
        ));
    }
    if args.out.exists() && !args.force {
        return Err(CliError::InvalidConfig(format!(
            "{} already exists; pass --force to overwrite",
            args.out.display()
        )));
    }

    let mut session = GenerationSession::new();
    match args.preset {
        Some(preset) => {
            let table = preset.table(&args.columns, args.rows)?;
            session.insert(preset.as_str(), table);
        }
        None => {
            for _ in 0..args.tables {
                session.add_table();
            }
        }
    }
    let encoded = session.to_config().to_json_pretty()?;
    write_bytes_atomic(&args.out, encoded.as_bytes())?;

    tracing::info!(
        event = "config_initialized",
        path = %args.out.display(),
        tables = session.len(),
        preset = args.preset.map(DomainPreset::as_str)
    );
    println!("wrote {} table(s) to {}", session.len(), args.out.display());
    Ok(())
}

fn run_dtypes() -> Result<(), CliError> {
    let registry = GeneratorRegistry::new();
    for (dtype, generator) in registry.entries() {
        let family = dtype.family();
        let parameters = if family.parameters().is_empty() {
            "-".to_string()
        } else {
            family.parameters().join(", ")
        };
        let defaults = dtype
            .default_range()
            .map(|(min, max)| format!("default {min}..={max}"))
            .unwrap_or_default();
        println!("{:<16} {:<26} {:<22} {defaults}", dtype.as_str(), generator, parameters);
    }
    Ok(())
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    let schema = session_json_schema_value()?;
    let encoded = serde_json::to_string_pretty(&schema).map_err(CoreError::from)?;
    match args.out {
        Some(path) => write_bytes_atomic(&path, encoded.as_bytes())?,
        None => println!("{encoded}"),
    }
    Ok(())
}

fn print_report(report: &ValidationReport) {
    for issue in &report.errors {
        println!("error   {:<30} {:<32} {}", issue.code, issue.path, issue.message);
        if let Some(hint) = &issue.hint {
            println!("        hint: {hint}");
        }
    }
    for issue in &report.warnings {
        println!("warning {:<30} {:<32} {}", issue.code, issue.path, issue.message);
    }
    println!(
        "{} error(s), {} warning(s)",
        report.errors.len(),
        report.warnings.len()
    );
}

fn rejected(report: &ValidationReport) -> CliError {
    print_report(report);
    CliError::InvalidConfig("session config failed structural validation".to_string())
}
