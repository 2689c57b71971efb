use std::env;
use std::path::PathBuf;

use synthtab_core::load_session;
use synthtab_generate::{GenerateOptions, GenerationEngine, GenerationSession, write_table_csv};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut config_path: Option<PathBuf> = None;
    let mut out_dir = PathBuf::from("out");
    let mut seed: Option<u64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = args.next().map(PathBuf::from),
            "--out" => {
                if let Some(value) = args.next() {
                    out_dir = PathBuf::from(value);
                }
            }
            "--seed" => seed = args.next().and_then(|value| value.parse().ok()),
            _ => {
                if config_path.is_none() {
                    config_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let config_path = config_path.ok_or("missing --config path")?;
    let raw = std::fs::read_to_string(&config_path)?;
    let config = load_session(&raw).map_err(|report| {
        format!("config has {} structural error(s)", report.errors.len())
    })?;

    let options = GenerateOptions {
        seed,
        ..GenerateOptions::default()
    };
    let engine = GenerationEngine::new(options);
    let session = GenerationSession::from_config(config);
    let outcome = engine.generate_session(&session);

    std::fs::create_dir_all(&out_dir)?;
    for table in outcome.generated() {
        let path = out_dir.join(format!("{}.csv", table.name));
        let bytes = write_table_csv(&path, table)?;
        println!("{} ({bytes} bytes)", path.display());
    }
    for table in &outcome.report.tables {
        if let Some(message) = &table.message {
            eprintln!("{}: {message}", table.name);
        }
        for issue in &table.errors {
            eprintln!("{}: {} at {}: {}", table.name, issue.code, issue.path, issue.message);
        }
    }

    println!("seed={}", outcome.report.seed);
    Ok(())
}
