use std::fs::{OpenOptions, create_dir_all};
use std::path::PathBuf;
use std::process::Command;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use synthtab_core::SessionConfig;
use synthtab_generate::{GenerationReport, LocaleKey};

use crate::workspace::write_json_atomic;

use super::RegistryResult;

/// Resolved options recorded with each run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSettings {
    pub seed: Option<u64>,
    pub locale: LocaleKey,
    pub base_date: NaiveDate,
    pub max_rows: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_name: Option<String>,
}

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub run_dir: PathBuf,
    pub source: PathBuf,
    pub settings: RunSettings,
}

/// JSON config written to each run directory; table specs only, no rows.
#[derive(Debug, Serialize)]
struct RunConfig<'a> {
    run_id: &'a str,
    started_at: String,
    source: String,
    tool_version: &'static str,
    settings: &'a RunSettings,
    git: GitInfo,
    session: &'a SessionConfig,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub logs_path: PathBuf,
    pub report_path: PathBuf,
    pub tables_dir: PathBuf,
}

impl RunPaths {
    fn new(root: PathBuf) -> Self {
        Self {
            config_path: root.join("config.json"),
            logs_path: root.join("logs.ndjson"),
            report_path: root.join("generation_report.json"),
            tables_dir: root.join("tables"),
            root,
        }
    }

    pub fn table_path(&self, file_stem: &str) -> PathBuf {
        self.tables_dir.join(format!("{file_stem}.csv"))
    }

    pub fn archive_path(&self, archive_name: &str) -> PathBuf {
        self.root.join(archive_name)
    }
}

/// Create `<run_dir>/<timestamp>__run_<id>/` with its config and an empty log.
pub fn start_run(ctx: &RunContext, session: &SessionConfig) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let paths = RunPaths::new(
        ctx.run_dir
            .join(format!("{timestamp}__run_{}", ctx.run_id)),
    );

    create_dir_all(&paths.tables_dir)?;

    let config = RunConfig {
        run_id: &ctx.run_id,
        started_at: ctx.started_at.to_rfc3339(),
        source: ctx.source.display().to_string(),
        tool_version: env!("CARGO_PKG_VERSION"),
        settings: &ctx.settings,
        git: collect_git_info(),
        session,
    };
    write_json_atomic(&paths.config_path, &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.logs_path)?;

    Ok(paths)
}

pub fn write_report(paths: &RunPaths, report: &GenerationReport) -> RegistryResult<()> {
    write_json_atomic(&paths.report_path, report)?;
    Ok(())
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthtab_core::TableSpec;

    fn context(run_dir: PathBuf) -> RunContext {
        RunContext {
            run_id: "abc".to_string(),
            started_at: DateTime::parse_from_rfc3339("2024-03-05T10:20:30Z")
                .expect("timestamp")
                .with_timezone(&Utc),
            run_dir,
            source: PathBuf::from("table_config.json"),
            settings: RunSettings {
                seed: Some(9),
                locale: LocaleKey::EnUs,
                base_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
                max_rows: 100,
                archive_name: None,
            },
        }
    }

    #[test]
    fn run_directory_layout() {
        let run_dir = std::env::temp_dir().join(format!("synthtab_runs_{}", uuid::Uuid::new_v4()));
        let mut session = SessionConfig::new();
        session.insert("customers", TableSpec::starter("Customers"));

        let paths = start_run(&context(run_dir.clone()), &session).expect("start run");

        assert_eq!(paths.root, run_dir.join("2024-03-05T10-20-30Z__run_abc"));
        assert!(paths.tables_dir.is_dir());
        assert!(paths.logs_path.is_file());
        assert_eq!(paths.table_path("Customers"), paths.tables_dir.join("Customers.csv"));

        let raw = std::fs::read_to_string(&paths.config_path).expect("config written");
        let config: serde_json::Value = serde_json::from_str(&raw).expect("config json");
        assert_eq!(config["run_id"], "abc");
        assert_eq!(config["settings"]["locale"], "en_US");
        assert_eq!(config["session"]["customers"]["name"], "Customers");
        assert_eq!(config["session"]["customers"]["rows"], 10);
    }
}
