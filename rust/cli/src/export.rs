//! Writers for simulation output: per-card rows as CSV, JSON, JSONL or SQLite,
//! and the aggregate report as JSON.

use std::io::Write;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use clap::ValueEnum;
use serde::Serialize;

use draftsim_engine::records::{write_jsonl, CardRow};
use draftsim_engine::stats::AggregateReport;

use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RowsFormat {
    Csv,
    Json,
    Jsonl,
    Sqlite,
}

pub fn export_rows(rows: &[CardRow], output: &str, format: RowsFormat) -> Result<(), CliError> {
    prepare_output(output)?;
    match format {
        RowsFormat::Csv => export_csv(rows, output),
        RowsFormat::Json => export_json(rows, output),
        RowsFormat::Jsonl => export_jsonl(rows, output),
        RowsFormat::Sqlite => export_sqlite(rows, output),
    }
}

fn prepare_output(output: &str) -> Result<(), CliError> {
    ensure_parent_dir(Path::new(output)).map_err(|e| CliError::Io(std::io::Error::other(e)))
}

fn create_file(output: &str) -> Result<std::io::BufWriter<std::fs::File>, CliError> {
    std::fs::File::create(output)
        .map(std::io::BufWriter::new)
        .map_err(|e| write_failed(output, e))
}

fn write_failed(output: &str, e: std::io::Error) -> CliError {
    CliError::Io(std::io::Error::new(
        e.kind(),
        format!("failed to write {}: {}", output, e),
    ))
}

/// Quotes a CSV field when it contains a separator, quote or line break.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

const CSV_HEADER: &str =
    "trial,archetype,card_id,card_name,mana_value,colors,type_line,primary_type,rarity";

fn export_csv(rows: &[CardRow], output: &str) -> Result<(), CliError> {
    let mut w = create_file(output)?;
    writeln!(w, "{}", CSV_HEADER)?;
    for row in rows {
        writeln!(
            w,
            "{},{},{},{},{},{},{},{},{}",
            row.trial,
            row.archetype,
            csv_field(&row.card_id),
            csv_field(&row.card_name),
            row.mana_value,
            row.colors,
            csv_field(&row.type_line),
            row.primary_type,
            row.rarity
        )?;
    }
    w.flush()?;
    Ok(())
}

fn export_json(rows: &[CardRow], output: &str) -> Result<(), CliError> {
    let s = serde_json::to_string_pretty(rows).map_err(std::io::Error::other)?;
    std::fs::write(output, s).map_err(|e| write_failed(output, e))
}

fn export_jsonl(rows: &[CardRow], output: &str) -> Result<(), CliError> {
    let mut w = create_file(output)?;
    write_jsonl(&mut w, rows)?;
    Ok(())
}

fn export_sqlite(rows: &[CardRow], output: &str) -> Result<(), CliError> {
    enum ExportAttemptError {
        Busy(String),
        Fatal(String),
    }

    fn sqlite_busy(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(info, _)
                if matches!(
                    info.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                )
        )
    }

    fn classify(context: &str) -> impl Fn(rusqlite::Error) -> ExportAttemptError + '_ {
        move |e| {
            if sqlite_busy(&e) {
                ExportAttemptError::Busy(format!("{}: {}", context, e))
            } else {
                ExportAttemptError::Fatal(format!("Failed to {}: {}", context, e))
            }
        }
    }

    fn export_sqlite_attempt(rows: &[CardRow], output: &str) -> Result<(), ExportAttemptError> {
        let mut conn = rusqlite::Connection::open(output).map_err(classify("open database"))?;
        let tx = conn
            .transaction()
            .map_err(classify("start transaction"))?;

        tx.execute("DROP TABLE IF EXISTS card_rows", [])
            .map_err(classify("reset schema"))?;
        tx.execute(
            "CREATE TABLE card_rows (
                trial INTEGER NOT NULL,
                archetype TEXT NOT NULL,
                card_id TEXT NOT NULL,
                card_name TEXT NOT NULL,
                mana_value INTEGER NOT NULL,
                colors TEXT NOT NULL,
                type_line TEXT NOT NULL,
                primary_type TEXT NOT NULL,
                rarity TEXT NOT NULL
            )",
            [],
        )
        .map_err(classify("create schema"))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO card_rows (trial, archetype, card_id, card_name, mana_value,
                        colors, type_line, primary_type, rarity)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )
                .map_err(classify("prepare insert"))?;

            for row in rows {
                stmt.execute(rusqlite::params![
                    row.trial as i64,
                    &row.archetype,
                    &row.card_id,
                    &row.card_name,
                    row.mana_value,
                    row.colors.to_string(),
                    &row.type_line,
                    row.primary_type.as_str(),
                    row.rarity.as_str(),
                ])
                .map_err(classify("insert row"))?;
            }
        }

        tx.commit().map_err(classify("commit export"))?;
        Ok(())
    }

    let backoff_ms: u64 = std::env::var("DRAFTSIM_SQLITE_BACKOFF_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(100);
    let max_attempts: u32 = std::env::var("DRAFTSIM_SQLITE_MAX_ATTEMPTS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(20)
        .max(1);

    let mut attempt = 1;
    loop {
        match export_sqlite_attempt(rows, output) {
            Ok(()) => return Ok(()),
            Err(ExportAttemptError::Busy(msg)) if attempt < max_attempts => {
                tracing::debug!(attempt, %msg, "sqlite busy, backing off");
                std::thread::sleep(std::time::Duration::from_millis(
                    backoff_ms * u64::from(attempt),
                ));
                attempt += 1;
            }
            Err(ExportAttemptError::Busy(msg)) => {
                return Err(CliError::Io(std::io::Error::other(format!(
                    "SQLite busy after {} attempt(s): {}",
                    attempt, msg
                ))));
            }
            Err(ExportAttemptError::Fatal(msg)) => {
                return Err(CliError::Io(std::io::Error::other(msg)));
            }
        }
    }
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    generated_at: String,
    set_code: &'a str,
    base_seed: u64,
    #[serde(flatten)]
    report: &'a AggregateReport,
}

/// Writes the aggregate report as pretty JSON with run metadata.
pub fn export_report(
    report: &AggregateReport,
    set_code: &str,
    base_seed: u64,
    output: &str,
) -> Result<(), CliError> {
    prepare_output(output)?;
    let doc = ReportDocument {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        set_code,
        base_seed,
        report,
    };
    let s = serde_json::to_string_pretty(&doc).map_err(std::io::Error::other)?;
    std::fs::write(output, s).map_err(|e| write_failed(output, e))
}
