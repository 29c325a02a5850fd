use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use super::batch::BatchState;
use crate::util::ensure_directory;

pub const SUMMARY_TOTAL: &str = "Total Companies";
pub const SUMMARY_PROCESSED: &str = "Processed";
pub const SUMMARY_DOWNLOADED: &str = "Downloaded";
pub const SUMMARY_FAILED: &str = "Failed";
pub const SUMMARY_UNPROCESSED: &str = "Unprocessed";

/// Writes the batch summary as a SQLite file with one table per sheet:
/// `summary`, `succeeded`, `failed` and `unprocessed`.
pub fn write_report(path: &Path, state: &BatchState) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("failed to replace report {}", path.display()))?;
    }

    let mut connection =
        Connection::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    ensure_report_schema(&connection)?;
    insert_report_rows(&mut connection, state)
        .with_context(|| format!("failed to write report {}", path.display()))
}

fn ensure_report_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS summary (
              metric TEXT PRIMARY KEY,
              value INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS succeeded (
              row_number INTEGER NOT NULL,
              company_name TEXT NOT NULL,
              input_date TEXT NOT NULL,
              charge_code TEXT,
              file_name TEXT NOT NULL,
              sha256 TEXT NOT NULL,
              source TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS failed (
              row_number INTEGER NOT NULL,
              company_name TEXT NOT NULL,
              input_date TEXT NOT NULL,
              reason TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS unprocessed (
              row_number INTEGER NOT NULL,
              company_name TEXT NOT NULL,
              input_date TEXT NOT NULL,
              reason TEXT NOT NULL
            );
            ",
        )
        .context("failed to create report schema")?;
    Ok(())
}

fn insert_report_rows(connection: &mut Connection, state: &BatchState) -> Result<()> {
    let counts = state.counts();
    let tx = connection.transaction()?;

    {
        let mut statement = tx.prepare("INSERT INTO summary(metric, value) VALUES(?1, ?2)")?;
        for (metric, value) in [
            (SUMMARY_TOTAL, counts.total),
            (SUMMARY_PROCESSED, counts.processed),
            (SUMMARY_DOWNLOADED, counts.downloaded),
            (SUMMARY_FAILED, counts.failed),
            (SUMMARY_UNPROCESSED, counts.unprocessed),
        ] {
            statement.execute(params![metric, value as i64])?;
        }

        let mut statement = tx.prepare(
            "
            INSERT INTO succeeded(
              row_number, company_name, input_date, charge_code, file_name, sha256, source
            )
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )?;
        for entry in &state.succeeded {
            statement.execute(params![
                entry.row_number as i64,
                &entry.company_name,
                &entry.input_date,
                &entry.charge_code,
                &entry.file_name,
                &entry.sha256,
                &entry.source
            ])?;
        }

        let mut statement = tx.prepare(
            "INSERT INTO failed(row_number, company_name, input_date, reason) VALUES(?1, ?2, ?3, ?4)",
        )?;
        for entry in &state.failed_rows {
            statement.execute(params![
                entry.row_number as i64,
                &entry.company_name,
                &entry.input_date,
                &entry.reason
            ])?;
        }

        let mut statement = tx.prepare(
            "INSERT INTO unprocessed(row_number, company_name, input_date, reason) VALUES(?1, ?2, ?3, ?4)",
        )?;
        for entry in &state.unprocessed {
            statement.execute(params![
                entry.row_number as i64,
                &entry.company_name,
                &entry.input_date,
                &entry.reason
            ])?;
        }
    }

    tx.commit()?;
    Ok(())
}

pub fn count_rows(connection: &Connection, table: &str) -> Result<i64> {
    let count = connection.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}

pub fn summary_value(connection: &Connection, metric: &str) -> Result<i64> {
    let value = connection
        .query_row(
            "SELECT value FROM summary WHERE metric = ?1",
            params![metric],
            |row| row.get(0),
        )
        .with_context(|| format!("summary metric '{metric}' missing"))?;
    Ok(value)
}

#[cfg(test)]
pub(super) fn write_report_in_memory(state: &BatchState) -> Result<Connection> {
    let mut connection = Connection::open_in_memory()?;
    ensure_report_schema(&connection)?;
    insert_report_rows(&mut connection, state)?;
    Ok(connection)
}
