use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use tracing::{info, warn};

use crate::matching::{DateInfo, FieldExtractor, MatchThresholds, evaluate_match, parse_input_date};
use crate::model::{
    BatchCounts, ExpectedRecord, FailedEntry, RowStatus, RunLogEntry, SucceededEntry,
    UnprocessedEntry,
};
use crate::source::{FetchedFiling, FilingSource};
use crate::util::{
    local_timestamp_string, sanitize_filename, sha256_bytes, sha256_file, write_bytes,
};

pub const STOPPED_REASON: &str = "batch stopped before row was processed";
pub const MISSING_COMPANY_REASON: &str = "company name is empty";

/// Everything a batch accumulates while it runs.
#[derive(Debug, Default)]
pub struct BatchState {
    pub total: usize,
    pub processed: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub succeeded: Vec<SucceededEntry>,
    pub failed_rows: Vec<FailedEntry>,
    pub unprocessed: Vec<UnprocessedEntry>,
    pub log: Vec<RunLogEntry>,
}

impl BatchState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn counts(&self) -> BatchCounts {
        BatchCounts {
            total: self.total,
            processed: self.processed,
            downloaded: self.downloaded,
            failed: self.failed,
            unprocessed: self.unprocessed.len(),
        }
    }

    fn record_success(&mut self, entry: SucceededEntry) {
        info!(
            row = entry.row_number,
            company = %entry.company_name,
            date = %entry.input_date,
            file = %entry.file_name,
            charge_code = %entry.charge_code.as_deref().unwrap_or(""),
            "filing verified"
        );
        self.processed += 1;
        self.downloaded += 1;
        self.push_log(
            &entry.company_name,
            &entry.input_date,
            RowStatus::Succeeded,
            "",
            &entry.file_name,
        );
        self.succeeded.push(entry);
    }

    fn record_failure(&mut self, record: &ExpectedRecord, reason: String) {
        warn!(
            row = record.row_number,
            company = %record.company_name,
            date = %record.input_date,
            reason = %reason,
            "row failed"
        );
        self.processed += 1;
        self.failed += 1;
        self.push_log(
            &record.company_name,
            &record.input_date,
            RowStatus::Failed,
            &reason,
            "",
        );
        self.failed_rows.push(FailedEntry {
            row_number: record.row_number,
            company_name: record.company_name.clone(),
            input_date: record.input_date.clone(),
            reason,
        });
    }

    fn record_unprocessed(&mut self, record: &ExpectedRecord, reason: &str) {
        info!(
            row = record.row_number,
            company = %record.company_name,
            reason,
            "row not processed"
        );
        self.push_log(
            &record.company_name,
            &record.input_date,
            RowStatus::Unprocessed,
            reason,
            "",
        );
        self.unprocessed.push(UnprocessedEntry {
            row_number: record.row_number,
            company_name: record.company_name.clone(),
            input_date: record.input_date.clone(),
            reason: reason.to_string(),
        });
    }

    fn push_log(&mut self, company: &str, date: &str, status: RowStatus, reason: &str, file: &str) {
        self.log.push(RunLogEntry {
            timestamp: local_timestamp_string(Local::now()),
            company: company.to_string(),
            date: date.to_string(),
            status,
            reason: reason.to_string(),
            file: file.to_string(),
        });
    }
}

/// Fixed inputs shared by every row of one batch.
pub struct BatchContext<'a> {
    pub extractor: &'a FieldExtractor,
    pub thresholds: MatchThresholds,
    pub download_dir: PathBuf,
    pub dry_run: bool,
}

enum RowOutcome {
    Succeeded(SucceededEntry),
    Failed(String),
    Unprocessed(&'static str),
}

/// Runs every record through fetch, extraction and verification, one at a
/// time, in input order. Row failures are recorded, never propagated.
pub fn process_batch(
    records: &[ExpectedRecord],
    source: &mut dyn FilingSource,
    context: &BatchContext<'_>,
    max_rows: Option<usize>,
    state: &mut BatchState,
) {
    for (index, record) in records.iter().enumerate() {
        if max_rows.is_some_and(|limit| index >= limit) {
            state.record_unprocessed(record, STOPPED_REASON);
            continue;
        }

        info!(
            row = record.row_number,
            of = state.total,
            company = %record.company_name,
            date = %record.input_date,
            "processing row"
        );

        match process_row(record, source, context) {
            RowOutcome::Succeeded(entry) => state.record_success(entry),
            RowOutcome::Failed(reason) => state.record_failure(record, reason),
            RowOutcome::Unprocessed(reason) => state.record_unprocessed(record, reason),
        }
    }
}

fn process_row(
    record: &ExpectedRecord,
    source: &mut dyn FilingSource,
    context: &BatchContext<'_>,
) -> RowOutcome {
    if record.company_name.trim().is_empty() {
        return RowOutcome::Unprocessed(MISSING_COMPANY_REASON);
    }

    let date = match parse_input_date(&record.input_date) {
        Ok(date) => date,
        Err(err) => return RowOutcome::Failed(err.to_string()),
    };

    let filing = match source.fetch(&record.company_name, &date) {
        Ok(filing) => filing,
        Err(err) => return RowOutcome::Failed(err.to_string()),
    };

    let fields = context.extractor.extract_document(&filing.pages);
    let report = evaluate_match(
        &fields,
        &date,
        &record.expected_fields(),
        &context.thresholds,
    );

    if !report.is_match() {
        for outcome in report.failed() {
            warn!(
                company = %record.company_name,
                criterion = outcome.criterion.as_str(),
                score = ?outcome.score,
                detail = %outcome.detail,
                "criterion failed"
            );
        }
        return RowOutcome::Failed(format!(
            "downloaded filing did not match: {}",
            report.failure_summary()
        ));
    }

    match persist_filing(record, &date, &filing, context) {
        Ok((file_name, sha256)) => RowOutcome::Succeeded(SucceededEntry {
            row_number: record.row_number,
            company_name: record.company_name.clone(),
            input_date: record.input_date.clone(),
            charge_code: fields.charge_code,
            file_name,
            sha256,
            source: filing.origin,
        }),
        Err(err) => RowOutcome::Failed(format!("failed to save filing: {err:#}")),
    }
}

/// Name a verified filing is saved under.
pub fn filing_file_name(company_name: &str, date: &DateInfo) -> String {
    sanitize_filename(&format!(
        "{}_{}_downloaded_file.pdf",
        company_name.trim(),
        date.compact_form
    ))
}

fn persist_filing(
    record: &ExpectedRecord,
    date: &DateInfo,
    filing: &FetchedFiling,
    context: &BatchContext<'_>,
) -> Result<(String, String)> {
    let file_name = filing_file_name(&record.company_name, date);
    if context.dry_run {
        return Ok((file_name, sha256_bytes(&filing.bytes)));
    }

    let path = context.download_dir.join(&file_name);
    write_bytes(&path, &filing.bytes)?;
    let sha256 = sha256_file(&path)?;
    Ok((file_name, sha256))
}
