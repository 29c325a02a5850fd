use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::Connection;
use tracing::{info, warn};

use super::run::{
    MANIFEST_PREFIX, REPORT_DIR_NAME, SUMMARY_DOWNLOADED, SUMMARY_FAILED, SUMMARY_PROCESSED,
    SUMMARY_TOTAL, SUMMARY_UNPROCESSED, count_rows, summary_value,
};
use crate::cli::StatusArgs;
use crate::model::RunManifest;
use crate::util::local_day_string;

pub fn run(args: StatusArgs) -> Result<()> {
    let day = args
        .day
        .clone()
        .unwrap_or_else(|| local_day_string(Local::now()));
    let report_dir = args.output_root.join(REPORT_DIR_NAME).join(&day);

    info!(report_dir = %report_dir.display(), "status requested");

    let Some(manifest_path) = latest_manifest(&report_dir)? else {
        warn!(day = %day, path = %report_dir.display(), "no run manifest found");
        return Ok(());
    };

    let raw = fs::read(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    let manifest: RunManifest = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", manifest_path.display()))?;

    info!(
        run_id = %manifest.run_id,
        status = %manifest.status,
        started_at = %manifest.started_at,
        finished_at = %manifest.finished_at,
        total = manifest.counts.total,
        processed = manifest.counts.processed,
        downloaded = manifest.counts.downloaded,
        failed = manifest.counts.failed,
        unprocessed = manifest.counts.unprocessed,
        "loaded run manifest"
    );
    for entry in &manifest.failed {
        info!(
            row = entry.row_number,
            company = %entry.company_name,
            reason = %entry.reason,
            "failed row"
        );
    }

    let report_path = Path::new(&manifest.paths.report_path);
    if report_path.exists() {
        let conn = Connection::open(report_path)
            .with_context(|| format!("failed to open {}", report_path.display()))?;

        info!(
            path = %report_path.display(),
            total = summary_value(&conn, SUMMARY_TOTAL).unwrap_or(0),
            processed = summary_value(&conn, SUMMARY_PROCESSED).unwrap_or(0),
            downloaded = summary_value(&conn, SUMMARY_DOWNLOADED).unwrap_or(0),
            failed = summary_value(&conn, SUMMARY_FAILED).unwrap_or(0),
            unprocessed = summary_value(&conn, SUMMARY_UNPROCESSED).unwrap_or(0),
            succeeded_rows = count_rows(&conn, "succeeded").unwrap_or(0),
            failed_rows = count_rows(&conn, "failed").unwrap_or(0),
            unprocessed_rows = count_rows(&conn, "unprocessed").unwrap_or(0),
            "report status"
        );
    } else {
        warn!(path = %report_path.display(), "summary report missing");
    }

    Ok(())
}

/// Newest run manifest in a day folder. Names embed the local time, so
/// lexical order is chronological within a day.
fn latest_manifest(report_dir: &Path) -> Result<Option<PathBuf>> {
    if !report_dir.exists() {
        return Ok(None);
    }

    let entries = fs::read_dir(report_dir)
        .with_context(|| format!("failed to read {}", report_dir.display()))?;

    let mut manifests = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", report_dir.display()))?;
        let path = entry.path();
        let is_manifest = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(MANIFEST_PREFIX) && name.ends_with(".json"))
            .unwrap_or(false);
        if is_manifest {
            manifests.push(path);
        }
    }

    manifests.sort();
    Ok(manifests.pop())
}
