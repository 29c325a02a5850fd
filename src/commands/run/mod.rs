use anyhow::Result;
use chrono::Local;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::matching::{FieldExtractor, ScoreScaling};
use crate::model::{RunManifest, RunPaths, RunSettings};
use crate::source::DirectorySource;
use crate::source::pdf_text::pdftotext_version;
use crate::util::{
    ensure_directory, local_clock_string, local_day_string, now_utc_string, write_json_pretty,
};

mod batch;
mod input;
mod report;

pub use report::{
    SUMMARY_DOWNLOADED, SUMMARY_FAILED, SUMMARY_PROCESSED, SUMMARY_TOTAL, SUMMARY_UNPROCESSED,
    count_rows, summary_value,
};

const MANIFEST_VERSION: u32 = 1;
pub const PDF_DIR_NAME: &str = "PDF_FILES";
pub const REPORT_DIR_NAME: &str = "REPORTS";
pub const MANIFEST_PREFIX: &str = "charge_run_";

pub fn run(args: RunArgs) -> Result<()> {
    let started = Local::now();
    let started_at = now_utc_string();
    let day = local_day_string(started);
    let clock = local_clock_string(started);
    let run_id = format!("charges-{day}-{clock}");

    let download_dir = args.output_root.join(PDF_DIR_NAME).join(&day);
    let report_dir = args.output_root.join(REPORT_DIR_NAME).join(&day);
    let report_path = report_dir.join(format!("charge_report_{clock}.sqlite"));
    let manifest_path = report_dir.join(format!("{MANIFEST_PREFIX}{clock}.json"));

    info!(
        run_id = %run_id,
        input = %args.input.display(),
        filings_dir = %args.filings_dir.display(),
        dry_run = args.dry_run,
        "starting charge batch"
    );

    let records = input::load_records(&args.input, args.sheet.as_deref())?;
    if records.is_empty() {
        warn!(input = %args.input.display(), "input contains no rows");
    }

    if !args.dry_run {
        ensure_directory(&download_dir)?;
        ensure_directory(&report_dir)?;
    }

    let pdftotext = pdftotext_version();
    if pdftotext.is_none() {
        warn!("pdftotext not found; only .txt filings can be read");
    }

    let extractor = FieldExtractor::new()?;
    let mut source = DirectorySource::new(&args.filings_dir)?;
    let thresholds = args.thresholds.thresholds();
    let context = batch::BatchContext {
        extractor: &extractor,
        thresholds,
        download_dir: download_dir.clone(),
        dry_run: args.dry_run,
    };

    let mut state = batch::BatchState::new(records.len());
    batch::process_batch(&records, &mut source, &context, args.max_rows, &mut state);

    let counts = state.counts();
    info!(
        total = counts.total,
        processed = counts.processed,
        downloaded = counts.downloaded,
        failed = counts.failed,
        unprocessed = counts.unprocessed,
        "batch completed"
    );

    if args.dry_run {
        info!("dry run: no filings or reports written");
        return Ok(());
    }

    report::write_report(&report_path, &state)?;
    info!(path = %report_path.display(), "wrote summary report");

    let manifest = RunManifest {
        manifest_version: MANIFEST_VERSION,
        run_id,
        status: if counts.failed == 0 && counts.unprocessed == 0 {
            "completed".to_string()
        } else {
            "completed_with_issues".to_string()
        },
        started_at,
        finished_at: now_utc_string(),
        command: render_run_command(&args),
        pdftotext,
        paths: RunPaths {
            input_path: args.input.display().to_string(),
            filings_dir: args.filings_dir.display().to_string(),
            download_dir: download_dir.display().to_string(),
            report_path: report_path.display().to_string(),
            manifest_path: manifest_path.display().to_string(),
        },
        settings: RunSettings::new(&thresholds, args.max_rows, args.dry_run),
        counts,
        succeeded: state.succeeded,
        failed: state.failed_rows,
        unprocessed: state.unprocessed,
        log: state.log,
    };
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote run manifest");

    Ok(())
}

fn render_run_command(args: &RunArgs) -> String {
    let mut command = vec![
        "chargefetch".to_string(),
        "run".to_string(),
        "--input".to_string(),
        args.input.display().to_string(),
        "--filings-dir".to_string(),
        args.filings_dir.display().to_string(),
        "--output-root".to_string(),
        args.output_root.display().to_string(),
    ];

    if let Some(sheet) = &args.sheet {
        command.push("--sheet".to_string());
        command.push(sheet.clone());
    }
    command.push("--company-threshold".to_string());
    command.push(args.thresholds.company_threshold.to_string());
    command.push("--persons-threshold".to_string());
    command.push(args.thresholds.persons_threshold.to_string());
    command.push("--persons-scaling".to_string());
    command.push(
        ScoreScaling::from(args.thresholds.persons_scaling)
            .as_str()
            .to_string(),
    );
    if let Some(max_rows) = args.max_rows {
        command.push("--max-rows".to_string());
        command.push(max_rows.to_string());
    }
    if args.dry_run {
        command.push("--dry-run".to_string());
    }

    command.join(" ")
}
