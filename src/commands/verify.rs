use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use super::output::{display_field, write_json_response};
use crate::cli::VerifyArgs;
use crate::matching::{
    DateInfo, ExpectedFields, ExtractedFields, FieldExtractor, MatchReport, MatchThresholds,
    evaluate_match, parse_input_date,
};
use crate::source::pdf_text::read_pages;

#[derive(Debug, Serialize)]
struct VerifyResponse {
    document: String,
    is_match: bool,
    date: DateInfo,
    expected: ExpectedFields,
    extracted: ExtractedFields,
    thresholds: MatchThresholds,
    report: MatchReport,
}

pub fn run(args: VerifyArgs) -> Result<()> {
    let date = parse_input_date(&args.date)?;
    let pages = read_pages(&args.document)
        .with_context(|| format!("failed to read {}", args.document.display()))?;

    let extractor = FieldExtractor::new()?;
    let extracted = extractor.extract_document(&pages);
    let expected = ExpectedFields::new(&args.company, &args.persons, &args.description);
    let thresholds = args.thresholds.thresholds();
    let report = evaluate_match(&extracted, &date, &expected, &thresholds);

    if report.is_match() {
        info!(document = %args.document.display(), "document matches expected fields");
    } else {
        warn!(
            document = %args.document.display(),
            failed = %report.failure_summary(),
            "document does not match expected fields"
        );
    }

    let response = VerifyResponse {
        document: args.document.display().to_string(),
        is_match: report.is_match(),
        date,
        expected,
        extracted,
        thresholds,
        report,
    };

    if args.json {
        return write_json_response(&response);
    }
    write_text_response(&response)
}

fn write_text_response(response: &VerifyResponse) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    writeln!(output, "Document: {}", response.document)?;
    writeln!(
        output,
        "Verdict: {}",
        if response.is_match { "MATCH" } else { "NO MATCH" }
    )?;
    for outcome in response.report.outcomes() {
        writeln!(
            output,
            "  [{}] {}: {}",
            if outcome.passed { "pass" } else { "FAIL" },
            outcome.criterion.as_str(),
            outcome.detail
        )?;
    }
    writeln!(
        output,
        "Charge code: {}",
        display_field(response.extracted.charge_code.as_deref())
    )?;

    output.flush()?;
    Ok(())
}
