use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::output::{display_field, write_json_response};
use crate::cli::InspectArgs;
use crate::matching::{ExtractedFields, FieldExtractor};
use crate::source::pdf_text::read_pages;

#[derive(Debug, Serialize)]
struct InspectResponse {
    document: String,
    page_count: usize,
    fields: ExtractedFields,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let pages = read_pages(&args.document)
        .with_context(|| format!("failed to read {}", args.document.display()))?;
    let extractor = FieldExtractor::new()?;
    let fields = extractor.extract_document(&pages);

    info!(
        document = %args.document.display(),
        pages = pages.len(),
        "extracted charge fields"
    );

    let response = InspectResponse {
        document: args.document.display().to_string(),
        page_count: pages.len(),
        fields,
    };

    if args.json {
        return write_json_response(&response);
    }
    write_text_response(&response)
}

fn write_text_response(response: &InspectResponse) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    let fields = &response.fields;

    writeln!(output, "Document: {} ({} pages)", response.document, response.page_count)?;
    writeln!(output, "Company name: {}", display_field(fields.company_name.as_deref()))?;
    writeln!(
        output,
        "Date of creation: {}",
        display_field(fields.creation_date_numeric.as_deref())
    )?;
    writeln!(
        output,
        "Persons entitled: {}",
        display_field(fields.persons_entitled.as_deref())
    )?;
    writeln!(
        output,
        "Brief description: {}",
        display_field(fields.brief_description.as_deref())
    )?;
    writeln!(output, "Charge code: {}", display_field(fields.charge_code.as_deref()))?;

    output.flush()?;
    Ok(())
}
