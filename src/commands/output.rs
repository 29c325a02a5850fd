use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

pub(super) fn write_json_response<T: Serialize>(response: &T) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, response)
        .context("failed to serialize json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

pub(super) fn display_field(value: Option<&str>) -> &str {
    value.unwrap_or("<not found>")
}
