use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, DataType, Reader, open_workbook_auto};
use thiserror::Error;

use crate::model::ExpectedRecord;
use crate::source::pdf_text::has_extension;

const COMPANY_NAME_HEADERS: [&str; 2] = ["company name", "company"];
const DATE_HEADERS: [&str; 4] = ["date", "input date", "date of creation", "creation date"];
const PERSONS_ENTITLED_HEADERS: [&str; 2] = ["persons entitled", "person entitled"];
const BRIEF_DESCRIPTION_HEADERS: [&str; 2] = ["brief description", "description"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: String, message: String },
    #[error("workbook {0} has no worksheets")]
    NoSheets(String),
    #[error("input has no header row")]
    Empty,
    #[error("required column '{0}' missing from header row")]
    MissingColumn(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    company_name: usize,
    date: usize,
    persons_entitled: usize,
    brief_description: usize,
}

/// Loads the batch from a workbook or a JSON array of records.
pub fn load_records(path: &Path, sheet: Option<&str>) -> Result<Vec<ExpectedRecord>> {
    if has_extension(path, "json") {
        return load_json_records(path);
    }

    let rows = read_sheet_rows(path, sheet)?;
    records_from_rows(&rows).with_context(|| format!("invalid batch input {}", path.display()))
}

fn load_json_records(path: &Path) -> Result<Vec<ExpectedRecord>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut records: Vec<ExpectedRecord> = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    for (index, record) in records.iter_mut().enumerate() {
        if record.row_number == 0 {
            record.row_number = index + 1;
        }
    }

    Ok(records)
}

fn read_sheet_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<String>>, InputError> {
    let workbook_error = |message: String| InputError::Workbook {
        path: path.display().to_string(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|err| workbook_error(err.to_string()))?;
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| InputError::NoSheets(path.display().to_string()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|err| workbook_error(format!("sheet '{sheet_name}': {err}")))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

/// Cell as the text the date parser and matcher expect. Spreadsheet dates
/// become `DD/MM/YYYY`; whole floats lose their fractional part.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Float(value) if value.fract() == 0.0 => format!("{value:.0}"),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|date| date.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string().trim().to_string(),
    }
}

fn records_from_rows(rows: &[Vec<String>]) -> Result<Vec<ExpectedRecord>, InputError> {
    let (header, body) = rows.split_first().ok_or(InputError::Empty)?;
    let columns = resolve_columns(header)?;

    let cell = |row: &[String], index: usize| -> String {
        row.get(index)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    };

    Ok(body
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|value| !value.trim().is_empty()))
        .map(|(index, row)| ExpectedRecord {
            row_number: index + 1,
            company_name: cell(row, columns.company_name),
            input_date: cell(row, columns.date),
            persons_entitled: cell(row, columns.persons_entitled),
            brief_description: cell(row, columns.brief_description),
        })
        .collect())
}

fn resolve_columns(header: &[String]) -> Result<ColumnMap, InputError> {
    let normalized = header
        .iter()
        .map(|name| normalize_header(name))
        .collect::<Vec<String>>();

    let find = |aliases: &[&str], label: &'static str| -> Result<usize, InputError> {
        normalized
            .iter()
            .position(|name| aliases.contains(&name.as_str()))
            .ok_or(InputError::MissingColumn(label))
    };

    Ok(ColumnMap {
        company_name: find(&COMPANY_NAME_HEADERS, "company name")?,
        date: find(&DATE_HEADERS, "date")?,
        persons_entitled: find(&PERSONS_ENTITLED_HEADERS, "persons entitled")?,
        brief_description: find(&BRIEF_DESCRIPTION_HEADERS, "brief description")?,
    })
}

fn normalize_header(name: &str) -> String {
    name.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn spreadsheet_dates_render_as_day_month_year() {
        let serial = ExcelDateTime::new(45_000.0, ExcelDateTimeType::DateTime, false);
        let serial = Data::DateTime(serial);
        let iso = Data::DateTimeIso("2023-03-15T00:00:00".to_string());

        assert_eq!(cell_text(&serial), "15/03/2023");
        assert_eq!(cell_text(&iso), "15/03/2023");
    }

    #[test]
    fn header_aliases_are_matched_loosely() {
        let columns = resolve_columns(&row(&[
            "Brief_Description",
            " Company  Name ",
            "DATE",
            "Persons Entitled",
        ]))
        .expect("columns should resolve");

        assert_eq!(
            columns,
            ColumnMap {
                company_name: 1,
                date: 2,
                persons_entitled: 3,
                brief_description: 0,
            }
        );
    }

    #[test]
    fn missing_required_column_is_reported() {
        let error = resolve_columns(&row(&["Company Name", "Date", "Brief Description"]))
            .expect_err("persons entitled column is required");
        assert_eq!(error, InputError::MissingColumn("persons entitled"));
    }

    #[test]
    fn records_skip_blank_rows_but_keep_row_numbers() {
        let rows = vec![
            row(&["Company Name", "Date", "Persons Entitled", "Brief Description"]),
            row(&["Acme Ltd", "15/03/2023", "Big Bank", "Land"]),
            row(&["", " ", "", ""]),
            row(&["Zenith plc", "15 March 2023"]),
        ];

        let records = records_from_rows(&rows).expect("records");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row_number, 1);
        assert_eq!(records[0].company_name, "Acme Ltd");
        assert_eq!(records[1].row_number, 3);
        assert_eq!(records[1].input_date, "15 March 2023");
        assert_eq!(records[1].persons_entitled, "");
    }

    #[test]
    fn empty_sheet_is_rejected() {
        assert_eq!(records_from_rows(&[]), Err(InputError::Empty));
    }

    #[test]
    fn cell_text_renders_whole_floats_without_fraction() {
        assert_eq!(cell_text(&Data::Float(12345.0)), "12345");
        assert_eq!(cell_text(&Data::Float(1e20)), "100000000000000000000");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::String("  Acme ".to_string())), "Acme");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn json_records_get_positional_row_numbers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("batch.json");
        fs::write(
            &path,
            r#"[
                {"company_name": "Acme Ltd", "input_date": "15/03/2023",
                 "persons_entitled": "Big Bank", "brief_description": "Land"},
                {"company_name": "Zenith plc", "input_date": "01-02-2021"}
            ]"#,
        )
        .expect("write");

        let records = load_records(&path, None).expect("records");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].row_number, 2);
        assert_eq!(records[1].brief_description, "");
    }
}
