use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Accepted input layouts, tried in order.
const INPUT_DATE_FORMATS: [&str; 3] = ["%d %B %Y", "%d-%m-%Y", "%d/%m/%Y"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateFormatError {
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),
}

/// One calendar date in the three layouts the pipeline needs: registry
/// search filtering, exact comparison against the document, and filenames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateInfo {
    pub word_form: String,
    pub numeric_form: String,
    pub compact_form: String,
}

impl DateInfo {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            word_form: date.format("%d %B %Y").to_string(),
            numeric_form: date.format("%d/%m/%Y").to_string(),
            compact_form: date.format("%Y%m%d").to_string(),
        }
    }
}

pub fn parse_input_date(input: &str) -> Result<DateInfo, DateFormatError> {
    let trimmed = input.trim();
    INPUT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map(DateInfo::from_date)
        .ok_or_else(|| DateFormatError::InvalidDateFormat(input.to_string()))
}
