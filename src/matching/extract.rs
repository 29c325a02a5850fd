use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

use super::normalize::normalize_text;

/// Boilerplate that may trail a brief description; the first one present wins.
const DESCRIPTION_STOP_PHRASES: [&str; 4] = [
    "CONTAINS FIXED CHARGE",
    "CONTAINS NEGATIVE PLEDGE",
    "CONTAINS FLOATING CHARGE",
    "CONTAINS",
];

/// Fields pulled from one charge document. A label missing from the text
/// leaves its field as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedFields {
    pub company_name: Option<String>,
    pub brief_description: Option<String>,
    pub creation_date_numeric: Option<String>,
    pub persons_entitled: Option<String>,
    pub charge_code: Option<String>,
}

#[derive(Debug)]
pub struct FieldExtractor {
    company_name: Regex,
    brief_description: Regex,
    creation_date: Regex,
    persons_entitled: Regex,
    charge_code: Regex,
}

impl FieldExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            company_name: Regex::new(r"COMPANY NAME:\s*(.*?)\s*COMPANY NUMBER:")
                .context("failed to compile company name regex")?,
            brief_description: Regex::new(
                r"BRIEF DESCRIPTION:\s*(.*?)(?:CONTAINS|AUTHENTICATION OF FORM|CERTIFIED BY:|CERTIFICATION STATEMENT:)",
            )
            .context("failed to compile brief description regex")?,
            creation_date: Regex::new(r"DATE OF CREATION:\s*(\d{2}/\d{2}/\d{4})")
                .context("failed to compile creation date regex")?,
            persons_entitled: Regex::new(
                r"PERSONS ENTITLED:\s*(.*?)(?:CHARGE|DATE OF CREATION|BRIEF DESCRIPTION|AUTHENTICATION|CERTIFIED BY:|CERTIFICATION STATEMENT:)",
            )
            .context("failed to compile persons entitled regex")?,
            charge_code: Regex::new(r"Charge code:\s*(\d{3,4}\s*\d{3,4}\s*\d{3,4})")
                .context("failed to compile charge code regex")?,
        })
    }

    /// Extracts every field from a document given as per-page text.
    ///
    /// Labelled fields are read from the normalised concatenation of all
    /// pages; the charge code is read page by page from the raw page text.
    pub fn extract_document(&self, pages: &[String]) -> ExtractedFields {
        let normalized = normalize_text(&join_pages(pages));
        ExtractedFields {
            charge_code: self.scan_charge_code(pages),
            ..self.extract(&normalized)
        }
    }

    /// Extracts the labelled fields from already-normalised text. The charge
    /// code is left unset.
    pub fn extract(&self, normalized: &str) -> ExtractedFields {
        ExtractedFields {
            company_name: capture_trimmed(&self.company_name, normalized),
            brief_description: capture_trimmed(&self.brief_description, normalized)
                .map(|description| strip_description_boilerplate(&description)),
            creation_date_numeric: capture_trimmed(&self.creation_date, normalized),
            persons_entitled: capture_trimmed(&self.persons_entitled, normalized),
            charge_code: None,
        }
    }

    /// First charge code found, scanning pages in order. Internal whitespace
    /// is removed from the digits.
    pub fn scan_charge_code(&self, pages: &[String]) -> Option<String> {
        pages.iter().find_map(|page| {
            self.charge_code
                .captures(page)
                .and_then(|captures| captures.get(1))
                .map(|code| {
                    code.as_str()
                        .chars()
                        .filter(|character| !character.is_whitespace())
                        .collect::<String>()
                })
        })
    }
}

/// Concatenates page texts the way the document reader hands them over:
/// every page followed by a newline.
pub fn join_pages(pages: &[String]) -> String {
    let mut text = String::with_capacity(pages.iter().map(|page| page.len() + 1).sum());
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text
}

fn capture_trimmed(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().trim().to_string())
}

/// Cuts a description at its first stop phrase. Captures of the
/// `brief_description` pattern already end before `CONTAINS`, so on that path
/// the text comes back unchanged.
fn strip_description_boilerplate(description: &str) -> String {
    for phrase in DESCRIPTION_STOP_PHRASES {
        if let Some(position) = description.find(phrase) {
            return description[..position].trim().to_string();
        }
    }
    description.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_description_boilerplate_prefers_specific_phrases() {
        assert_eq!(
            strip_description_boilerplate("LAND AT X CONTAINS NEGATIVE PLEDGE"),
            "LAND AT X"
        );
        assert_eq!(
            strip_description_boilerplate("PLANT CONTAINS SOMETHING"),
            "PLANT"
        );
        assert_eq!(
            strip_description_boilerplate("NO BOILERPLATE HERE"),
            "NO BOILERPLATE HERE"
        );
    }

    #[test]
    fn join_pages_terminates_every_page() {
        let pages = vec!["one".to_string(), "two".to_string()];
        assert_eq!(join_pages(&pages), "one\ntwo\n");
        assert_eq!(join_pages(&[]), "");
    }
}
