//! Where candidate charge documents come from.
//!
//! The batch runner only sees [`FilingSource`]: hand it a company name and a
//! date, get back one document or a reason why not.

mod directory;
pub mod pdf_text;

use thiserror::Error;

use crate::matching::DateInfo;

pub use directory::DirectorySource;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("no matching filing found")]
    NotFound,
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("download failed: {0}")]
    Download(String),
}

/// Best candidate document for one request.
#[derive(Debug, Clone)]
pub struct FetchedFiling {
    /// Text of each page, in order.
    pub pages: Vec<String>,
    pub bytes: Vec<u8>,
    /// Where the document came from, for logs and reports.
    pub origin: String,
}

pub trait FilingSource {
    fn fetch(&mut self, company_name: &str, date: &DateInfo) -> Result<FetchedFiling, FetchError>;
}
