use serde::{Deserialize, Serialize};

use crate::matching::{ExpectedFields, MatchThresholds};

/// One input row: the filing we are looking for and what it must say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedRecord {
    /// 1-based position in the input, header excluded.
    #[serde(default)]
    pub row_number: usize,
    pub company_name: String,
    pub input_date: String,
    #[serde(default)]
    pub persons_entitled: String,
    #[serde(default)]
    pub brief_description: String,
}

impl ExpectedRecord {
    pub fn expected_fields(&self) -> ExpectedFields {
        ExpectedFields::new(
            &self.company_name,
            &self.persons_entitled,
            &self.brief_description,
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Succeeded,
    Failed,
    Unprocessed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLogEntry {
    pub timestamp: String,
    pub company: String,
    pub date: String,
    pub status: RowStatus,
    pub reason: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SucceededEntry {
    pub row_number: usize,
    pub company_name: String,
    pub input_date: String,
    pub charge_code: Option<String>,
    pub file_name: String,
    pub sha256: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedEntry {
    pub row_number: usize,
    pub company_name: String,
    pub input_date: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnprocessedEntry {
    pub row_number: usize,
    pub company_name: String,
    pub input_date: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCounts {
    pub total: usize,
    pub processed: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub unprocessed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPaths {
    pub input_path: String,
    pub filings_dir: String,
    pub download_dir: String,
    pub report_path: String,
    pub manifest_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    pub company_threshold: u8,
    pub persons_threshold: u8,
    pub persons_scaling: String,
    pub max_rows: Option<usize>,
    pub dry_run: bool,
}

impl RunSettings {
    pub fn new(thresholds: &MatchThresholds, max_rows: Option<usize>, dry_run: bool) -> Self {
        Self {
            company_threshold: thresholds.company_name,
            persons_threshold: thresholds.persons_entitled,
            persons_scaling: thresholds.persons_entitled_scaling.as_str().to_string(),
            max_rows,
            dry_run,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub finished_at: String,
    pub command: String,
    pub pdftotext: Option<String>,
    pub paths: RunPaths,
    pub settings: RunSettings,
    pub counts: BatchCounts,
    pub succeeded: Vec<SucceededEntry>,
    pub failed: Vec<FailedEntry>,
    pub unprocessed: Vec<UnprocessedEntry>,
    pub log: Vec<RunLogEntry>,
}
