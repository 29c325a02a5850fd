use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::pdf_text::{has_extension, read_pages};
use super::{FetchError, FetchedFiling, FilingSource};
use crate::matching::{DateInfo, FieldExtractor, join_pages, normalize_text, similarity};

/// Serves filings from a local directory of downloaded documents.
///
/// A candidate qualifies when its text mentions the requested date; among
/// those, the one whose company name is closest to the request wins.
pub struct DirectorySource {
    root: PathBuf,
    extractor: FieldExtractor,
    /// Extracted text per document; `None` marks a document that could not
    /// be read, so it is tried and reported once.
    cache: HashMap<PathBuf, Option<CandidateText>>,
}

#[derive(Debug, Clone)]
struct CandidateText {
    pages: Vec<String>,
    normalized: String,
    company_name: Option<String>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            extractor: FieldExtractor::new()?,
            cache: HashMap::new(),
        })
    }

    fn candidate(&mut self, path: &Path) -> Option<&CandidateText> {
        let extractor = &self.extractor;
        self.cache
            .entry(path.to_path_buf())
            .or_insert_with(|| load_candidate(extractor, path))
            .as_ref()
    }
}

fn load_candidate(extractor: &FieldExtractor, path: &Path) -> Option<CandidateText> {
    let pages = match read_pages(path) {
        Ok(pages) => pages,
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %format!("{err:#}"),
                "skipping unreadable candidate"
            );
            return None;
        }
    };
    let normalized = normalize_text(&join_pages(&pages));
    let company_name = extractor.extract(&normalized).company_name;

    Some(CandidateText {
        pages,
        normalized,
        company_name,
    })
}

impl FilingSource for DirectorySource {
    fn fetch(&mut self, company_name: &str, date: &DateInfo) -> Result<FetchedFiling, FetchError> {
        let paths = discover_documents(&self.root)
            .map_err(|err| FetchError::Navigation(format!("{err:#}")))?;

        let wanted_company = company_name.trim().to_uppercase();
        let wanted_word_date = date.word_form.to_uppercase();
        let mut best: Option<(u8, PathBuf)> = None;

        for path in paths {
            let Some(candidate) = self.candidate(&path) else {
                continue;
            };

            if !candidate.normalized.contains(&date.numeric_form)
                && !candidate.normalized.contains(&wanted_word_date)
            {
                continue;
            }

            let Some(candidate_company) = candidate.company_name.as_deref() else {
                continue;
            };
            let score = similarity(candidate_company, &wanted_company).percent();
            debug!(path = %path.display(), score, "scored candidate");

            if best.as_ref().is_none_or(|(best_score, _)| score > *best_score) {
                best = Some((score, path));
            }
        }

        let Some((score, path)) = best.filter(|(score, _)| *score > 0) else {
            return Err(FetchError::NotFound);
        };

        let bytes = fs::read(&path)
            .map_err(|err| FetchError::Download(format!("{}: {err}", path.display())))?;
        let pages = self
            .candidate(&path)
            .map(|candidate| candidate.pages.clone())
            .unwrap_or_default();
        debug!(path = %path.display(), score, "selected candidate");

        Ok(FetchedFiling {
            pages,
            bytes,
            origin: path.display().to_string(),
        })
    }
}

fn discover_documents(root: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    let entries =
        fs::read_dir(root).with_context(|| format!("failed to read {}", root.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", root.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        if has_extension(&path, "pdf") || has_extension(&path, "txt") {
            documents.push(path);
        }
    }

    documents.sort();
    Ok(documents)
}
