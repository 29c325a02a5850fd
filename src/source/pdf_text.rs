use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

/// Reads a document as per-page text. PDFs go through `pdftotext`; `.txt`
/// files are read directly with form feeds separating pages.
pub fn read_pages(path: &Path) -> Result<Vec<String>> {
    if has_extension(path, "txt") {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read text document {}", path.display()))?;
        return Ok(split_pages(&raw));
    }

    extract_pages_with_pdftotext(path)
}

pub fn has_extension(path: &Path, expected: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}

fn extract_pages_with_pdftotext(pdf_path: &Path) -> Result<Vec<String>> {
    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(split_pages(&String::from_utf8_lossy(&output.stdout)))
}

fn split_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    pages
}

/// First line of `pdftotext -v`, if the tool is installed.
pub fn pdftotext_version() -> Option<String> {
    let output = Command::new("pdftotext").arg("-v").output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_pages_drops_trailing_blank_pages_and_nuls() {
        let pages = split_pages("first\u{0000} page\u{000C}second\u{000C}  \n\u{000C}");
        assert_eq!(pages, vec!["first page".to_string(), "second".to_string()]);
    }

    #[test]
    fn read_pages_accepts_text_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("filing.TXT");
        fs::write(&path, "Company name: A\u{000C}Charge code: 1234 5678 9012\n").expect("write");

        let pages = read_pages(&path).expect("text document should be readable");
        assert_eq!(pages.len(), 2);
        assert!(pages[1].starts_with("Charge code"));
    }
}
