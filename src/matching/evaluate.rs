use serde::Serialize;

use super::dates::DateInfo;
use super::extract::ExtractedFields;
use super::similarity::similarity;

pub const DEFAULT_COMPANY_NAME_THRESHOLD: u8 = 80;
pub const DEFAULT_PERSONS_ENTITLED_THRESHOLD: u8 = 80;

/// How the persons-entitled score is compared with its threshold.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreScaling {
    /// Percentage compared directly with the threshold.
    #[default]
    Single,
    /// Percentage scaled by 100 a second time before comparison, so any
    /// ratio of at least `threshold / 10000` passes.
    Legacy,
}

impl ScoreScaling {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Legacy => "legacy",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchThresholds {
    pub company_name: u8,
    pub persons_entitled: u8,
    pub persons_entitled_scaling: ScoreScaling,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME_THRESHOLD,
            persons_entitled: DEFAULT_PERSONS_ENTITLED_THRESHOLD,
            persons_entitled_scaling: ScoreScaling::Single,
        }
    }
}

/// Caller-supplied ground truth for one document, upper-cased on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectedFields {
    pub company_name: String,
    pub persons_entitled: String,
    pub brief_description: String,
}

impl ExpectedFields {
    pub fn new(company_name: &str, persons_entitled: &str, brief_description: &str) -> Self {
        Self {
            company_name: company_name.trim().to_uppercase(),
            persons_entitled: persons_entitled.trim().to_uppercase(),
            brief_description: brief_description.trim().to_uppercase(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    CompanyName,
    PersonsEntitled,
    BriefDescription,
    CreationDate,
}

impl Criterion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompanyName => "company_name",
            Self::PersonsEntitled => "persons_entitled",
            Self::BriefDescription => "brief_description",
            Self::CreationDate => "creation_date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriterionOutcome {
    pub criterion: Criterion,
    pub passed: bool,
    pub score: Option<u8>,
    pub detail: String,
}

/// Per-criterion result of checking one document against its expected fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub company_name: CriterionOutcome,
    pub persons_entitled: CriterionOutcome,
    pub brief_description: CriterionOutcome,
    pub creation_date: CriterionOutcome,
}

impl MatchReport {
    pub fn outcomes(&self) -> [&CriterionOutcome; 4] {
        [
            &self.company_name,
            &self.persons_entitled,
            &self.brief_description,
            &self.creation_date,
        ]
    }

    pub fn is_match(&self) -> bool {
        self.outcomes().iter().all(|outcome| outcome.passed)
    }

    pub fn failed(&self) -> Vec<&CriterionOutcome> {
        self.outcomes()
            .into_iter()
            .filter(|outcome| !outcome.passed)
            .collect()
    }

    /// `criterion (detail); criterion (detail)` for every failed criterion.
    pub fn failure_summary(&self) -> String {
        self.failed()
            .iter()
            .map(|outcome| format!("{} ({})", outcome.criterion.as_str(), outcome.detail))
            .collect::<Vec<String>>()
            .join("; ")
    }
}

/// Checks extracted fields against the expected ones. Every criterion is
/// evaluated; the document matches only when all four pass.
pub fn evaluate_match(
    extracted: &ExtractedFields,
    date: &DateInfo,
    expected: &ExpectedFields,
    thresholds: &MatchThresholds,
) -> MatchReport {
    MatchReport {
        company_name: check_company_name(
            extracted.company_name.as_deref(),
            &expected.company_name,
            thresholds.company_name,
        ),
        persons_entitled: check_persons_entitled(
            extracted.persons_entitled.as_deref(),
            &expected.persons_entitled,
            thresholds.persons_entitled,
            thresholds.persons_entitled_scaling,
        ),
        brief_description: check_brief_description(
            extracted.brief_description.as_deref(),
            &expected.brief_description,
        ),
        creation_date: check_creation_date(
            extracted.creation_date_numeric.as_deref(),
            &date.numeric_form,
        ),
    }
}

fn check_company_name(extracted: Option<&str>, expected: &str, threshold: u8) -> CriterionOutcome {
    let Some(extracted) = extracted else {
        return missing(Criterion::CompanyName);
    };

    let score = similarity(extracted, expected).percent();
    let passed = score >= threshold;
    CriterionOutcome {
        criterion: Criterion::CompanyName,
        passed,
        score: Some(score),
        detail: threshold_detail(score, threshold, passed),
    }
}

fn check_persons_entitled(
    extracted: Option<&str>,
    expected: &str,
    threshold: u8,
    scaling: ScoreScaling,
) -> CriterionOutcome {
    let Some(extracted) = extracted else {
        return missing(Criterion::PersonsEntitled);
    };

    let score = similarity(extracted, expected);
    let passed = match scaling {
        ScoreScaling::Single => score.percent() >= threshold,
        ScoreScaling::Legacy => score.ratio() * 100.0 * 100.0 >= f64::from(threshold),
    };
    CriterionOutcome {
        criterion: Criterion::PersonsEntitled,
        passed,
        score: Some(score.percent()),
        detail: match scaling {
            ScoreScaling::Single => threshold_detail(score.percent(), threshold, passed),
            ScoreScaling::Legacy => format!(
                "score {} x100 {} {}",
                score.percent(),
                if passed { ">=" } else { "<" },
                threshold
            ),
        },
    }
}

fn check_brief_description(extracted: Option<&str>, expected: &str) -> CriterionOutcome {
    let Some(extracted) = extracted else {
        return missing(Criterion::BriefDescription);
    };

    let passed = extracted.contains(expected);
    CriterionOutcome {
        criterion: Criterion::BriefDescription,
        passed,
        score: None,
        detail: if passed {
            "expected description contained in document".to_string()
        } else {
            format!("expected description not contained in '{extracted}'")
        },
    }
}

fn check_creation_date(extracted: Option<&str>, expected: &str) -> CriterionOutcome {
    let Some(extracted) = extracted else {
        return missing(Criterion::CreationDate);
    };

    let passed = extracted == expected;
    CriterionOutcome {
        criterion: Criterion::CreationDate,
        passed,
        score: None,
        detail: if passed {
            format!("document date {extracted} equals input date")
        } else {
            format!("document date {extracted} differs from {expected}")
        },
    }
}

fn missing(criterion: Criterion) -> CriterionOutcome {
    CriterionOutcome {
        criterion,
        passed: false,
        score: None,
        detail: format!("{} not found in document", criterion.as_str()),
    }
}

fn threshold_detail(score: u8, threshold: u8, passed: bool) -> String {
    format!(
        "score {score} {} {threshold}",
        if passed { ">=" } else { "<" }
    )
}
