use super::evaluate::Criterion;
use super::*;

const SAMPLE_DOCUMENT: &str = "COMPANY NAME: ACME LTD COMPANY NUMBER: 123 \
    DATE OF CREATION: 01/01/2020 \
    BRIEF DESCRIPTION: A FIXED CHARGE OVER ASSETS CONTAINS FIXED CHARGE: YES \
    PERSONS ENTITLED: BIG BANK CHARGE CODE 1234 5678 9012";

fn extractor() -> FieldExtractor {
    FieldExtractor::new().expect("extractor regexes should compile")
}

fn passing_fields() -> ExtractedFields {
    ExtractedFields {
        company_name: Some("ACME LTD".to_string()),
        brief_description: Some("A FIXED CHARGE OVER ASSETS".to_string()),
        creation_date_numeric: Some("01/01/2020".to_string()),
        persons_entitled: Some("BIG BANK".to_string()),
        charge_code: Some("123456789012".to_string()),
    }
}

fn passing_date() -> DateInfo {
    parse_input_date("01/01/2020").expect("fixture date should parse")
}

fn passing_expected() -> ExpectedFields {
    ExpectedFields::new("Acme Ltd", "Big Bank", "fixed charge over")
}

#[test]
fn extractor_reads_every_labelled_field() {
    let fields = extractor().extract(SAMPLE_DOCUMENT);

    assert_eq!(fields.company_name.as_deref(), Some("ACME LTD"));
    assert_eq!(
        fields.brief_description.as_deref(),
        Some("A FIXED CHARGE OVER ASSETS")
    );
    assert_eq!(fields.creation_date_numeric.as_deref(), Some("01/01/2020"));
    assert_eq!(fields.persons_entitled.as_deref(), Some("BIG BANK"));
    assert_eq!(fields.charge_code, None);
}

#[test]
fn extractor_leaves_missing_labels_unset() {
    let fields = extractor().extract("NOTHING USEFUL ON THIS PAGE");
    assert_eq!(fields, ExtractedFields::default());
}

#[test]
fn description_without_terminator_is_not_captured() {
    let fields = extractor().extract("BRIEF DESCRIPTION: LAND AND BUILDINGS");
    assert_eq!(fields.brief_description, None);
}

#[test]
fn description_stops_at_certification_label() {
    let fields =
        extractor().extract("BRIEF DESCRIPTION: THE PROPERTY AT 1 HIGH STREET CERTIFIED BY: X");
    assert_eq!(
        fields.brief_description.as_deref(),
        Some("THE PROPERTY AT 1 HIGH STREET")
    );
}

#[test]
fn persons_entitled_stops_at_first_terminator() {
    let fields = extractor().extract(
        "PERSONS ENTITLED: LLOYDS BANK PLC DATE OF CREATION: 02/03/2021 BRIEF DESCRIPTION: X",
    );
    assert_eq!(fields.persons_entitled.as_deref(), Some("LLOYDS BANK PLC"));
    assert_eq!(fields.creation_date_numeric.as_deref(), Some("02/03/2021"));
}

#[test]
fn creation_date_requires_padded_numeric_layout() {
    let fields = extractor().extract("DATE OF CREATION: 1/1/2020");
    assert_eq!(fields.creation_date_numeric, None);
}

#[test]
fn out_of_order_labels_capture_textually() {
    // Persons entitled runs until the next terminator it sees, whatever that is.
    let fields = extractor()
        .extract("PERSONS ENTITLED: HSBC UK BANK AUTHENTICATION OF FORM BRIEF DESCRIPTION: X");
    assert_eq!(fields.persons_entitled.as_deref(), Some("HSBC UK BANK"));
    assert_eq!(fields.brief_description, None);
}

#[test]
fn charge_code_whitespace_is_stripped() {
    let pages = vec!["Charge code: 1234 567 890".to_string()];
    assert_eq!(
        extractor().scan_charge_code(&pages).as_deref(),
        Some("1234567890")
    );
}

#[test]
fn charge_code_keeps_first_page_match() {
    let pages = vec![
        "Cover page".to_string(),
        "Charge code: 0123 4567 8901".to_string(),
        "Charge code: 9999 9999 9999".to_string(),
    ];
    assert_eq!(
        extractor().scan_charge_code(&pages).as_deref(),
        Some("012345678901")
    );
}

#[test]
fn charge_code_label_is_case_sensitive() {
    let pages = vec!["CHARGE CODE: 1234 5678 9012".to_string()];
    assert_eq!(extractor().scan_charge_code(&pages), None);
}

#[test]
fn extract_document_normalises_multi_page_text() {
    let pages = vec![
        "Company name: Acme\nLtd\nCompany number: 00001\nCharge code: 0001 2345 6789".to_string(),
        "Date of creation: 01/01/2020\nPersons entitled: Big\nBank\nBrief description: A fixed\ncharge over assets\nContains fixed charge: Yes".to_string(),
    ];
    let fields = extractor().extract_document(&pages);

    assert_eq!(fields.company_name.as_deref(), Some("ACME LTD"));
    assert_eq!(fields.persons_entitled.as_deref(), Some("BIG BANK"));
    assert_eq!(
        fields.brief_description.as_deref(),
        Some("A FIXED CHARGE OVER ASSETS")
    );
    assert_eq!(fields.creation_date_numeric.as_deref(), Some("01/01/2020"));
    assert_eq!(fields.charge_code.as_deref(), Some("000123456789"));
}

#[test]
fn evaluator_accepts_fully_matching_fixture() {
    let report = evaluate_match(
        &passing_fields(),
        &passing_date(),
        &passing_expected(),
        &MatchThresholds::default(),
    );
    assert!(report.is_match(), "{}", report.failure_summary());
    assert!(report.failed().is_empty());
}

#[test]
fn evaluator_rejects_company_name_mismatch_alone() {
    let mut fields = passing_fields();
    fields.company_name = Some("ZENITH HOLDINGS".to_string());

    let report = evaluate_match(
        &fields,
        &passing_date(),
        &passing_expected(),
        &MatchThresholds::default(),
    );
    assert!(!report.is_match());
    let failed = report.failed();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].criterion, Criterion::CompanyName);
}

#[test]
fn evaluator_rejects_persons_entitled_mismatch_alone() {
    let mut fields = passing_fields();
    fields.persons_entitled = Some("NATWEST MARKETS".to_string());

    let report = evaluate_match(
        &fields,
        &passing_date(),
        &passing_expected(),
        &MatchThresholds::default(),
    );
    assert!(!report.is_match());
    let failed = report.failed();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].criterion, Criterion::PersonsEntitled);
}

#[test]
fn evaluator_rejects_description_not_contained_alone() {
    let mut fields = passing_fields();
    fields.brief_description = Some("ALL MONIES DEBENTURE".to_string());

    let report = evaluate_match(
        &fields,
        &passing_date(),
        &passing_expected(),
        &MatchThresholds::default(),
    );
    assert!(!report.is_match());
    let failed = report.failed();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].criterion, Criterion::BriefDescription);
}

#[test]
fn evaluator_rejects_date_mismatch_alone() {
    let date = parse_input_date("02/01/2020").expect("date should parse");

    let report = evaluate_match(
        &passing_fields(),
        &date,
        &passing_expected(),
        &MatchThresholds::default(),
    );
    assert!(!report.is_match());
    let failed = report.failed();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].criterion, Criterion::CreationDate);
}

#[test]
fn evaluator_compares_dates_as_strings() {
    let mut fields = passing_fields();
    fields.creation_date_numeric = Some("1/1/2020".to_string());

    let report = evaluate_match(
        &fields,
        &passing_date(),
        &passing_expected(),
        &MatchThresholds::default(),
    );
    assert!(!report.creation_date.passed);
}

#[test]
fn evaluator_treats_missing_fields_as_failures() {
    let report = evaluate_match(
        &ExtractedFields::default(),
        &passing_date(),
        &passing_expected(),
        &MatchThresholds::default(),
    );

    assert!(!report.is_match());
    assert_eq!(report.failed().len(), 4);
    assert!(report.failure_summary().contains("company_name not found"));
}

#[test]
fn legacy_scaling_accepts_weak_persons_entitled_scores() {
    let mut fields = passing_fields();
    fields.persons_entitled = Some("NATWEST MARKETS".to_string());
    let thresholds = MatchThresholds {
        persons_entitled_scaling: ScoreScaling::Legacy,
        ..MatchThresholds::default()
    };

    let report = evaluate_match(&fields, &passing_date(), &passing_expected(), &thresholds);
    assert!(report.persons_entitled.passed);
    assert!(report.persons_entitled.score.unwrap_or(100) < 80);
}

#[test]
fn legacy_scaling_still_rejects_disjoint_persons_entitled() {
    let mut fields = passing_fields();
    fields.persons_entitled = Some("XYZ".to_string());
    let thresholds = MatchThresholds {
        persons_entitled_scaling: ScoreScaling::Legacy,
        ..MatchThresholds::default()
    };

    let report = evaluate_match(&fields, &passing_date(), &passing_expected(), &thresholds);
    assert!(!report.persons_entitled.passed);
}

#[test]
fn end_to_end_document_matches_expected_row() {
    let pages = vec![SAMPLE_DOCUMENT.to_string()];
    let fields = extractor().extract_document(&pages);
    let date = parse_input_date("1 January 2020").expect("date should parse");
    let expected = ExpectedFields::new("acme ltd", "big bank", "a fixed charge over assets");

    let report = evaluate_match(&fields, &date, &expected, &MatchThresholds::default());
    assert!(report.is_match(), "{}", report.failure_summary());
}
