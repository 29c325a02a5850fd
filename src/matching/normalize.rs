/// Collapses every whitespace run (newlines included) to a single space and
/// upper-cases the result.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_text;
    use proptest::prelude::*;

    #[test]
    fn normalize_text_joins_lines_and_upper_cases() {
        let raw = "Company name:  Acme\n\nLtd\t Company number: 123\n";
        assert_eq!(
            normalize_text(raw),
            "COMPANY NAME: ACME LTD COMPANY NUMBER: 123"
        );
    }

    #[test]
    fn normalize_text_of_blank_input_is_empty() {
        assert_eq!(normalize_text(" \n\t\n"), "");
    }

    proptest! {
        #[test]
        fn normalize_text_is_idempotent(raw in "[a-zA-Z0-9ßé:/ \\t\\n]{0,120}") {
            let once = normalize_text(&raw);
            prop_assert_eq!(normalize_text(&once), once);
        }
    }
}
