//! Name normalization across casing and separator conventions.
//!
//! `Report_Created`, `report.created`, `report-created`, `ReportCreated` and
//! `reportCreated` all normalize to `report created`.
//!
//! Tokens split on whitespace, `.`, `_`, `-`, and camelCase/PascalCase
//! boundaries. An uppercase run followed by a capitalized word splits
//! before the last capital (`HTTPRequest` -> `http request`). Digits stay
//! attached to the letters before them (`v2Upgraded` -> `v2 upgraded`).

/// Split a name into lower-cased tokens.
pub fn tokens(name: &str) -> Vec<String> {
    let mut out = Vec::new();
    for chunk in name.split(is_separator) {
        split_case(chunk, &mut out);
    }
    out
}

/// Canonical comparison form of a name: lower-cased tokens joined by one space.
///
/// Pure and total; the empty string normalizes to the empty string.
pub fn normalize(name: &str) -> String {
    tokens(name).join(" ")
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | '_' | '-')
}

fn split_case(chunk: &str, out: &mut Vec<String>) {
    let chars: Vec<char> = chunk.chars().collect();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_numeric()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }

    if !current.is_empty() {
        out.push(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convention_variants_agree() {
        for name in [
            "Report_Created",
            "report.created",
            "ReportCreated",
            "reportCreated",
            "report-created",
            "report created",
            "REPORT_CREATED",
        ] {
            assert_eq!(normalize(name), "report created", "input: {name}");
        }
    }

    #[test]
    fn test_empty_and_separator_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("._- "), "");
        assert!(tokens("").is_empty());
    }

    #[test]
    fn test_acronym_boundary() {
        assert_eq!(normalize("HTTPRequestSent"), "http request sent");
        assert_eq!(normalize("exportCSV"), "export csv");
    }

    #[test]
    fn test_digits_stay_with_preceding_letters() {
        assert_eq!(normalize("v2Upgraded"), "v2 upgraded");
        assert_eq!(normalize("plan_v2.upgraded"), "plan v2 upgraded");
    }

    #[test]
    fn test_repeated_separators_collapse() {
        assert_eq!(normalize("  video__created..now "), "video created now");
    }

    #[test]
    fn test_other_punctuation_is_kept() {
        assert_eq!(normalize("page:viewed"), "page:viewed");
    }
}
