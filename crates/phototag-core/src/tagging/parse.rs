//! Turning the model's free-text answer into a keyword list.
//!
//! Rule: split on commas and line breaks, then normalize each piece until it
//! stops changing:
//! - trim whitespace and collapse inner runs of whitespace
//! - strip leading list markers (`-`, `*`, `•`, `1.`, `1)`)
//! - strip surrounding double quotes and backticks
//! - strip trailing periods
//! - lowercase
//!
//! Empty pieces are dropped; order and duplicates are kept. Because every
//! piece is normalized to a fixpoint and can no longer contain a separator,
//! parsing `tags.join(", ")` gives back `tags`.

/// Parse a model response into keywords.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split([',', '\n', '\r'])
        .map(normalize)
        .filter(|t| !t.is_empty())
        .collect()
}

fn normalize(piece: &str) -> String {
    let mut current = piece.to_string();
    loop {
        let next = normalize_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn normalize_once(piece: &str) -> String {
    let s = piece.trim();
    let s = strip_list_marker(s);
    let s = s.trim_matches(|c| c == '"' || c == '`');
    let s = s.trim_end_matches('.');
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Remove one leading bullet or enumeration marker.
fn strip_list_marker(s: &str) -> &str {
    if let Some(rest) = s.strip_prefix(['-', '*', '•']) {
        return rest;
    }

    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        let rest = &s[digits..];
        if let Some(after) = rest.strip_prefix(['.', ')']) {
            if after.is_empty() || after.starts_with(char::is_whitespace) {
                return after;
            }
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_comma_separated() {
        assert_eq!(
            parse_tags("Beach, Sunset ,ocean,  golden hour"),
            strings(&["beach", "sunset", "ocean", "golden hour"])
        );
    }

    #[test]
    fn test_newline_separated_list() {
        let raw = "1. Beach\n2) sunset\n- ocean\n* palm trees\n• Waves.";
        assert_eq!(
            parse_tags(raw),
            strings(&["beach", "sunset", "ocean", "palm trees", "waves"])
        );
    }

    #[test]
    fn test_mixed_separators_and_crlf() {
        assert_eq!(
            parse_tags("beach, sunset\r\nocean,\r\n,travel"),
            strings(&["beach", "sunset", "ocean", "travel"])
        );
    }

    #[test]
    fn test_empty_pieces_dropped() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,\n - , .").is_empty());
    }

    #[test]
    fn test_quotes_and_trailing_period() {
        assert_eq!(
            parse_tags("\"beach\", `sunset`, ocean."),
            strings(&["beach", "sunset", "ocean"])
        );
    }

    #[test]
    fn test_numbers_inside_keywords_kept() {
        assert_eq!(
            parse_tags("3d render, 1950s, 4x4 vehicle, 2.5 stars"),
            strings(&["3d render", "1950s", "4x4 vehicle", "2.5 stars"])
        );
    }

    #[test]
    fn test_duplicates_and_order_kept() {
        assert_eq!(
            parse_tags("dog, cat, dog"),
            strings(&["dog", "cat", "dog"])
        );
    }

    #[test]
    fn test_inner_whitespace_collapsed() {
        assert_eq!(parse_tags("golden    hour"), strings(&["golden hour"]));
    }

    #[test]
    fn test_nested_markers_normalized_fully() {
        // Marker hidden behind a quote must not survive one pass
        assert_eq!(parse_tags("\"- beach\""), strings(&["beach"]));
        assert_eq!(parse_tags("- - beach"), strings(&["beach"]));
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let raws = [
            "Beach, Sunset ,ocean",
            "1. Beach\n2) sunset\n- ocean",
            "\"- beach\", `Sunset.`, . , golden   hour",
            "Mediterranean Sea, SAILBOAT, travel & tourism, people's hands",
        ];
        for raw in raws {
            let once = parse_tags(raw);
            let twice = parse_tags(&once.join(", "));
            assert_eq!(once, twice, "not idempotent for {raw:?}");
            let by_line = parse_tags(&once.join("\n"));
            assert_eq!(once, by_line, "not idempotent by line for {raw:?}");
        }
    }
}
