//! Segmenting the diagnosis list and decoding its line items

use crate::error::ParseError;

/// Opens the inline likelihood annotation of a diagnosis line
pub const LIKELIHOOD_MARKER: &str = "(Likelihood: ";

/// Separates the ordinal from the diagnosis name
const ORDINAL_SEPARATOR: &str = ". ";

/// A diagnosis line split into name and likelihood
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedItem {
    /// 1-based position among the non-blank lines
    pub index: usize,
    pub name: String,
    pub likelihood: String,
}

impl DecodedItem {
    /// The `"<index>. <name>"` heading that introduces this item's rationale
    pub fn heading(&self) -> String {
        format!("{}. {}", self.index, self.name)
    }
}

/// Split the diagnosis block into trimmed, non-blank lines numbered from 1.
///
/// The iterator is lazy and `Clone`, so it can be walked more than once.
pub fn segment(diagnosis_text: &str) -> impl Iterator<Item = (usize, &str)> + Clone {
    diagnosis_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| (i + 1, line))
}

/// Decode one `"<N>. <Name> (Likelihood: <Label>)"` line.
pub fn decode_item(index: usize, line: &str) -> Result<DecodedItem, ParseError> {
    let malformed = |reason: &'static str| ParseError::MalformedItem {
        index,
        line: line.to_string(),
        reason,
    };

    let (name_segment, rest) = line
        .split_once(LIKELIHOOD_MARKER)
        .ok_or_else(|| malformed("missing likelihood marker"))?;

    let (_, raw_name) = name_segment
        .split_once(ORDINAL_SEPARATOR)
        .ok_or_else(|| malformed("missing ordinal separator"))?;

    let name = raw_name.trim();
    if name.is_empty() {
        return Err(malformed("empty diagnosis name"));
    }

    // Up to the closing parenthesis, or the rest of the line if it was cut off
    let likelihood_segment = rest.find(')').map_or(rest, |end| &rest[..end]);
    let likelihood = likelihood_segment.trim_end_matches(')').trim();

    Ok(DecodedItem {
        index,
        name: name.to_string(),
        likelihood: likelihood.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_drops_blank_lines_and_numbers_the_rest() {
        let text = "\n  1. Influenza (Likelihood: High)  \n\n\t\n2. Common Cold (Likelihood: Low)\r\n";
        let lines: Vec<_> = segment(text).collect();
        assert_eq!(
            lines,
            vec![
                (1, "1. Influenza (Likelihood: High)"),
                (2, "2. Common Cold (Likelihood: Low)"),
            ]
        );
    }

    #[test]
    fn test_segment_is_restartable() {
        let lines = segment("a\nb\nc");
        assert_eq!(lines.clone().count(), 3);
        assert_eq!(lines.last(), Some((3, "c")));
    }

    #[test]
    fn test_segment_empty_input() {
        assert_eq!(segment("").count(), 0);
        assert_eq!(segment(" \n \n").count(), 0);
    }

    #[test]
    fn test_decode_item() {
        let item = decode_item(1, "1. Influenza (Likelihood: High)").unwrap();
        assert_eq!(item.index, 1);
        assert_eq!(item.name, "Influenza");
        assert_eq!(item.likelihood, "High");
        assert_eq!(item.heading(), "1. Influenza");
    }

    #[test]
    fn test_decode_item_keeps_later_periods_in_name() {
        let item = decode_item(2, "2. St. Louis Encephalitis (Likelihood: Low)").unwrap();
        assert_eq!(item.name, "St. Louis Encephalitis");
    }

    #[test]
    fn test_decode_item_trims_label_whitespace() {
        let item = decode_item(3, "3.  Acute Otitis Media   (Likelihood:  Moderate )").unwrap();
        assert_eq!(item.name, "Acute Otitis Media");
        assert_eq!(item.likelihood, "Moderate");
    }

    #[test]
    fn test_decode_item_unclosed_annotation() {
        let item = decode_item(1, "1. Migraine (Likelihood: Moderate").unwrap();
        assert_eq!(item.likelihood, "Moderate");
    }

    #[test]
    fn test_decode_item_ignores_text_after_annotation() {
        let item = decode_item(1, "1. Migraine (Likelihood: Moderate) - see notes").unwrap();
        assert_eq!(item.likelihood, "Moderate");
    }

    #[test]
    fn test_decode_item_missing_marker() {
        let err = decode_item(4, "4. Dehydration - likely").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedItem {
                index: 4,
                line: "4. Dehydration - likely".to_string(),
                reason: "missing likelihood marker",
            }
        );
    }

    #[test]
    fn test_decode_item_missing_ordinal() {
        let err = decode_item(1, "Influenza (Likelihood: High)").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedItem {
                reason: "missing ordinal separator",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_item_empty_name() {
        let err = decode_item(1, "1.  (Likelihood: High)").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedItem {
                reason: "empty diagnosis name",
                ..
            }
        ));
    }
}
