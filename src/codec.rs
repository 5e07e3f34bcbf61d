//! Counter codec and compact range-string parsing.
//!
//! The counter codec maps non-negative integers onto spreadsheet-style
//! column labels ("A".."Z", "AA", ...), bijective base-26 with no zero
//! digit. The range parser turns compact expressions such as `"A-C,F"` or
//! `"1-3,6"` into sorted, deduplicated zero-based index lists.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, TableError};

static ALPHA_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)([A-Z]+[-,])*[A-Z]+$").unwrap());
static NUMERIC_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+[-,])*\d+$").unwrap());

/// Spreadsheet-style label for a zero-based counter: 0 -> "A", 25 -> "Z",
/// 26 -> "AA".
pub fn int_to_alpha(value: usize) -> String {
    if value < 26 {
        char::from(b'A' + value as u8).to_string()
    } else {
        let mut label = int_to_alpha(value / 26 - 1);
        label.push(char::from(b'A' + (value % 26) as u8));
        label
    }
}

/// Inverse of [`int_to_alpha`], case-insensitive.
///
/// Fails with [`TableError::InvalidFormat`] on empty or non-alphabetic
/// input.
pub fn alpha_to_int(label: &str) -> Result<usize> {
    if label.is_empty() {
        return Err(TableError::InvalidFormat(
            "empty counter label".to_string(),
        ));
    }
    let mut value: usize = 0;
    for c in label.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(TableError::InvalidFormat(format!(
                "non-alphabetic character '{c}' in counter label '{label}'"
            )));
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize;
        value = value * 26 + digit + 1;
    }
    Ok(value - 1)
}

/// Parse a compact range expression into zero-based indices.
///
/// Comma-separated tokens, each a single index or an inclusive `lo-hi`
/// span. Numeric tokens are 1-based; alphabetic tokens go through the
/// counter codec and are already 0-based. Whitespace is stripped before
/// validation and an empty string yields an empty list. The output is
/// deduplicated and sorted ascending.
///
/// An inverted span (`hi < lo`) silently expands to nothing; callers that
/// consider this a hard error must check for the indices they expected.
pub fn parse_range(text: &str, alpha: bool) -> Result<Vec<usize>> {
    let scratch: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if scratch.is_empty() {
        return Ok(Vec::new());
    }

    let valid = if alpha { &*ALPHA_RANGE } else { &*NUMERIC_RANGE };
    if !valid.is_match(&scratch) {
        return Err(TableError::InvalidFormat(format!(
            "range string '{text}' does not match the expected grammar"
        )));
    }

    let mut indices: Vec<usize> = Vec::new();
    for token in scratch.split(',') {
        match token.split_once('-') {
            Some((lo, hi)) => {
                let begin = token_to_index(lo, alpha)?;
                let end = token_to_index(hi, alpha)?;
                indices.extend(begin..=end);
            }
            None => indices.push(token_to_index(token, alpha)?),
        }
    }

    Ok(indices.into_iter().sorted().dedup().collect())
}

fn token_to_index(token: &str, alpha: bool) -> Result<usize> {
    if alpha {
        alpha_to_int(token)
    } else {
        let value: usize = token.parse().map_err(|_| {
            TableError::InvalidFormat(format!("invalid numeric range token '{token}'"))
        })?;
        if value == 0 {
            return Err(TableError::InvalidFormat(
                "numeric range tokens are 1-based".to_string(),
            ));
        }
        Ok(value - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_to_alpha() {
        assert_eq!(int_to_alpha(0), "A");
        assert_eq!(int_to_alpha(25), "Z");
        assert_eq!(int_to_alpha(26), "AA");
        assert_eq!(int_to_alpha(51), "AZ");
        assert_eq!(int_to_alpha(52), "BA");
        assert_eq!(int_to_alpha(701), "ZZ");
        assert_eq!(int_to_alpha(702), "AAA");
    }

    #[test]
    fn test_alpha_to_int() {
        assert_eq!(alpha_to_int("A").unwrap(), 0);
        assert_eq!(alpha_to_int("z").unwrap(), 25);
        assert_eq!(alpha_to_int("AA").unwrap(), 26);
        assert_eq!(alpha_to_int("ABA").unwrap(), 728);
    }

    #[test]
    fn test_alpha_to_int_rejects_bad_input() {
        assert!(matches!(
            alpha_to_int(""),
            Err(TableError::InvalidFormat(_))
        ));
        assert!(matches!(
            alpha_to_int("A1"),
            Err(TableError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_codec_round_trip() {
        for i in 0..1000 {
            assert_eq!(alpha_to_int(&int_to_alpha(i)).unwrap(), i);
        }
    }

    #[test]
    fn test_parse_range_empty() {
        assert_eq!(parse_range("", true).unwrap(), Vec::<usize>::new());
        assert_eq!(parse_range("  ", false).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_parse_range_alpha() {
        assert_eq!(parse_range("A-C,F", true).unwrap(), vec![0, 1, 2, 5]);
        assert_eq!(parse_range("a-c, f", true).unwrap(), vec![0, 1, 2, 5]);
    }

    #[test]
    fn test_parse_range_numeric() {
        assert_eq!(parse_range("1-3,6", false).unwrap(), vec![0, 1, 2, 5]);
        assert_eq!(parse_range("6,1-3,2", false).unwrap(), vec![0, 1, 2, 5]);
    }

    #[test]
    fn test_parse_range_malformed() {
        assert!(matches!(
            parse_range("A-", true),
            Err(TableError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_range("1,,2", false),
            Err(TableError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_range("A-C", false),
            Err(TableError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_range_inverted_span_is_empty() {
        // Mirrors the historical behavior: an inverted span contributes
        // nothing rather than erroring.
        assert_eq!(parse_range("C-A", true).unwrap(), Vec::<usize>::new());
        assert_eq!(parse_range("C-A,F", true).unwrap(), vec![5]);
    }
}
