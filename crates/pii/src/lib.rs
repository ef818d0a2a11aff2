//! PII classification over recognized word fragments.
//!
//! Each fragment is tested against a fixed, priority-ordered pattern table;
//! the first matching pattern wins, so a fragment yields at most one match.

use docmask_ocr::{RecognizedWord, WordBox};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// PII category tags.
///
/// Serialized form matches the remote backend contract (`NAME`,
/// `ID_NUMBER`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiType {
    Name,
    IdNumber,
    DateOfBirth,
    Phone,
    Email,
}

impl std::fmt::Display for PiiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PiiType::Name => write!(f, "NAME"),
            PiiType::IdNumber => write!(f, "ID_NUMBER"),
            PiiType::DateOfBirth => write!(f, "DATE_OF_BIRTH"),
            PiiType::Phone => write!(f, "PHONE"),
            PiiType::Email => write!(f, "EMAIL"),
        }
    }
}

/// One entry of the pattern table.
pub struct PiiPattern {
    pub pii_type: PiiType,
    pub regex: Regex,
}

lazy_static! {
    /// Process-wide pattern table, tested in priority order.
    ///
    /// The NAME pattern is defined over two space-separated tokens
    /// (Devanagari or capitalized Latin) while classification runs on single
    /// fragments, so it only fires when the engine returns a fragment with
    /// an embedded space.
    pub static ref PII_PATTERNS: Vec<PiiPattern> = vec![
        PiiPattern {
            pii_type: PiiType::Name,
            regex: Regex::new(
                r"[\x{0900}-\x{097F}]{2,}\s+[\x{0900}-\x{097F}]{2,}|[A-Z][a-z]+\s+[A-Z][a-z]+",
            )
            .expect("invalid NAME pattern"),
        },
        PiiPattern {
            pii_type: PiiType::IdNumber,
            regex: Regex::new(r"\b[0-9]{4}\s?[0-9]{4}\s?[0-9]{4}\b")
                .expect("invalid ID_NUMBER pattern"),
        },
        PiiPattern {
            pii_type: PiiType::DateOfBirth,
            regex: Regex::new(
                r"\b(0[1-9]|[12][0-9]|3[01])[-/.](0[1-9]|1[012])[-/.](19|20)\d\d\b",
            )
            .expect("invalid DATE_OF_BIRTH pattern"),
        },
        PiiPattern {
            pii_type: PiiType::Phone,
            regex: Regex::new(r"\b[6-9][0-9]{9}\b").expect("invalid PHONE pattern"),
        },
        PiiPattern {
            pii_type: PiiType::Email,
            regex: Regex::new(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b")
                .expect("invalid EMAIL pattern"),
        },
    ];
}

/// A classified fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiMatch {
    pub text: String,
    #[serde(rename = "type")]
    pub pii_type: PiiType,
    pub bbox: WordBox,
}

/// Classify recognized fragments against the pattern table.
///
/// Words are trimmed first; empty fragments contribute nothing. Output
/// order follows input order.
pub fn classify(words: &[RecognizedWord]) -> Vec<PiiMatch> {
    let mut matches = Vec::new();

    for word in words {
        let text = word.text.trim();
        if text.is_empty() {
            continue;
        }

        for pattern in PII_PATTERNS.iter() {
            if pattern.regex.is_match(text) {
                log::debug!(
                    "[Classify] {} detected: {}",
                    pattern.pii_type,
                    mask_snippet(text)
                );
                matches.push(PiiMatch {
                    text: text.to_string(),
                    pii_type: pattern.pii_type,
                    bbox: word.bbox,
                });
                break;
            }
        }
    }

    log::info!("[Classify] {} of {} fragments classified as PII", matches.len(), words.len());
    matches
}

/// Mask a sensitive value for log and report output.
pub fn mask_snippet(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    if len <= 4 {
        "*".repeat(len)
    } else {
        let visible = 4.min(len / 3);
        let prefix: String = chars[..visible].iter().collect();
        let suffix: String = chars[len - visible..].iter().collect();
        format!("{}****{}", prefix, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn word(text: &str, bbox: WordBox) -> RecognizedWord {
        RecognizedWord {
            text: text.to_string(),
            confidence: Some(0.9),
            bbox,
        }
    }

    fn classify_one(text: &str) -> Option<PiiType> {
        let words = [word(text, WordBox::new(0, 0, 10, 10))];
        classify(&words).first().map(|m| m.pii_type)
    }

    #[test]
    fn id_number_plain_and_grouped() {
        assert_eq!(classify_one("234523452345"), Some(PiiType::IdNumber));
        assert_eq!(classify_one("2345 2345 2345"), Some(PiiType::IdNumber));
        assert_eq!(classify_one("23452345234"), None); // 11 digits
        assert_eq!(classify_one("2345234523456"), None); // 13 digits
    }

    #[test]
    fn phone_requires_leading_6_to_9() {
        assert_eq!(classify_one("9876543210"), Some(PiiType::Phone));
        assert_eq!(classify_one("5876543210"), None);
        assert_eq!(classify_one("98765432101"), None); // 11 digits
    }

    #[test]
    fn date_of_birth_separators() {
        assert_eq!(classify_one("01-12-1990"), Some(PiiType::DateOfBirth));
        assert_eq!(classify_one("31/01/2005"), Some(PiiType::DateOfBirth));
        assert_eq!(classify_one("15.06.1985"), Some(PiiType::DateOfBirth));
        assert_eq!(classify_one("32-01-1990"), None); // day out of range
        assert_eq!(classify_one("01-13-1990"), None); // month out of range
        assert_eq!(classify_one("01-12-1890"), None); // century out of range
    }

    #[test]
    fn email_is_case_insensitive() {
        assert_eq!(classify_one("ravi.kumar@example.com"), Some(PiiType::Email));
        assert_eq!(classify_one("RAVI@EXAMPLE.ORG"), Some(PiiType::Email));
        assert_eq!(classify_one("not-an-email"), None);
    }

    #[test]
    fn name_needs_two_tokens_in_one_fragment() {
        // Single-token fragments, the usual engine output, never match NAME.
        assert_eq!(classify_one("Ravi"), None);
        assert_eq!(classify_one("Kumar"), None);
        // A fragment with an embedded space does.
        assert_eq!(classify_one("Ravi Kumar"), Some(PiiType::Name));
        assert_eq!(
            classify_one("\u{0930}\u{0935}\u{093F} \u{0915}\u{0941}\u{092E}\u{093E}\u{0930}"),
            Some(PiiType::Name)
        );
        assert_eq!(classify_one("ravi kumar"), None); // not capitalized
    }

    #[test]
    fn priority_id_number_beats_phone() {
        // Fragment matching both the ID and phone patterns classifies as the
        // earlier pattern in priority order.
        let matches = classify(&[word(
            "9876543210 2345 2345 2345",
            WordBox::new(0, 0, 100, 10),
        )]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].pii_type, PiiType::IdNumber);
    }

    #[test]
    fn at_most_one_match_per_word() {
        // Contains an ID number, a date and an email in one fragment.
        let matches = classify(&[word(
            "2345 2345 2345 01-12-1990 a@b.com",
            WordBox::new(0, 0, 100, 10),
        )]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].pii_type, PiiType::IdNumber);
    }

    #[test]
    fn classification_is_deterministic_and_ordered() {
        let words = vec![
            word("Ravi Kumar", WordBox::new(10, 10, 80, 20)),
            word("skip", WordBox::new(10, 25, 40, 35)),
            word("234523452345", WordBox::new(10, 40, 90, 50)),
            word("ravi@example.com", WordBox::new(10, 60, 120, 70)),
        ];

        let first = classify(&words);
        let second = classify(&words);
        assert_eq!(first, second);

        let types: Vec<PiiType> = first.iter().map(|m| m.pii_type).collect();
        assert_eq!(
            types,
            vec![PiiType::Name, PiiType::IdNumber, PiiType::Email]
        );
        // Bounding boxes pass through untouched.
        assert_eq!(first[1].bbox, WordBox::new(10, 40, 90, 50));
    }

    #[test]
    fn empty_and_whitespace_words_are_skipped() {
        let words = vec![
            word("", WordBox::new(0, 0, 1, 1)),
            word("   ", WordBox::new(0, 0, 1, 1)),
            word("9876543210", WordBox::new(0, 0, 1, 1)),
        ];
        let matches = classify(&words);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "9876543210");
    }

    #[test]
    fn serialized_type_tags_match_wire_contract() {
        let m = PiiMatch {
            text: "234523452345".to_string(),
            pii_type: PiiType::IdNumber,
            bbox: WordBox::new(10, 40, 90, 50),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["type"], "ID_NUMBER");
        assert_eq!(json["bbox"]["x0"], 10);
    }

    #[test]
    fn snippets_are_masked() {
        assert_eq!(mask_snippet("abc"), "***");
        assert_eq!(mask_snippet("234523452345"), "2345****2345");
    }
}
