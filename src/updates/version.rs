//! Loose version comparison.
//!
//! Store pages print versions like `V 1.4.0`, `v1.2b` or `Build 42`, so this
//! is not a SemVer comparison. Strings are split into digit, letter and
//! separator runs and compared run by run. Digits and letters outside ASCII
//! count too, so `1.é` is a word and `١٠` is ten.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

/// A classified run of a version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionToken {
    /// Digits, stored without leading zeros so any length compares exactly.
    Numeric(String),
    /// Letters, lowercased.
    Alpha(String),
    /// Anything else.
    Separator(String),
}

impl VersionToken {
    fn tier(&self) -> u8 {
        match self {
            VersionToken::Numeric(_) => 0,
            VersionToken::Alpha(_) => 1,
            VersionToken::Separator(_) => 2,
        }
    }
}

impl Ord for VersionToken {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (VersionToken::Numeric(a), VersionToken::Numeric(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (VersionToken::Alpha(a), VersionToken::Alpha(b))
            | (VersionToken::Separator(a), VersionToken::Separator(b)) => a.cmp(b),
            _ => self.tier().cmp(&other.tier()),
        }
    }
}

impl PartialOrd for VersionToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Digit runs, ASCII letter runs, and everything else, matched leftmost first.
static RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)|([A-Za-z]+)|([^A-Za-z0-9]+)").expect("run pattern is valid")
});

/// A single Unicode decimal digit (general category Nd).
static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d$").expect("digit pattern is valid"));

fn is_decimal(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL.is_match(c.encode_utf8(&mut buf))
}

/// ASCII digit for any decimal digit. Nd digits come in contiguous blocks
/// of ten starting at zero, so the value is the offset into the block.
fn ascii_digit(c: char) -> char {
    if c.is_ascii_digit() {
        return c;
    }

    let mut zero = c as u32;
    while let Some(prev) = zero.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal(prev) {
            break;
        }
        zero -= 1;
    }
    let offset = ((c as u32 - zero) % 10) as u8;
    char::from(b'0' + offset)
}

fn numeric(run: &str) -> VersionToken {
    let digits: String = run
        .chars()
        .map(ascii_digit)
        .skip_while(|d| *d == '0')
        .collect();
    VersionToken::Numeric(if digits.is_empty() { "0".to_string() } else { digits })
}

/// Split a version string into maximal digit, letter and separator runs.
///
/// Digit runs take any Unicode decimal digits. A run of other characters
/// counts as a word when every character in it is alphabetic.
pub fn tokenize(version: &str) -> Vec<VersionToken> {
    RUN.captures_iter(version)
        .filter_map(|caps| {
            if let Some(digits) = caps.get(1) {
                Some(numeric(digits.as_str()))
            } else if let Some(word) = caps.get(2) {
                Some(VersionToken::Alpha(word.as_str().to_ascii_lowercase()))
            } else {
                caps.get(3).map(|other| {
                    let run = other.as_str();
                    if run.chars().all(char::is_alphabetic) {
                        VersionToken::Alpha(run.to_lowercase())
                    } else {
                        VersionToken::Separator(run.to_string())
                    }
                })
            }
        })
        .collect()
}

/// Compare two version strings.
///
/// Tokens are compared pairwise; numbers sort before words, words before
/// separators. When one string is a prefix of the other the longer one is
/// greater, so `"1.0."` > `"1.0"`. The empty string sorts lowest.
pub fn compare(a: &str, b: &str) -> Ordering {
    let left = tokenize(a);
    let right = tokenize(b);

    left.iter()
        .zip(right.iter())
        .map(|(l, r)| l.cmp(r))
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or_else(|| left.len().cmp(&right.len()))
}
