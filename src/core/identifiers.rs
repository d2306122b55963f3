//! Turkish tax identifier (VKN / TCKN) and IBAN validation.
//!
//! All validators are pure functions: they trim the input, check the format,
//! verify the checksum and return the normalized value on success.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Placeholder TCKN used on e-Arşiv invoices issued to unidentified final
/// consumers. It does not pass the TCKN checksum.
pub const ANONYMOUS_TCKN: &str = "11111111111";

/// Error returned when an identifier fails format or checksum validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IdentifierError {
    /// The input was empty after trimming.
    #[error("identifier is empty")]
    Empty,

    /// The input has the wrong number of characters.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: String, actual: usize },

    /// A non-digit character appeared where only digits are allowed.
    #[error("identifier must contain only digits")]
    NonDigit,

    /// TCKN must not start with 0.
    #[error("TCKN must not start with 0")]
    LeadingZero,

    /// The check digit(s) did not match.
    #[error("checksum mismatch")]
    Checksum,

    /// IBAN country code is not two letters, or a country-specific rule failed.
    #[error("invalid country part: {0}")]
    InvalidCountry(String),

    /// A character outside `[A-Z0-9]` appeared in an IBAN.
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
}

/// A validated Turkish tax identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "UPPERCASE")]
pub enum TaxId {
    /// Vergi Kimlik Numarası: 10 digits, companies.
    Vkn(String),
    /// T.C. Kimlik Numarası: 11 digits, individuals.
    Tckn(String),
}

impl TaxId {
    /// The bare digits.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Vkn(v) | Self::Tckn(v) => v,
        }
    }

    /// Whether this identifies a natural person.
    pub fn is_individual(&self) -> bool {
        matches!(self, Self::Tckn(_))
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn digits_of(value: &str, expected: usize) -> Result<Vec<u32>, IdentifierError> {
    if value.is_empty() {
        return Err(IdentifierError::Empty);
    }
    let actual = value.chars().count();
    if actual != expected {
        return Err(IdentifierError::InvalidLength {
            expected: expected.to_string(),
            actual,
        });
    }
    value
        .chars()
        .map(|c| c.to_digit(10).ok_or(IdentifierError::NonDigit))
        .collect()
}

/// Validate a VKN (corporate tax number, 10 digits).
///
/// Returns the trimmed number on success.
pub fn validate_vkn(vkn: &str) -> Result<String, IdentifierError> {
    let vkn = vkn.trim();
    let digits = digits_of(vkn, 10)?;

    let mut sum = 0u32;
    for (i, &d) in digits[..9].iter().enumerate() {
        let position = i as u32 + 1;
        let t = (d + 10 - position) % 10;
        sum += if t == 9 {
            9
        } else {
            (t * 2u32.pow(10 - position)) % 9
        };
    }

    let check = (10 - sum % 10) % 10;
    if check != digits[9] {
        return Err(IdentifierError::Checksum);
    }
    Ok(vkn.to_string())
}

/// Validate a TCKN (citizen identity number, 11 digits).
///
/// Returns the trimmed number on success.
pub fn validate_tckn(tckn: &str) -> Result<String, IdentifierError> {
    let tckn = tckn.trim();
    let d = digits_of(tckn, 11)?;

    if d[0] == 0 {
        return Err(IdentifierError::LeadingZero);
    }

    let odd = (d[0] + d[2] + d[4] + d[6] + d[8]) as i32;
    let even = (d[1] + d[3] + d[5] + d[7]) as i32;
    let tenth = (odd * 7 - even).rem_euclid(10) as u32;
    let eleventh = (d[..10].iter().sum::<u32>()) % 10;

    if d[9] != tenth || d[10] != eleventh {
        return Err(IdentifierError::Checksum);
    }
    Ok(tckn.to_string())
}

/// Validate a VKN or TCKN, dispatching on length.
pub fn validate_tax_id(tax_id: &str) -> Result<TaxId, IdentifierError> {
    let trimmed = tax_id.trim();
    match trimmed.chars().count() {
        0 => Err(IdentifierError::Empty),
        10 => validate_vkn(trimmed).map(TaxId::Vkn),
        11 => validate_tckn(trimmed).map(TaxId::Tckn),
        n => Err(IdentifierError::InvalidLength {
            expected: "10 (VKN) or 11 (TCKN)".into(),
            actual: n,
        }),
    }
}

/// Countries with a fixed IBAN length that we check explicitly.
/// Sorted for binary search.
static IBAN_LENGTHS: &[(&str, usize)] = &[
    ("AT", 20),
    ("AZ", 28),
    ("BE", 16),
    ("BG", 22),
    ("CH", 21),
    ("CY", 28),
    ("DE", 22),
    ("DK", 18),
    ("ES", 24),
    ("FR", 27),
    ("GB", 22),
    ("GE", 22),
    ("GR", 27),
    ("IT", 27),
    ("NL", 18),
    ("PL", 28),
    ("RO", 24),
    ("SE", 24),
    ("TR", 26),
];

/// Validate an IBAN with the ISO 13616 MOD-97 check.
///
/// Spaces are ignored and letters are upper-cased. Returns the normalized
/// (compact, upper-case) IBAN on success.
pub fn validate_iban(iban: &str) -> Result<String, IdentifierError> {
    let normalized: String = iban
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if normalized.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if let Some(bad) = normalized.chars().find(|c| !c.is_ascii_alphanumeric()) {
        return Err(IdentifierError::InvalidCharacter(bad));
    }
    if !(15..=34).contains(&normalized.len()) {
        return Err(IdentifierError::InvalidLength {
            expected: "15-34".into(),
            actual: normalized.len(),
        });
    }

    let bytes = normalized.as_bytes();
    let country = &normalized[..2];
    if !bytes[0].is_ascii_uppercase() || !bytes[1].is_ascii_uppercase() {
        return Err(IdentifierError::InvalidCountry(country.to_string()));
    }
    if !bytes[2].is_ascii_digit() || !bytes[3].is_ascii_digit() {
        return Err(IdentifierError::InvalidCountry(format!(
            "check digits '{}' must be numeric",
            &normalized[2..4]
        )));
    }

    if let Ok(idx) = IBAN_LENGTHS.binary_search_by(|(cc, _)| (*cc).cmp(country)) {
        let expected = IBAN_LENGTHS[idx].1;
        if normalized.len() != expected {
            return Err(IdentifierError::InvalidLength {
                expected: expected.to_string(),
                actual: normalized.len(),
            });
        }
    }

    // TR: 5-digit bank code, 1 reserved digit (always 0), 16-digit account
    if country == "TR" {
        if !normalized[4..].chars().all(|c| c.is_ascii_digit()) {
            return Err(IdentifierError::NonDigit);
        }
        if bytes[9] != b'0' {
            return Err(IdentifierError::InvalidCountry(
                "TR reserved digit must be 0".into(),
            ));
        }
    }

    if mod97(&normalized[4..], &normalized[..4]) != 1 {
        return Err(IdentifierError::Checksum);
    }
    Ok(normalized)
}

/// Stream the rearranged IBAN (`body` followed by `head`) through MOD-97
/// without materializing the digit expansion.
fn mod97(body: &str, head: &str) -> u32 {
    body.bytes().chain(head.bytes()).fold(0u32, |acc, b| {
        if b.is_ascii_digit() {
            (acc * 10 + u32::from(b - b'0')) % 97
        } else {
            (acc * 100 + u32::from(b - b'A') + 10) % 97
        }
    })
}

/// Format an IBAN in groups of four for display.
///
/// The input is normalized first; no checksum validation is performed.
pub fn format_iban(iban: &str) -> String {
    let compact: Vec<char> = iban
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    compact
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- VKN ---

    #[test]
    fn valid_vkn() {
        assert_eq!(validate_vkn("1234567890").unwrap(), "1234567890");
        assert!(validate_vkn("9876543217").is_ok());
        assert!(validate_vkn("0123456789").is_ok());
    }

    #[test]
    fn vkn_wrong_check_digit() {
        assert_eq!(validate_vkn("1234567891"), Err(IdentifierError::Checksum));
    }

    #[test]
    fn vkn_whitespace_trimmed() {
        assert_eq!(validate_vkn("  1234567890 ").unwrap(), "1234567890");
    }

    #[test]
    fn vkn_letters_rejected() {
        assert_eq!(validate_vkn("12345678A0"), Err(IdentifierError::NonDigit));
    }

    #[test]
    fn vkn_wrong_length() {
        assert!(matches!(
            validate_vkn("123456789"),
            Err(IdentifierError::InvalidLength { actual: 9, .. })
        ));
    }

    #[test]
    fn length_counted_in_characters() {
        assert_eq!(validate_vkn("123456789é"), Err(IdentifierError::NonDigit));
        assert!(matches!(
            validate_vkn("12345é"),
            Err(IdentifierError::InvalidLength { actual: 6, .. })
        ));
        // 10 characters, 11 bytes: still routed to the VKN check
        assert_eq!(validate_tax_id("123456789é"), Err(IdentifierError::NonDigit));
    }

    // --- TCKN ---

    #[test]
    fn valid_tckn() {
        assert!(validate_tckn("10000000146").is_ok());
        assert!(validate_tckn("12345678950").is_ok());
    }

    #[test]
    fn tckn_leading_zero() {
        assert_eq!(
            validate_tckn("01234567890"),
            Err(IdentifierError::LeadingZero)
        );
    }

    #[test]
    fn tckn_bad_eleventh_digit() {
        assert_eq!(
            validate_tckn("10000000147"),
            Err(IdentifierError::Checksum)
        );
    }

    #[test]
    fn anonymous_tckn_fails_checksum() {
        assert_eq!(
            validate_tckn(ANONYMOUS_TCKN),
            Err(IdentifierError::Checksum)
        );
    }

    #[test]
    fn tax_id_dispatch() {
        assert_eq!(
            validate_tax_id("1234567890").unwrap(),
            TaxId::Vkn("1234567890".into())
        );
        let tckn = validate_tax_id("10000000146").unwrap();
        assert!(tckn.is_individual());
        assert!(validate_tax_id("123").is_err());
        assert_eq!(validate_tax_id("   "), Err(IdentifierError::Empty));
    }

    // --- IBAN ---

    #[test]
    fn valid_tr_iban() {
        assert_eq!(
            validate_iban("TR33 0006 1005 1978 6457 8413 26").unwrap(),
            "TR330006100519786457841326"
        );
    }

    #[test]
    fn valid_foreign_ibans() {
        assert!(validate_iban("DE89370400440532013000").is_ok());
        assert!(validate_iban("gb82west12345698765432").is_ok());
    }

    #[test]
    fn iban_checksum_failure() {
        assert_eq!(
            validate_iban("TR000006100519786457841326"),
            Err(IdentifierError::Checksum)
        );
    }

    #[test]
    fn tr_iban_wrong_length() {
        assert!(matches!(
            validate_iban("TR33000610051978645784132"),
            Err(IdentifierError::InvalidLength { actual: 25, .. })
        ));
    }

    #[test]
    fn tr_iban_reserved_digit() {
        assert!(matches!(
            validate_iban("TR330006110519786457841326"),
            Err(IdentifierError::InvalidCountry(_))
        ));
    }

    #[test]
    fn iban_lengths_sorted() {
        for window in IBAN_LENGTHS.windows(2) {
            assert!(
                window[0].0 < window[1].0,
                "IBAN countries not sorted: {} >= {}",
                window[0].0,
                window[1].0
            );
        }
    }

    #[test]
    fn iban_invalid_character() {
        assert_eq!(
            validate_iban("TR33-0006100519786457841326"),
            Err(IdentifierError::InvalidCharacter('-'))
        );
    }

    #[test]
    fn format_groups_of_four() {
        assert_eq!(
            format_iban("tr330006100519786457841326"),
            "TR33 0006 1005 1978 6457 8413 26"
        );
    }
}
