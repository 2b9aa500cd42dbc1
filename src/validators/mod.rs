//! Checksum and format validators for candidate identifiers.
//!
//! Pure, deterministic predicates over candidate strings. The credit-card
//! recognizer and most provincial health-number recognizers gate their
//! matches on these; an invalid candidate is dropped before merging.

use once_cell::sync::Lazy;
use regex::Regex;

static RAMQ_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{4}\d{8}$").expect("valid RAMQ format regex"));

static MB_FAMILY_REG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]\d{5}$").expect("valid MB family registration regex"));

static NT_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[HD]\d{7}$").expect("valid NT format regex"));

/// Modulus-10 (Luhn) checksum validation.
///
/// Returns `false` for empty input or input containing non-digits.
pub fn luhn_check(digits: &str) -> bool {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let total: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let mut n = u32::from(b - b'0');
            if i % 2 == 1 {
                n *= 2;
                if n > 9 {
                    n -= 9;
                }
            }
            n
        })
        .sum();

    total % 10 == 0
}

/// Strip everything but ASCII digits.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Strip non-alphanumeric characters and uppercase the rest.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Province-specific health-number validator.
///
/// One variant per province and territory; selected by two-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvinceValidator {
    /// Ontario health card numbers (OHIP): 10 digits, Luhn
    Ontario,
    /// British Columbia personal health numbers: 10 digits, Luhn
    BritishColumbia,
    /// Quebec RAMQ: four letters + YYMMDD + sequence, month/day ranges
    Quebec,
    /// Alberta personal health numbers: 9 digits, Luhn
    Alberta,
    /// Saskatchewan health services numbers: 9 digits, Luhn
    Saskatchewan,
    /// Manitoba PHIN: 9 digits Luhn, or a letter + 5 digit family number
    Manitoba,
    /// Nova Scotia health card numbers: 10 digits, Luhn
    NovaScotia,
    /// New Brunswick Medicare numbers: 9 digits, Luhn
    NewBrunswick,
    /// Newfoundland and Labrador MCP numbers: 12 digits
    Newfoundland,
    /// Prince Edward Island health numbers: 8 or 10 digits, Luhn
    PrinceEdwardIsland,
    /// Northwest Territories: H or D followed by 7 digits
    NorthwestTerritories,
    /// Nunavut health numbers: 9 digits starting with 1
    Nunavut,
    /// Yukon YHCIP numbers: 9 digits
    Yukon,
}

impl ProvinceValidator {
    /// Look up the validator for a two-letter province code.
    pub fn for_code(code: &str) -> Option<ProvinceValidator> {
        match code {
            "ON" => Some(Self::Ontario),
            "BC" => Some(Self::BritishColumbia),
            "QC" => Some(Self::Quebec),
            "AB" => Some(Self::Alberta),
            "SK" => Some(Self::Saskatchewan),
            "MB" => Some(Self::Manitoba),
            "NS" => Some(Self::NovaScotia),
            "NB" => Some(Self::NewBrunswick),
            "NL" => Some(Self::Newfoundland),
            "PE" => Some(Self::PrinceEdwardIsland),
            "NT" => Some(Self::NorthwestTerritories),
            "NU" => Some(Self::Nunavut),
            "YT" => Some(Self::Yukon),
            _ => None,
        }
    }

    /// Validate format and checksum for a candidate health number.
    pub fn validate(&self, text: &str) -> bool {
        match self {
            Self::Ontario | Self::BritishColumbia | Self::NovaScotia => {
                let digits = digits_only(text);
                digits.len() == 10 && luhn_check(&digits)
            }
            Self::Alberta | Self::Saskatchewan | Self::NewBrunswick => {
                let digits = digits_only(text);
                digits.len() == 9 && luhn_check(&digits)
            }
            Self::Quebec => validate_ramq(text),
            Self::Manitoba => {
                if MB_FAMILY_REG.is_match(&sanitize(text)) {
                    return true;
                }
                let digits = digits_only(text);
                digits.len() == 9 && luhn_check(&digits)
            }
            Self::Newfoundland => digits_only(text).len() == 12,
            Self::PrinceEdwardIsland => {
                let digits = digits_only(text);
                matches!(digits.len(), 8 | 10) && luhn_check(&digits)
            }
            Self::NorthwestTerritories => NT_FORMAT.is_match(&sanitize(text)),
            Self::Nunavut => {
                let digits = digits_only(text);
                digits.len() == 9 && digits.starts_with('1')
            }
            Self::Yukon => digits_only(text).len() == 9,
        }
    }
}

/// RAMQ format: LLLL YYMMDD SS, where MM is 1-12 (male) or 51-62 (female)
/// and DD is 1-31. Month lengths are not checked.
fn validate_ramq(text: &str) -> bool {
    let s = sanitize(text);
    if !RAMQ_FORMAT.is_match(&s) {
        return false;
    }

    let month: u32 = s[6..8].parse().unwrap_or(0);
    let day: u32 = s[8..10].parse().unwrap_or(0);

    let valid_month = (1..=12).contains(&month) || (51..=62).contains(&month);
    let valid_day = (1..=31).contains(&day);

    valid_month && valid_day
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luhn_known_valid() {
        assert!(luhn_check("79927398713"));
        assert!(luhn_check("4111111111111111"));
        assert!(luhn_check("1234567897"));
    }

    #[test]
    fn test_luhn_known_invalid() {
        assert!(!luhn_check("79927398710"));
        assert!(!luhn_check("1234567890"));
        assert!(!luhn_check(""));
        assert!(!luhn_check("12a4"));
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("1234-567-897 XY"), "1234567897");
        assert_eq!(digits_only("no digits"), "");
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("tre n-1234 5678"), "TREN12345678");
    }

    #[test]
    fn test_ontario_validator() {
        let v = ProvinceValidator::for_code("ON").unwrap();
        assert!(v.validate("1234-567-897"));
        assert!(v.validate("1234567897 XY"));
        assert!(!v.validate("1234-567-890"));
        assert!(!v.validate("123456789"));
    }

    #[test]
    fn test_nine_digit_luhn_validators() {
        // 123456782 is Luhn-valid: 2+8+7+3+5+1+3+4+2 with doubling = 40
        for code in ["AB", "SK", "NB"] {
            let v = ProvinceValidator::for_code(code).unwrap();
            assert!(v.validate("123-456-782"), "{code} accepts valid");
            assert!(!v.validate("123-456-789"), "{code} rejects invalid");
        }
    }

    #[test]
    fn test_quebec_ramq() {
        let v = ProvinceValidator::Quebec;
        assert!(v.validate("TREN 8503 0512"));
        // female month encoding
        assert!(v.validate("TREN 8555 0512"));
        assert!(!v.validate("TREN 8513 0512"));
        assert!(!v.validate("TREN 8503 3212"));
        assert!(!v.validate("TRE8 8503 0512"));
    }

    #[test]
    fn test_manitoba_family_registration() {
        let v = ProvinceValidator::Manitoba;
        assert!(v.validate("A12345"));
        assert!(v.validate("123456782"));
        assert!(!v.validate("AB1234"));
    }

    #[test]
    fn test_newfoundland_length_only() {
        let v = ProvinceValidator::Newfoundland;
        assert!(v.validate("123456789012"));
        assert!(!v.validate("12345678901"));
    }

    #[test]
    fn test_pei_dual_length() {
        let v = ProvinceValidator::PrinceEdwardIsland;
        // 8 digits: 12345674 passes Luhn
        assert!(v.validate("12345674"));
        assert!(v.validate("1234567897"));
        assert!(!v.validate("123456789"));
    }

    #[test]
    fn test_territorial_formats() {
        assert!(ProvinceValidator::NorthwestTerritories.validate("H1234567"));
        assert!(ProvinceValidator::NorthwestTerritories.validate("d1234567"));
        assert!(!ProvinceValidator::NorthwestTerritories.validate("X1234567"));

        assert!(ProvinceValidator::Nunavut.validate("123456789"));
        assert!(!ProvinceValidator::Nunavut.validate("223456789"));

        assert!(ProvinceValidator::Yukon.validate("987-654-321"));
        assert!(!ProvinceValidator::Yukon.validate("98765432"));
    }

    #[test]
    fn test_unknown_province_code() {
        assert!(ProvinceValidator::for_code("XX").is_none());
    }
}
