// sentinel-core/src/validators.rs
//! Programmatic validation functions for specific sensitive data types.
//!
//! These checks run after a regex pattern has matched and reduce false
//! positives by applying structural rules the pattern alone cannot express
//! (checksum digits, known-invalid ranges).
//!
//! License: MIT OR APACHE 2.0

/// Validate an SSN candidate against US Social Security Administration rules.
///
/// Expects the "XXX-XX-XXXX" shape the matching pattern produces and rejects
/// the structurally invalid area/group/serial values.
pub fn is_valid_ssn(ssn: &str) -> bool {
    let mut parts = ssn.split('-');

    let (Some(area), Some(group), Some(serial), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    if area.len() != 3 || group.len() != 2 || serial.len() != 4 {
        return false;
    }

    let Ok(area_num) = area.parse::<u16>() else { return false };
    let Ok(group_num) = group.parse::<u8>() else { return false };
    let Ok(serial_num) = serial.parse::<u16>() else { return false };

    let invalid_area = area_num == 0 || area_num == 666 || area_num >= 900;
    let invalid_group = group_num == 0;
    let invalid_serial = serial_num == 0;

    !(invalid_area || invalid_group || invalid_serial)
}

/// Validate a number using the Luhn algorithm.
pub fn is_valid_luhn(num_str: &str) -> bool {
    let mut sum = 0;
    let mut alternate = false;

    for c in num_str.chars().rev() {
        let Some(mut digit) = c.to_digit(10) else { return false };

        if alternate {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        alternate = !alternate;
    }

    sum % 10 == 0
}

/// Validate a credit card candidate: strip separators, then Luhn-check.
pub fn is_valid_credit_card(cc_number: &str) -> bool {
    let digits: String = cc_number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return false;
    }
    is_valid_luhn(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ssn() {
        assert!(is_valid_ssn("123-45-6789"));
    }

    #[test]
    fn test_invalid_ssn_patterns() {
        assert!(!is_valid_ssn("000-45-6789"));
        assert!(!is_valid_ssn("666-45-6789"));
        assert!(!is_valid_ssn("900-45-6789"));
        assert!(!is_valid_ssn("123-00-6789"));
        assert!(!is_valid_ssn("123-45-0000"));
        assert!(!is_valid_ssn("12345-6789"));
    }

    #[test]
    fn test_luhn_valid_card() {
        // Standard test card numbers.
        assert!(is_valid_credit_card("4111111111111111"));
        assert!(is_valid_credit_card("4111-1111-1111-1111"));
        assert!(is_valid_credit_card("5500 0000 0000 0004"));
    }

    #[test]
    fn test_luhn_invalid_card() {
        assert!(!is_valid_credit_card("4111111111111112"));
        assert!(!is_valid_credit_card("not a number"));
    }
}
