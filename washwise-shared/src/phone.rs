//! Philippine mobile number normalisation.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid Philippine phone number: {0}")]
pub struct InvalidPhoneNumber(pub String);

/// Normalise a Philippine number to E.164 (`+63XXXXXXXXXX`).
///
/// Accepts `09XXXXXXXXX`, `9XXXXXXXXX`, `639XXXXXXXXX` and `+63...`, ignoring
/// spaces, dashes and parentheses.
pub fn format_ph_number(raw: &str) -> Result<String, InvalidPhoneNumber> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    let national = match (digits.len(), digits.as_bytes().first()) {
        (11, Some(b'0')) => &digits[1..],
        (10, Some(b'9')) => &digits[..],
        (12, _) if digits.starts_with("63") => &digits[2..],
        _ => return Err(InvalidPhoneNumber(raw.to_string())),
    };

    Ok(format!("+63{}", national))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_shapes() {
        assert_eq!(format_ph_number("0912 345 6789").unwrap(), "+639123456789");
        assert_eq!(format_ph_number("9123456789").unwrap(), "+639123456789");
        assert_eq!(format_ph_number("+63 912-345-6789").unwrap(), "+639123456789");
        assert_eq!(format_ph_number("639123456789").unwrap(), "+639123456789");
    }

    #[test]
    fn test_rejected_shapes() {
        assert!(format_ph_number("").is_err());
        assert!(format_ph_number("12345").is_err());
        assert!(format_ph_number("1912345678").is_err());
    }
}
