//! Dataset rows: `key=value`.

use std::fmt;

use crate::tenths::Tenths;

/// One row of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub key: String,
    pub value: Tenths,
}

impl Measurement {
    pub fn new(key: impl Into<String>, value: Tenths) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Splits a raw dataset line into key and value.
///
/// The key is everything before the first `=`; it must be non-empty valid
/// UTF-8. The value must match the strict one-decimal grammar. The line must
/// not include its terminator.
///
/// # Examples
///
/// ```
/// use rowbench_core::{parse_measurement, Tenths};
///
/// assert_eq!(parse_measurement(b"Berlin=-9.3"), Some(("Berlin", Tenths::new(-93))));
/// assert_eq!(parse_measurement(b"Addis Ababa=16.0"), Some(("Addis Ababa", Tenths::new(160))));
/// assert_eq!(parse_measurement(b"=1.0"), None);
/// assert_eq!(parse_measurement(b"Berlin;1.0"), None);
/// ```
pub fn parse_measurement(line: &[u8]) -> Option<(&str, Tenths)> {
    let split = line.iter().position(|&b| b == b'=')?;
    let (key, rest) = line.split_at(split);
    if key.is_empty() {
        return None;
    }
    let value = Tenths::parse_bytes(&rest[1..])?;
    let key = std::str::from_utf8(key).ok()?;
    Some((key, value))
}

/// Checks whether a string can be used as a key.
///
/// Keys must be non-empty and must not contain the `=` separator or line
/// terminators.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(['=', '\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips_through_parser() {
        let m = Measurement::new("São Paulo", Tenths::new(-5));
        let line = m.to_string();
        assert_eq!(line, "São Paulo=-0.5");
        assert_eq!(
            parse_measurement(line.as_bytes()),
            Some(("São Paulo", Tenths::new(-5)))
        );
    }

    #[test]
    fn test_second_separator_is_part_of_value() {
        assert_eq!(parse_measurement(b"A=B=1.0"), None);
    }

    #[test]
    fn test_invalid_utf8_key() {
        assert_eq!(parse_measurement(b"\xff\xfe=1.0"), None);
    }

    #[test]
    fn test_key_validity() {
        assert!(is_valid_key("Ho Chi Minh City"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("a=b"));
        assert!(!is_valid_key("a\nb"));
    }
}
