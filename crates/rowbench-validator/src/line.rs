//! Lexing of candidate output lines.

use rowbench_core::Tenths;

/// Why a line is not `key=min/mean/max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatViolation {
    Blank,
    NotUtf8,
    SurroundingWhitespace,
    SeparatorCount,
    EmptyKey,
    FieldCount,
    WhitespaceInValues,
    BadNumber,
}

impl FormatViolation {
    pub fn describe(self) -> &'static str {
        match self {
            FormatViolation::Blank => "blank line",
            FormatViolation::NotUtf8 => "line is not valid UTF-8",
            FormatViolation::SurroundingWhitespace => "leading or trailing whitespace",
            FormatViolation::SeparatorCount => "expected exactly one '='",
            FormatViolation::EmptyKey => "empty key",
            FormatViolation::FieldCount => "expected exactly three '/'-separated values",
            FormatViolation::WhitespaceInValues => "whitespace inside values",
            FormatViolation::BadNumber => "values must have exactly one fractional digit",
        }
    }
}

/// A structurally valid line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLine<'a> {
    pub key: &'a str,
    /// `min`, `mean` and `max`, in that order.
    pub values: [Tenths; 3],
}

/// Splits one line, terminator already removed.
pub fn split_line(line: &str) -> Result<OutputLine<'_>, FormatViolation> {
    if line.is_empty() {
        return Err(FormatViolation::Blank);
    }
    if line.trim() != line {
        return Err(FormatViolation::SurroundingWhitespace);
    }

    let mut halves = line.split('=');
    let key = halves.next().unwrap_or_default();
    let values = match (halves.next(), halves.next()) {
        (Some(values), None) => values,
        _ => return Err(FormatViolation::SeparatorCount),
    };
    if key.is_empty() {
        return Err(FormatViolation::EmptyKey);
    }
    if values.chars().any(char::is_whitespace) {
        return Err(FormatViolation::WhitespaceInValues);
    }

    let mut parts = values.split('/');
    let fields = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(min), Some(mean), Some(max), None) => [min, mean, max],
        _ => return Err(FormatViolation::FieldCount),
    };
    let mut parsed = [Tenths::default(); 3];
    for (slot, field) in parsed.iter_mut().zip(fields) {
        *slot = Tenths::parse(field).ok_or(FormatViolation::BadNumber)?;
    }
    Ok(OutputLine {
        key,
        values: parsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_valid() {
        let line = split_line("Addis Ababa=1.0/2.0/3.0").unwrap();
        assert_eq!(line.key, "Addis Ababa");
        assert_eq!(
            line.values,
            [Tenths::new(10), Tenths::new(20), Tenths::new(30)]
        );
    }

    #[test]
    fn test_split_violations() {
        assert_eq!(split_line(""), Err(FormatViolation::Blank));
        assert_eq!(
            split_line(" A=1.0/2.0/3.0"),
            Err(FormatViolation::SurroundingWhitespace)
        );
        assert_eq!(
            split_line("A=1.0/2.0/3.0\t"),
            Err(FormatViolation::SurroundingWhitespace)
        );
        assert_eq!(split_line("A"), Err(FormatViolation::SeparatorCount));
        assert_eq!(
            split_line("A=B=1.0/2.0/3.0"),
            Err(FormatViolation::SeparatorCount)
        );
        assert_eq!(split_line("=1.0/2.0/3.0"), Err(FormatViolation::EmptyKey));
        assert_eq!(
            split_line("A=1.0/ 2.0/3.0"),
            Err(FormatViolation::WhitespaceInValues)
        );
        assert_eq!(split_line("A=1.0/2.0"), Err(FormatViolation::FieldCount));
        assert_eq!(
            split_line("A=1.0/2.0/3.0/4.0"),
            Err(FormatViolation::FieldCount)
        );
    }

    #[test]
    fn test_values_need_one_fraction_digit() {
        for bad in [
            "A=1/2/3",
            "A=+2.0/2.0/2.0",
            "A=1.0/2.00000/3.0",
            "A=1.0/abc/3.0",
            "A=1.0/2./3.0",
            "A=1.0/.5/3.0",
            "A=1e1/2.0/3.0",
            "A=1.0/NaN/3.0",
        ] {
            assert_eq!(split_line(bad), Err(FormatViolation::BadNumber), "{bad:?}");
        }
        let line = split_line("B=-9.3/-0.0/12.5").unwrap();
        assert_eq!(
            line.values,
            [Tenths::new(-93), Tenths::new(0), Tenths::new(125)]
        );
    }
}
