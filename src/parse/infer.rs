use rust_decimal::Decimal;
use std::{fmt, str::FromStr};

/// Typed value of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Null,
    Boolean(bool),
    Decimal(Decimal),
    Integer(i32),
    Text(String),
}

/// Variant tag of a [`CellValue`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Null,
    Boolean,
    Decimal,
    Integer,
    Text,
}

impl CellValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            CellValue::Null => ValueKind::Null,
            CellValue::Boolean(_) => ValueKind::Boolean,
            CellValue::Decimal(_) => ValueKind::Decimal,
            CellValue::Integer(_) => ValueKind::Integer,
            CellValue::Text(_) => ValueKind::Text,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Boolean(true) => f.write_str("TRUE"),
            CellValue::Boolean(false) => f.write_str("FALSE"),
            CellValue::Decimal(d) => write!(f, "{}", d),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Decimal => "decimal",
            ValueKind::Integer => "integer",
            ValueKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// Infer the typed value of one raw cell. First match wins:
///  1) empty ⇒ Null
///  2) exactly `TRUE` / `FALSE` ⇒ Boolean
///  3) contains `.` and parses as a decimal ⇒ Decimal
///  4) parses as an i32 ⇒ Integer
///  5) anything else ⇒ Text, unchanged
pub fn infer(raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Null;
    }

    match raw {
        "TRUE" => return CellValue::Boolean(true),
        "FALSE" => return CellValue::Boolean(false),
        _ => {}
    }

    let trimmed = raw.trim();

    if raw.contains('.') {
        if let Some(d) = parse_decimal(trimmed) {
            return CellValue::Decimal(d);
        }
    }

    if let Ok(i) = trimmed.parse::<i32>() {
        return CellValue::Integer(i);
    }

    CellValue::Text(raw.to_string())
}

/// Optional sign, ASCII digits, exactly one `.`, at least one digit.
/// `Decimal::from_str` alone is more lenient (digit separators), so the
/// shape is checked first.
fn parse_decimal(s: &str) -> Option<Decimal> {
    let (negative, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut dots = 0;
    let mut digits = 0;
    for c in body.chars() {
        match c {
            '.' => dots += 1,
            '0'..='9' => digits += 1,
            _ => return None,
        }
    }
    if dots != 1 || digits == 0 {
        return None;
    }

    // "10." and ".5" are valid here; give the parser a digit on both sides
    let mut normalized = String::with_capacity(body.len() + 2);
    if negative {
        normalized.push('-');
    }
    if body.starts_with('.') {
        normalized.push('0');
    }
    normalized.push_str(body.strip_suffix('.').unwrap_or(body));
    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> CellValue {
        CellValue::Decimal(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn precedence() {
        assert_eq!(infer(""), CellValue::Null);
        assert_eq!(infer("TRUE"), CellValue::Boolean(true));
        assert_eq!(infer("FALSE"), CellValue::Boolean(false));
        assert_eq!(infer("3.0"), dec("3.0"));
        assert_eq!(infer("42"), CellValue::Integer(42));
        assert_eq!(infer("abc"), CellValue::Text("abc".into()));
    }

    #[test]
    fn dotted_numbers_are_never_integers() {
        assert_eq!(infer("3.0").kind(), ValueKind::Decimal);
        assert_eq!(infer("-0.5"), dec("-0.5"));
        assert_eq!(infer("10."), dec("10"));
        assert_eq!(infer(".25"), dec("0.25"));
    }

    #[test]
    fn booleans_are_case_sensitive() {
        assert_eq!(infer("true"), CellValue::Text("true".into()));
        assert_eq!(infer("False"), CellValue::Text("False".into()));
        assert_eq!(infer(" TRUE"), CellValue::Text(" TRUE".into()));
    }

    #[test]
    fn integers_respect_32_bit_range() {
        assert_eq!(infer("-2147483648"), CellValue::Integer(i32::MIN));
        assert_eq!(infer("2147483647"), CellValue::Integer(i32::MAX));
        assert_eq!(infer("+7"), CellValue::Integer(7));
        assert_eq!(
            infer("2147483648"),
            CellValue::Text("2147483648".into())
        );
    }

    #[test]
    fn surrounding_whitespace_is_tolerated_for_numbers() {
        assert_eq!(infer(" 12 "), CellValue::Integer(12));
        assert_eq!(infer(" 1.5"), dec("1.5"));
        assert_eq!(infer(" "), CellValue::Text(" ".into()));
    }

    #[test]
    fn malformed_numbers_degrade_to_text() {
        for raw in ["1.2.3", "1e5", "1_000.5", "12abc", ".", "-", "1.0x"] {
            assert_eq!(infer(raw), CellValue::Text(raw.to_string()), "{raw}");
        }
    }

    #[test]
    fn display_round_trips_simple_values() {
        assert_eq!(infer("TRUE").to_string(), "TRUE");
        assert_eq!(infer("2.5").to_string(), "2.5");
        assert_eq!(infer("-9").to_string(), "-9");
        assert_eq!(infer("").to_string(), "");
    }
}
