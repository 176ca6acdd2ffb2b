//! Number Format Module
//! printf-style patterns used by the hover highlighter, e.g. `%#.2f`.
//!
//! Grammar: `%[flags][width][.precision]conv` with flags `#+- 0` and
//! conversions `f`, `e`, `d`, `s`. `%%` is a literal percent sign.
//! Exactly one conversion must appear.

use std::fmt;
use thiserror::Error;

/// Largest width or precision a pattern may ask for.
pub const MAX_FIELD_WIDTH: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Format string '{0}' has no conversion")]
    MissingConversion(String),
    #[error("Format string '{0}' has more than one conversion")]
    MultipleConversions(String),
    #[error("Unsupported conversion '%{conversion}' in '{format}'")]
    UnsupportedConversion { format: String, conversion: char },
    #[error("Format string '{0}' ends inside a conversion")]
    Truncated(String),
    #[error("Width or precision in '{0}' exceeds {max}", max = MAX_FIELD_WIDTH)]
    FieldTooWide(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Fixed,
    Exponent,
    Integer,
    Plain,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Flags {
    alternate: bool,
    plus: bool,
    space: bool,
    left: bool,
    zero: bool,
}

/// A parsed single-value format pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    source: String,
    prefix: String,
    suffix: String,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: Conversion,
}

impl NumberFormat {
    pub fn parse(pattern: &str) -> Result<Self, FormatError> {
        let mut literal = String::new();
        let mut prefix = None;
        let mut spec: Option<(Flags, Option<usize>, Option<usize>, Conversion)> = None;
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                literal.push('%');
                continue;
            }
            if spec.is_some() {
                return Err(FormatError::MultipleConversions(pattern.to_string()));
            }

            let mut flags = Flags::default();
            while let Some(&f) = chars.peek() {
                match f {
                    '#' => flags.alternate = true,
                    '+' => flags.plus = true,
                    ' ' => flags.space = true,
                    '-' => flags.left = true,
                    '0' => flags.zero = true,
                    _ => break,
                }
                chars.next();
            }

            let width = take_number(&mut chars, pattern)?;
            let precision = if chars.peek() == Some(&'.') {
                chars.next();
                Some(take_number(&mut chars, pattern)?.unwrap_or(0))
            } else {
                None
            };

            let conversion = match chars.next() {
                Some('f') | Some('F') => Conversion::Fixed,
                Some('e') | Some('E') => Conversion::Exponent,
                Some('d') | Some('i') => Conversion::Integer,
                Some('s') => Conversion::Plain,
                Some(other) => {
                    return Err(FormatError::UnsupportedConversion {
                        format: pattern.to_string(),
                        conversion: other,
                    })
                }
                None => return Err(FormatError::Truncated(pattern.to_string())),
            };

            prefix = Some(std::mem::take(&mut literal));
            spec = Some((flags, width, precision, conversion));
        }

        let (Some(prefix), Some((flags, width, precision, conversion))) = (prefix, spec) else {
            return Err(FormatError::MissingConversion(pattern.to_string()));
        };

        Ok(Self {
            source: pattern.to_string(),
            prefix,
            suffix: literal,
            flags,
            width,
            precision,
            conversion,
        })
    }

    /// Format one value.
    pub fn format(&self, value: f64) -> String {
        let (sign, body) = if !value.is_finite() || self.conversion == Conversion::Plain {
            (String::new(), value.to_string())
        } else {
            (self.sign_of(value), self.body_of(value.abs()))
        };

        let len = sign.chars().count() + body.chars().count();
        let pad = self.width.unwrap_or(0).saturating_sub(len);
        let padded = if pad == 0 {
            format!("{sign}{body}")
        } else if self.flags.left {
            format!("{sign}{body}{}", " ".repeat(pad))
        } else if self.flags.zero && value.is_finite() && self.conversion != Conversion::Plain {
            format!("{sign}{}{body}", "0".repeat(pad))
        } else {
            format!("{}{sign}{body}", " ".repeat(pad))
        };

        format!("{}{}{}", self.prefix, padded, self.suffix)
    }

    fn sign_of(&self, value: f64) -> String {
        if value < 0.0 {
            "-".to_string()
        } else if self.flags.plus {
            "+".to_string()
        } else if self.flags.space {
            " ".to_string()
        } else {
            String::new()
        }
    }

    fn body_of(&self, magnitude: f64) -> String {
        match self.conversion {
            Conversion::Fixed => {
                let precision = self.precision.unwrap_or(6);
                let mut body = format!("{:.*}", precision, magnitude);
                if precision == 0 && self.flags.alternate {
                    body.push('.');
                }
                body
            }
            Conversion::Exponent => {
                let precision = self.precision.unwrap_or(6);
                let raw = format!("{:.*e}", precision, magnitude);
                let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
                let exponent: i32 = exponent.parse().unwrap_or(0);
                let mut mantissa = mantissa.to_string();
                if precision == 0 && self.flags.alternate {
                    mantissa.push('.');
                }
                let exp_sign = if exponent < 0 { '-' } else { '+' };
                format!("{mantissa}e{exp_sign}{:02}", exponent.abs())
            }
            Conversion::Integer => format!("{:.0}", magnitude.trunc()),
            Conversion::Plain => magnitude.to_string(),
        }
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn take_number(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    pattern: &str,
) -> Result<Option<usize>, FormatError> {
    let mut digits = String::new();
    while let Some(&d) = chars.peek() {
        if !d.is_ascii_digit() {
            break;
        }
        digits.push(d);
        chars.next();
    }
    if digits.is_empty() {
        return Ok(None);
    }
    digits
        .parse::<usize>()
        .ok()
        .filter(|n| *n <= MAX_FIELD_WIDTH)
        .map(Some)
        .ok_or_else(|| FormatError::FieldTooWide(pattern.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(pattern: &str, value: f64) -> String {
        NumberFormat::parse(pattern).unwrap().format(value)
    }

    #[test]
    fn two_decimal_alternate_fixed() {
        assert_eq!(fmt("%#.2f", 8.2), "8.20");
        assert_eq!(fmt("%#.2f", 10.0), "10.00");
        assert_eq!(fmt("%#.2f", 5.7), "5.70");
        assert_eq!(fmt("%#.2f", -0.126), "-0.13");
    }

    #[test]
    fn flags_and_width() {
        assert_eq!(fmt("%+08.2f", -3.14159), "-0003.14");
        assert_eq!(fmt("%+.1f", 2.0), "+2.0");
        assert_eq!(fmt("%5d", 42.9), "   42");
        assert_eq!(fmt("%-5d|", 7.0), "7    |");
        assert_eq!(fmt("%#.0f", 3.0), "3.");
        assert_eq!(fmt("% .1f", 1.0), " 1.0");
    }

    #[test]
    fn exponent_uses_signed_two_digit_exponent() {
        assert_eq!(fmt("%.2e", 12345.0), "1.23e+04");
        assert_eq!(fmt("%.1e", 0.00042), "4.2e-04");
    }

    #[test]
    fn literals_around_conversion() {
        assert_eq!(fmt("score: %.1f%%", 5.0), "score: 5.0%");
        assert_eq!(fmt("%s pts", 6.5), "6.5 pts");
    }

    #[test]
    fn non_finite_values_are_not_padded_with_zeros() {
        assert_eq!(fmt("%06.2f", f64::NAN), "   NaN");
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert!(matches!(
            NumberFormat::parse("value"),
            Err(FormatError::MissingConversion(_))
        ));
        assert!(matches!(
            NumberFormat::parse("%.2f / %.2f"),
            Err(FormatError::MultipleConversions(_))
        ));
        assert!(matches!(
            NumberFormat::parse("%q"),
            Err(FormatError::UnsupportedConversion { conversion: 'q', .. })
        ));
        assert!(matches!(
            NumberFormat::parse("%.2"),
            Err(FormatError::Truncated(_))
        ));
    }

    #[test]
    fn rejects_oversized_width_and_precision() {
        assert!(matches!(
            NumberFormat::parse("%99999999999999999999f"),
            Err(FormatError::FieldTooWide(_))
        ));
        assert!(matches!(
            NumberFormat::parse("%1000000000f"),
            Err(FormatError::FieldTooWide(_))
        ));
        assert!(matches!(
            NumberFormat::parse("%.65f"),
            Err(FormatError::FieldTooWide(_))
        ));
        assert_eq!(fmt("%64d", 1.0).len(), 64);
    }
}
