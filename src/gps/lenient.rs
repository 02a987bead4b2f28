// src/gps/lenient.rs
//! Lenient numeric coercion for NMEA fields
//!
//! Receivers routinely leave optional fields empty, so a numeric field that
//! does not parse becomes zero instead of failing the sentence. Parsing takes
//! the longest numeric prefix of the token, the same way C's `atof`/`atoi` do.

/// A coerced value and whether it fell back to the default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lenient<T> {
    pub value: T,
    pub defaulted: bool,
}

/// Parse a real number, reporting whether the zero default was used.
pub fn parse_lenient_f64(token: &str) -> Lenient<f64> {
    let prefix = float_prefix(token);
    match prefix.parse::<f64>() {
        // Overflowing exponents parse to infinity; treat them as unusable.
        Ok(value) if value.is_finite() => Lenient {
            value,
            defaulted: false,
        },
        _ => Lenient {
            value: 0.0,
            defaulted: true,
        },
    }
}

/// Parse an integer, reporting whether the zero default was used.
pub fn parse_lenient_i32(token: &str) -> Lenient<i32> {
    let prefix = integer_prefix(token);
    let digits = prefix.trim_start_matches(['+', '-']);
    if digits.is_empty() {
        return Lenient {
            value: 0,
            defaulted: true,
        };
    }

    let value = match prefix.parse::<i64>() {
        Ok(v) => v.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        Err(_) if prefix.starts_with('-') => i32::MIN,
        Err(_) => i32::MAX,
    };
    Lenient {
        value,
        defaulted: false,
    }
}

pub fn lenient_f64(token: &str) -> f64 {
    parse_lenient_f64(token).value
}

pub fn lenient_i32(token: &str) -> i32 {
    parse_lenient_i32(token).value
}

/// Non-negative integer; negative input clamps to zero.
pub fn lenient_u32(token: &str) -> u32 {
    lenient_i32(token).max(0) as u32
}

fn integer_prefix(token: &str) -> &str {
    let token = token.trim_start();
    let bytes = token.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    &token[..end]
}

fn float_prefix(token: &str) -> &str {
    let token = token.trim_start();
    let bytes = token.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return "";
    }

    // Exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    &token[..end]
}
