//! Fixed-point decimal values.
//!
//! A [`DecimalValue`] is an unscaled `i128` plus a non-negative scale, the same
//! layout Arrow's `Decimal128` uses. Digit counting goes through
//! `arrow_buffer::i256` so it never overflows at the edges of the `i128` range.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use arrow_buffer::i256;

use crate::MAX_FIXED_PRECISION;

const POW10_BASE: i256 = i256::from_i128(10);

/// Errors that can occur while building or rescaling decimal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecimalError {
    /// Requested scale exceeds [`MAX_FIXED_PRECISION`].
    ScaleOutOfRange { scale: u32 },
    /// Value has more significant digits than allowed.
    PrecisionOverflow { digits: u8, precision: u8 },
    /// Arithmetic left the `i128` range.
    Overflow,
    /// Lowering the scale would drop non-zero fractional digits.
    InexactRescale { from: u8, to: u8 },
    /// Input text is not a decimal literal.
    Malformed(String),
}

impl fmt::Display for DecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalError::ScaleOutOfRange { scale } => {
                write!(f, "decimal scale {scale} outside supported range")
            }
            DecimalError::PrecisionOverflow { digits, precision } => {
                write!(
                    f,
                    "decimal value has {digits} digits, exceeding precision {precision}"
                )
            }
            DecimalError::Overflow => write!(f, "decimal arithmetic overflow"),
            DecimalError::InexactRescale { from, to } => write!(
                f,
                "cannot rescale decimal from scale {from} to {to} without losing precision"
            ),
            DecimalError::Malformed(text) => write!(f, "'{text}' is not a decimal literal"),
        }
    }
}

impl std::error::Error for DecimalError {}

/// Runtime representation of a fixed-point value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecimalValue {
    value: i128,
    scale: u8,
}

impl DecimalValue {
    /// Create a decimal from its raw parts, validating scale and digit bounds.
    pub fn new(value: i128, scale: u8) -> Result<Self, DecimalError> {
        if scale > MAX_FIXED_PRECISION {
            return Err(DecimalError::ScaleOutOfRange {
                scale: u32::from(scale),
            });
        }
        let digits = digit_count(value);
        if digits > MAX_FIXED_PRECISION {
            return Err(DecimalError::PrecisionOverflow {
                digits,
                precision: MAX_FIXED_PRECISION,
            });
        }
        Ok(Self { value, scale })
    }

    /// Decimal form of a finite float, using its shortest round-trip rendering.
    ///
    /// `1.23_f64` becomes `123` at scale 2 rather than the binary expansion
    /// `1.229999...`.
    pub fn from_f64(value: f64) -> Result<Self, DecimalError> {
        if !value.is_finite() {
            return Err(DecimalError::Malformed(value.to_string()));
        }
        value.to_string().parse()
    }

    /// Return the scaled integer backing this decimal.
    #[inline]
    pub fn raw_value(self) -> i128 {
        self.value
    }

    /// Return the scale (number of fractional digits).
    #[inline]
    pub fn scale(self) -> u8 {
        self.scale
    }

    /// Number of significant digits in the unscaled value.
    #[inline]
    pub fn precision(self) -> u8 {
        digit_count(self.value)
    }

    /// Re-express the value at `target` scale.
    ///
    /// Raising the scale multiplies; lowering it only succeeds when the dropped
    /// digits are all zero, so `1.230` rescales to `1.23` but `1.234` fails.
    pub fn rescale(self, target: u8) -> Result<Self, DecimalError> {
        if target > MAX_FIXED_PRECISION {
            return Err(DecimalError::ScaleOutOfRange {
                scale: u32::from(target),
            });
        }
        match target.cmp(&self.scale) {
            Ordering::Equal => Ok(self),
            Ordering::Greater => {
                let factor = pow10_i128(u32::from(target - self.scale))?;
                let value = self
                    .value
                    .checked_mul(factor)
                    .ok_or(DecimalError::Overflow)?;
                Self::new(value, target)
            }
            Ordering::Less => {
                let factor = pow10_i128(u32::from(self.scale - target))?;
                if self.value % factor != 0 {
                    return Err(DecimalError::InexactRescale {
                        from: self.scale,
                        to: target,
                    });
                }
                Self::new(self.value / factor, target)
            }
        }
    }

    /// Rescale to `scale` and check the result fits in `precision` digits.
    pub fn align(self, precision: u8, scale: u8) -> Result<Self, DecimalError> {
        let aligned = self.rescale(scale)?;
        let digits = aligned.precision();
        if digits > precision {
            return Err(DecimalError::PrecisionOverflow { digits, precision });
        }
        Ok(aligned)
    }
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.value);
        }
        let digits = self.value.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if self.value < 0 {
            f.write_str("-")?;
        }
        if digits.len() <= scale {
            f.write_str("0.")?;
            for _ in digits.len()..scale {
                f.write_str("0")?;
            }
            return f.write_str(&digits);
        }
        let split = digits.len() - scale;
        f.write_str(&digits[..split])?;
        f.write_str(".")?;
        f.write_str(&digits[split..])
    }
}

impl FromStr for DecimalValue {
    type Err = DecimalError;

    /// Parse `[+-]digits[.digits][e[+-]digits]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DecimalError::Malformed(s.to_string());
        let text = s.trim();
        let (mantissa, exponent) = match text.find(&['e', 'E'][..]) {
            Some(pos) => {
                let exp = text[pos + 1..].parse::<i32>().map_err(|_| malformed())?;
                (&text[..pos], exp)
            }
            None => (text, 0),
        };
        let (negative, unsigned) = match mantissa.as_bytes().first() {
            Some(b'-') => (true, &mantissa[1..]),
            Some(b'+') => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        // Leading zeros carry no value. Trailing zeros are only dropped
        // (lowering the scale) while the literal is too wide for `i128`.
        let mut digits = int_part.as_bytes().to_vec();
        digits.extend_from_slice(frac_part.as_bytes());
        let first_significant = digits
            .iter()
            .position(|&b| b != b'0')
            .unwrap_or(digits.len());
        digits.drain(..first_significant);
        let mut scale = frac_part.len() as i64 - i64::from(exponent);
        if digits.is_empty() {
            let scale = scale.clamp(0, i64::from(MAX_FIXED_PRECISION)) as u8;
            return Self::new(0, scale);
        }
        let max = usize::from(MAX_FIXED_PRECISION);
        while (digits.len() > max || scale > i64::from(MAX_FIXED_PRECISION))
            && digits.last() == Some(&b'0')
        {
            digits.pop();
            scale -= 1;
        }
        if digits.len() > max {
            return Err(DecimalError::Overflow);
        }

        let mut value = digits
            .iter()
            .fold(0i128, |acc, b| acc * 10 + i128::from(b - b'0'));
        if negative {
            value = -value;
        }

        if scale < 0 {
            let factor = pow10_i128(u32::try_from(-scale).map_err(|_| DecimalError::Overflow)?)?;
            let value = value.checked_mul(factor).ok_or(DecimalError::Overflow)?;
            return Self::new(value, 0);
        }
        let scale = u8::try_from(scale)
            .ok()
            .filter(|s| *s <= MAX_FIXED_PRECISION)
            .ok_or(DecimalError::ScaleOutOfRange {
                scale: u32::try_from(scale).unwrap_or(u32::MAX),
            })?;
        Self::new(value, scale)
    }
}

fn pow10_i128(exp: u32) -> Result<i128, DecimalError> {
    10i128.checked_pow(exp).ok_or(DecimalError::Overflow)
}

/// Number of decimal digits in `value` (zero counts as one digit).
pub fn digit_count(value: i128) -> u8 {
    digit_count_i256(i256::from_i128(value))
}

/// Number of decimal digits in a 256-bit value (zero counts as one digit).
pub fn digit_count_i256(mut value: i256) -> u8 {
    if value == i256::ZERO {
        return 1;
    }
    if value < i256::ZERO {
        value = value.wrapping_neg();
    }
    let mut count: u8 = 0;
    while value != i256::ZERO {
        value = value.wrapping_div(POW10_BASE);
        count += 1;
    }
    count
}
