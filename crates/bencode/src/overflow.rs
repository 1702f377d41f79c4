//! Overflow-checked accumulation of decimal digit runs into 64-bit lanes.
//!
//! Every byte of the run is validated even after a lane has overflowed, so a
//! caller falling back to arbitrary precision knows the run is all digits.

/// Why a digit run could not be accumulated into a fixed-width lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitRunError {
    /// The run has no digits at all.
    Empty,
    /// The byte at this index of the run is not an ASCII digit.
    InvalidDigit(usize),
    /// Every byte is a digit but the value does not fit the lane.
    Overflow,
}

/// `acc * 10 + digit`, or `None` on overflow.
#[inline]
pub fn push_digit_unsigned(acc: u64, digit: u8) -> Option<u64> {
    acc.checked_mul(10)?.checked_add(u64::from(digit))
}

/// `acc * 10 - digit`, or `None` on overflow.
///
/// Negative values are accumulated downwards so that `i64::MIN` is reachable.
#[inline]
pub fn push_digit_negative(acc: i64, digit: u8) -> Option<i64> {
    acc.checked_mul(10)?.checked_sub(i64::from(digit))
}

/// Parses an unsigned decimal run (no sign) into a `u64`.
pub fn parse_unsigned(digits: &[u8]) -> Result<u64, DigitRunError> {
    accumulate(digits, 0u64, push_digit_unsigned)
}

/// Parses the magnitude digits of a negative number (sign already stripped)
/// into a negative `i64`.
pub fn parse_negative(digits: &[u8]) -> Result<i64, DigitRunError> {
    accumulate(digits, 0i64, push_digit_negative)
}

fn accumulate<T: Copy>(
    digits: &[u8],
    zero: T,
    push: impl Fn(T, u8) -> Option<T>,
) -> Result<T, DigitRunError> {
    if digits.is_empty() {
        return Err(DigitRunError::Empty);
    }
    let mut lane = Some(zero);
    for (i, &byte) in digits.iter().enumerate() {
        if !byte.is_ascii_digit() {
            return Err(DigitRunError::InvalidDigit(i));
        }
        lane = lane.and_then(|acc| push(acc, byte - b'0'));
    }
    lane.ok_or(DigitRunError::Overflow)
}
