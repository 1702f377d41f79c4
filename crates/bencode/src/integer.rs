//! [`Integer`]: arbitrary-precision integer with 64-bit fast lanes.

use std::borrow::Cow;
use std::fmt;

use num_bigint::BigInt;

use crate::native::Kind;

/// An arbitrary-precision signed integer.
///
/// Values that fit a 64-bit lane are stored inline; everything else is held
/// as a [`BigInt`]. Every constructor normalizes to the narrowest lane
/// (`i64`, then `u64`, then `BigInt`), so two `Integer`s are equal exactly
/// when they denote the same number, whichever path produced them.
///
/// ```
/// use bencode_canon::Integer;
/// use num_bigint::BigInt;
///
/// assert_eq!(Integer::from(7u64), Integer::from(7i64));
/// assert_eq!(Integer::from(BigInt::from(u64::MAX)), Integer::from(u64::MAX));
/// assert_eq!(Integer::from(u64::MAX).to_string(), "18446744073709551615");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Integer(Repr);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr {
    Signed(i64),
    /// Only values above `i64::MAX`.
    Unsigned(u64),
    /// Only values outside `i64::MIN..=u64::MAX`.
    Big(BigInt),
}

impl Integer {
    pub fn as_i64(&self) -> Option<i64> {
        match self.0 {
            Repr::Signed(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.0 {
            Repr::Signed(v) => u64::try_from(v).ok(),
            Repr::Unsigned(v) => Some(v),
            Repr::Big(_) => None,
        }
    }

    /// The big-integer value, when it lies outside both 64-bit lanes.
    pub fn as_big(&self) -> Option<&BigInt> {
        match &self.0 {
            Repr::Big(v) => Some(v),
            _ => None,
        }
    }

    pub fn to_bigint(&self) -> BigInt {
        match &self.0 {
            Repr::Signed(v) => BigInt::from(*v),
            Repr::Unsigned(v) => BigInt::from(*v),
            Repr::Big(v) => v.clone(),
        }
    }

    pub fn is_negative(&self) -> bool {
        match &self.0 {
            Repr::Signed(v) => *v < 0,
            Repr::Unsigned(_) => false,
            Repr::Big(v) => v.sign() == num_bigint::Sign::Minus,
        }
    }

    /// Classification for the encoder, one variant per lane.
    pub(crate) fn kind(&self) -> Kind<'_> {
        match &self.0 {
            Repr::Signed(v) => Kind::Int(*v),
            Repr::Unsigned(v) => Kind::UInt(*v),
            Repr::Big(v) => Kind::BigInt(Cow::Borrowed(v)),
        }
    }

    /// Whether the value fits one of the 64-bit lanes.
    pub fn is_small(&self) -> bool {
        !matches!(self.0, Repr::Big(_))
    }
}

impl From<i64> for Integer {
    fn from(v: i64) -> Self {
        Integer(Repr::Signed(v))
    }
}

impl From<u64> for Integer {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(signed) => Integer(Repr::Signed(signed)),
            Err(_) => Integer(Repr::Unsigned(v)),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(v: BigInt) -> Self {
        if let Ok(signed) = i64::try_from(&v) {
            Integer(Repr::Signed(signed))
        } else if let Ok(unsigned) = u64::try_from(&v) {
            Integer(Repr::Unsigned(unsigned))
        } else {
            Integer(Repr::Big(v))
        }
    }
}

impl From<i128> for Integer {
    fn from(v: i128) -> Self {
        Integer::from(BigInt::from(v))
    }
}

impl From<u128> for Integer {
    fn from(v: u128) -> Self {
        Integer::from(BigInt::from(v))
    }
}

macro_rules! integer_from_narrow {
    ($($t:ty => $wide:ty),*) => {
        $(
            impl From<$t> for Integer {
                fn from(v: $t) -> Self {
                    Integer::from(<$wide>::from(v))
                }
            }
        )*
    };
}

integer_from_narrow!(i8 => i64, i16 => i64, i32 => i64, u8 => u64, u16 => u64, u32 => u64);

impl From<usize> for Integer {
    fn from(v: usize) -> Self {
        Integer::from(v as u64)
    }
}

impl From<Integer> for BigInt {
    fn from(v: Integer) -> Self {
        match v.0 {
            Repr::Signed(s) => BigInt::from(s),
            Repr::Unsigned(u) => BigInt::from(u),
            Repr::Big(big) => big,
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Signed(v) => write!(f, "{v}"),
            Repr::Unsigned(v) => write!(f, "{v}"),
            Repr::Big(v) => write!(f, "{v}"),
        }
    }
}
