//! 256-bit unsigned integer backing every `Uint(width)` field
//!
//! Values are kept as four little-endian 64-bit words. Only the operations the
//! codecs need are provided: byte conversion at a declared width, width checks,
//! and decimal formatting/parsing for the textual form.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing a decimal string into a [`U256`].
///
/// Messages follow the wording of `core::num::ParseIntError`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseUintError {
    #[error("cannot parse integer from empty string")]
    Empty,
    #[error("invalid digit found in string")]
    InvalidDigit,
    #[error("number too large to fit in target type")]
    Overflow,
}

/// 256-bit unsigned integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct U256([u64; 4]);

impl U256 {
    pub const ZERO: U256 = U256([0; 4]);
    pub const MAX: U256 = U256([u64::MAX; 4]);

    pub fn zero() -> Self {
        U256::ZERO
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 4]
    }

    /// Build from up to 32 little-endian bytes. Missing high bytes are zero.
    pub fn from_le_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > 32 {
            return None;
        }
        let mut buf = [0u8; 32];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(Self::from_le_bytes(&buf))
    }

    pub fn from_le_bytes(bytes: &[u8; 32]) -> Self {
        let mut words = [0u64; 4];
        for (i, word) in words.iter_mut().enumerate() {
            let mut w = [0u8; 8];
            w.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
            *word = u64::from_le_bytes(w);
        }
        U256(words)
    }

    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (i, word) in self.0.iter().enumerate() {
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Number of significant bits (0 for zero).
    pub fn bits(&self) -> u32 {
        for i in (0..4).rev() {
            if self.0[i] != 0 {
                return (i as u32) * 64 + (64 - self.0[i].leading_zeros());
            }
        }
        0
    }

    /// Whether the value is representable in `width` bytes.
    pub fn fits_width(&self, width: usize) -> bool {
        width >= 32 || self.bits() as usize <= width * 8
    }

    pub fn as_u64(&self) -> Option<u64> {
        if self.0[1..].iter().all(|w| *w == 0) {
            Some(self.0[0])
        } else {
            None
        }
    }

    /// Multiply by a u64, returning `None` on overflow.
    pub fn checked_mul_u64(&self, rhs: u64) -> Option<Self> {
        let mut carry = 0u128;
        let mut result = U256::zero();
        for i in 0..4 {
            let product = (self.0[i] as u128) * (rhs as u128) + carry;
            result.0[i] = product as u64;
            carry = product >> 64;
        }
        if carry > 0 {
            return None;
        }
        Some(result)
    }

    /// Add a u64, returning `None` on overflow.
    pub fn checked_add_u64(&self, rhs: u64) -> Option<Self> {
        let mut result = *self;
        let mut carry = rhs;
        for word in result.0.iter_mut() {
            if carry == 0 {
                break;
            }
            let (sum, overflow) = word.overflowing_add(carry);
            *word = sum;
            carry = overflow as u64;
        }
        if carry > 0 {
            return None;
        }
        Some(result)
    }

    /// Divide by a non-zero u64, returning quotient and remainder.
    fn div_rem_u64(&self, rhs: u64) -> (Self, u64) {
        debug_assert!(rhs != 0, "division by zero");
        let mut quotient = U256::zero();
        let mut rem = 0u128;
        for i in (0..4).rev() {
            let cur = (rem << 64) | self.0[i] as u128;
            quotient.0[i] = (cur / rhs as u128) as u64;
            rem = cur % rhs as u128;
        }
        (quotient, rem as u64)
    }

    /// Parse a canonical decimal string, rejecting values wider than `width` bytes.
    pub fn from_dec_str_with_width(s: &str, width: usize) -> Result<Self, ParseUintError> {
        let value: U256 = s.parse()?;
        if !value.fits_width(width) {
            return Err(ParseUintError::Overflow);
        }
        Ok(value)
    }
}

impl FromStr for U256 {
    type Err = ParseUintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseUintError::Empty);
        }
        let mut value = U256::zero();
        for c in s.bytes() {
            if !c.is_ascii_digit() {
                return Err(ParseUintError::InvalidDigit);
            }
            value = value
                .checked_mul_u64(10)
                .and_then(|v| v.checked_add_u64((c - b'0') as u64))
                .ok_or(ParseUintError::Overflow)?;
        }
        Ok(value)
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(v) = self.as_u64() {
            return write!(f, "{v}");
        }
        // Peel off 19 decimal digits at a time.
        const CHUNK: u64 = 10_000_000_000_000_000_000;
        let mut parts = Vec::new();
        let mut cur = *self;
        while !cur.is_zero() {
            let (q, r) = cur.div_rem_u64(CHUNK);
            parts.push(r);
            cur = q;
        }
        let mut out = String::with_capacity(parts.len() * 19);
        if let Some((last, rest)) = parts.split_last() {
            out.push_str(&last.to_string());
            for part in rest.iter().rev() {
                out.push_str(&format!("{part:019}"));
            }
        }
        f.write_str(&out)
    }
}

impl From<u8> for U256 {
    fn from(value: u8) -> Self {
        U256([value as u64, 0, 0, 0])
    }
}

impl From<u16> for U256 {
    fn from(value: u16) -> Self {
        U256([value as u64, 0, 0, 0])
    }
}

impl From<u32> for U256 {
    fn from(value: u32) -> Self {
        U256([value as u64, 0, 0, 0])
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        U256([value, 0, 0, 0])
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        U256([value as u64, (value >> 64) as u64, 0, 0])
    }
}
