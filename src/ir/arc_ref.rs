//! Direction-tagged arc references.
//!
//! On the wire an arc reference is a signed integer: `i` means "arc `i`,
//! forward" and `!i` (bitwise complement, i.e. `-i - 1`) means "arc `i`,
//! reversed". In memory the two parts are kept apart so that the index is
//! always a plain unsigned value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference from a ring to an arc in the pool, with traversal direction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArcRef {
    index: u32,
    reversed: bool,
}

impl ArcRef {
    /// A forward reference to arc `index`.
    #[inline]
    pub fn forward(index: u32) -> Self {
        Self {
            index,
            reversed: false,
        }
    }

    /// A reverse reference to arc `index`.
    #[inline]
    pub fn reverse(index: u32) -> Self {
        Self {
            index,
            reversed: true,
        }
    }

    /// Decodes the signed wire form.
    #[inline]
    pub fn from_encoded(value: i64) -> Self {
        if value < 0 {
            Self::reverse(!value as u32)
        } else {
            Self::forward(value as u32)
        }
    }

    /// Encodes to the signed wire form.
    #[inline]
    pub fn encoded(&self) -> i64 {
        let i = i64::from(self.index);
        if self.reversed {
            !i
        } else {
            i
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Returns a reference to a different arc with the same direction.
    #[inline]
    pub fn with_index(&self, index: u32) -> Self {
        Self {
            index,
            reversed: self.reversed,
        }
    }
}

impl fmt::Debug for ArcRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reversed {
            write!(f, "ArcRef(~{})", self.index)
        } else {
            write!(f, "ArcRef({})", self.index)
        }
    }
}

impl fmt::Display for ArcRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encoded())
    }
}

impl From<i64> for ArcRef {
    fn from(value: i64) -> Self {
        ArcRef::from_encoded(value)
    }
}

impl Serialize for ArcRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.encoded())
    }
}

impl<'de> Deserialize<'de> for ArcRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        if value > i64::from(u32::MAX) || value < !i64::from(u32::MAX) {
            return Err(serde::de::Error::custom(format!(
                "arc reference {} out of range",
                value
            )));
        }
        Ok(ArcRef::from_encoded(value))
    }
}
