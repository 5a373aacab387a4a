//! Currency identifiers within the overlay protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a token unit inside the overlay protocol.
///
/// Ids 1 and 2 are reserved for the two founding tokens created during the
/// fundraiser: Umbra and Penumbra (the secondary allocation token).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CurrencyId(u32);

impl CurrencyId {
    /// The primary founding token.
    pub const UMBRA: Self = Self(1);
    /// The secondary allocation token, credited alongside Umbra during the
    /// fundraiser.
    pub const PENUMBRA: Self = Self(2);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Whether this is one of the two founding tokens.
    pub fn is_founding(&self) -> bool {
        *self == Self::UMBRA || *self == Self::PENUMBRA
    }
}

impl fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UMBRA => write!(f, "UMB"),
            Self::PENUMBRA => write!(f, "PEN"),
            Self(id) => write!(f, "currency#{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn founding_ids_are_reserved() {
        assert!(CurrencyId::UMBRA.is_founding());
        assert!(CurrencyId::PENUMBRA.is_founding());
        assert!(!CurrencyId::new(3).is_founding());
        assert_eq!(CurrencyId::UMBRA.raw(), 1);
        assert_eq!(CurrencyId::PENUMBRA.raw(), 2);
    }
}
