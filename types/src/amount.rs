//! Token amount types for the overlay ledger.
//!
//! Amounts are represented as fixed-point integers to avoid floating-point
//! errors on any balance-affecting path. Overlay balances are `u128` raw
//! units (10^-8 of one whole token); host-chain output values are `u64`
//! smallest units.

use crate::params::HOST_UNIT_SCALE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// An amount of an overlay-protocol token, in raw units.
///
/// Internally stored as `u128` for precision. One whole token is
/// [`HOST_UNIT_SCALE`] raw units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Convert a host-chain amount into raw overlay units.
    ///
    /// This is the fundraiser conversion: `floor(v × 10^8)`. The
    /// multiplication is exact in integers, so truncation is implicit;
    /// widening to `u128` makes overflow impossible for any `u64` input.
    pub fn from_host_units(host: HostAmount) -> Self {
        Self(host.raw() as u128 * HOST_UNIT_SCALE as u128)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Add for TokenAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TokenAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} raw", self.0)
    }
}

/// An amount in the host chain's smallest unit (an output value).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HostAmount(u64);

impl HostAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(units: u64) -> Self {
        Self(units)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for HostAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} host units", self.0)
    }
}
