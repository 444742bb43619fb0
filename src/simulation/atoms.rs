//! Closed table of supported particle types
//!
//! Each symbol maps to a fixed positive mass and an optional charge.
//! The table is static and not configurable at runtime

use std::fmt;
use std::str::FromStr;

use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    H,
    C,
    O,
}

impl AtomKind {
    pub const ALL: [AtomKind; 3] = [AtomKind::H, AtomKind::C, AtomKind::O];

    pub fn symbol(self) -> &'static str {
        match self {
            AtomKind::H => "H",
            AtomKind::C => "C",
            AtomKind::O => "O",
        }
    }

    /// Mass in reduced units
    pub fn mass(self) -> f64 {
        match self {
            AtomKind::H => 1.0,
            AtomKind::C => 16.0,
            AtomKind::O => 18.0,
        }
    }

    /// None of the supported types carries a charge; the LJ kernel ignores it anyway
    pub fn charge(self) -> Option<f64> {
        None
    }
}

impl FromStr for AtomKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AtomKind::ALL
            .into_iter()
            .find(|k| k.symbol() == s)
            .ok_or_else(|| SimError::InvalidParticleType(s.to_string()))
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
