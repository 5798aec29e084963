//! Zet and orientation classification of basis indices.
//!
//! Zets partition the 16 basis elements into 4 groups of 4, each consisting
//! of a single time-like element paired with three space-like elements that
//! behave like a 3-vector. Orientations are the t/x/y/z roles cutting across
//! zets. Both classifications depend only on the *set* of generators making
//! up an index, never on the label ordering chosen by a configuration.

use serde::{Deserialize, Serialize};

use crate::error::AlgebraError;

/// The four zet partitions of the algebra.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zet {
    /// Magnetic field and rest mass (`p 23 31 12`).
    B,
    /// Angular momentum and charge density (`0 023 031 012`).
    T,
    /// Current density and hedgehog (`123 1 2 3`).
    A,
    /// Electric field and dual rest mass (`0123 01 02 03`).
    E,
}

impl Zet {
    /// Classify a basis index by its generator set.
    pub fn of_index(index: &str) -> Result<Zet, AlgebraError> {
        if index == "p" {
            return Ok(Zet::B);
        }
        if index.is_empty() || !index.chars().all(|c| matches!(c, '0'..='3')) {
            return Err(AlgebraError::InvalidIndex {
                index: index.to_string(),
            });
        }

        let has_zero = index.contains('0');
        match (index.len(), has_zero) {
            (2, false) => Ok(Zet::B),
            (1, true) | (3, true) => Ok(Zet::T),
            (1, false) | (3, false) => Ok(Zet::A),
            (2, true) | (4, true) => Ok(Zet::E),
            _ => Err(AlgebraError::InvalidIndex {
                index: index.to_string(),
            }),
        }
    }

    /// Unicode superscript used when rendering zet-tagged operators.
    pub fn superscript(self) -> &'static str {
        match self {
            Zet::B => "ᴮ",
            Zet::T => "ᵀ",
            Zet::A => "ᴬ",
            Zet::E => "ᴱ",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Zet::B => "B",
            Zet::T => "T",
            Zet::A => "A",
            Zet::E => "E",
        }
    }

    pub const ALL: [Zet; 4] = [Zet::B, Zet::T, Zet::A, Zet::E];
}

/// The t/x/y/z role of a basis element within its zet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Orientation {
    /// Time-like (`p 0 123 0123`).
    T,
    /// Space-x (`1 23 023 01`).
    X,
    /// Space-y (`2 31 031 02`).
    Y,
    /// Space-z (`3 12 012 03`).
    Z,
}

impl Orientation {
    /// Classify a basis index by its generator set.
    pub fn of_index(index: &str) -> Result<Orientation, AlgebraError> {
        // Generator bitmask: bit n set iff generator n appears in the index.
        match generator_set(index)? {
            0b0000 | 0b0001 | 0b1110 | 0b1111 => Ok(Orientation::T),
            0b0010 | 0b1100 | 0b1101 | 0b0011 => Ok(Orientation::X),
            0b0100 | 0b1010 | 0b1011 | 0b0101 => Ok(Orientation::Y),
            0b1000 | 0b0110 | 0b0111 | 0b1001 => Ok(Orientation::Z),
            _ => Err(AlgebraError::InvalidIndex {
                index: index.to_string(),
            }),
        }
    }

    pub const ALL: [Orientation; 4] = [Orientation::T, Orientation::X, Orientation::Y, Orientation::Z];

    pub const SPATIAL: [Orientation; 3] = [Orientation::X, Orientation::Y, Orientation::Z];
}

/// Bitmask of the generators present in an index (`p` contributes nothing).
fn generator_set(index: &str) -> Result<u8, AlgebraError> {
    index.chars().try_fold(0u8, |mask, c| match c {
        '0' => Ok(mask | 0b0001),
        '1' => Ok(mask | 0b0010),
        '2' => Ok(mask | 0b0100),
        '3' => Ok(mask | 0b1000),
        'p' => Ok(mask),
        _ => Err(AlgebraError::InvalidIndex {
            index: index.to_string(),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zets_partition_the_basis() {
        let expect = [
            (Zet::B, vec!["p", "23", "31", "12"]),
            (Zet::T, vec!["0", "023", "031", "012"]),
            (Zet::A, vec!["123", "1", "2", "3"]),
            (Zet::E, vec!["0123", "01", "02", "03"]),
        ];
        for (zet, members) in expect {
            for m in members {
                assert_eq!(Zet::of_index(m).unwrap(), zet, "index {m}");
            }
        }
    }

    #[test]
    fn orientation_ignores_label_order() {
        assert_eq!(Orientation::of_index("31").unwrap(), Orientation::Y);
        assert_eq!(Orientation::of_index("13").unwrap(), Orientation::Y);
        assert_eq!(Orientation::of_index("230").unwrap(), Orientation::X);
    }

    #[test]
    fn time_like_elements() {
        for ix in ["p", "0", "123", "0123"] {
            assert_eq!(Orientation::of_index(ix).unwrap(), Orientation::T);
        }
    }
}
