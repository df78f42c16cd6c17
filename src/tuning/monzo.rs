use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Exponents of the two generators: `P^m * Q^n`.
///
/// Lattice coordinates are monzos, so the component-wise arithmetic below is
/// also how the note generator moves around the lattice (octaves, flats,
/// sharps, re-basing onto a reference note).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Monzo {
    pub m: i32,
    pub n: i32,
}

impl Monzo {
    pub const ORIGIN: Monzo = Monzo { m: 0, n: 0 };

    pub const fn new(m: i32, n: i32) -> Self {
        Self { m, n }
    }

    /// The monzo as a 2D vector, ready for a linear map.
    pub fn to_vector(self) -> (f64, f64) {
        (self.m as f64, self.n as f64)
    }
}

impl Add for Monzo {
    type Output = Monzo;

    fn add(self, rhs: Monzo) -> Monzo {
        Monzo::new(self.m + rhs.m, self.n + rhs.n)
    }
}

impl Sub for Monzo {
    type Output = Monzo;

    fn sub(self, rhs: Monzo) -> Monzo {
        Monzo::new(self.m - rhs.m, self.n - rhs.n)
    }
}

impl Neg for Monzo {
    type Output = Monzo;

    fn neg(self) -> Monzo {
        Monzo::new(-self.m, -self.n)
    }
}

impl Mul<i32> for Monzo {
    type Output = Monzo;

    fn mul(self, k: i32) -> Monzo {
        Monzo::new(self.m * k, self.n * k)
    }
}

/// Bra-ket notation used on the lattice labels: `［m n〉`.
impl fmt::Display for Monzo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "［{} {}〉", self.m, self.n)
    }
}
