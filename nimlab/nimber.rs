//! Nimber is the value of a single Nim heap; adding nimbers is the nim-sum.

use auto_ops::impl_op_ex;
use std::{fmt::Display, iter::Sum};

/// Value of a Nim heap of given size.
///
/// Addition is overloaded to bitwise xor, so summing the piles of a board gives its nim-sum.
#[repr(transparent)]
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nimber(u32);

impl Nimber {
    /// Construct new nimber
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the underlying heap size
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Check if the nimber is zero, i.e. the position is lost for the player to move
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Minimum excluded value of the nimbers of the options.
    /// See <https://en.wikipedia.org/wiki/Mex_(mathematics)>
    pub fn mex(mut nimbers: Vec<Self>) -> Self {
        nimbers.sort_unstable();
        nimbers.dedup();
        let mut current = 0;
        for n in nimbers {
            if n.0 != current {
                break;
            }
            current += 1;
        }
        Self(current)
    }
}

impl From<u32> for Nimber {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl_op_ex!(+|lhs: &Nimber, rhs: &Nimber| -> Nimber { Nimber(lhs.0 ^ rhs.0) });
impl_op_ex!(+=|lhs: &mut Nimber, rhs: &Nimber| { lhs.0 ^= rhs.0 });

impl Sum for Nimber {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nimber(0), |acc, n| acc + n)
    }
}

impl<'a> Sum<&'a Nimber> for Nimber {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Nimber(0), |acc, n| acc + n)
    }
}

impl Display for Nimber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            0 => write!(f, "0"),
            1 => write!(f, "*"),
            n => write!(f, "*{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mex_skips_duplicates_and_gaps() {
        assert_eq!(
            Nimber(3),
            Nimber::mex(vec![Nimber(0), Nimber(0), Nimber(2), Nimber(5), Nimber(1)])
        );
        assert_eq!(Nimber(1), Nimber::mex(vec![Nimber(0), Nimber(2)]));
        assert_eq!(Nimber(0), Nimber::mex(vec![Nimber(4)]));
        assert_eq!(Nimber(0), Nimber::mex(vec![]));
    }

    #[test]
    fn sum_is_xor() {
        let piles = [1, 3, 5].map(Nimber::new);
        assert_eq!(piles.iter().sum::<Nimber>(), Nimber(7));
        assert!([1, 2, 3].map(Nimber::new).into_iter().sum::<Nimber>().is_zero());
        assert_eq!(Nimber(6).to_string(), "*6");
    }
}
