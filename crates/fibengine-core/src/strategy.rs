//! Computation strategies and the multiplier seam.
//!
//! `Strategy` names one of the three ways a read can be served.
//! `Multiplier` is the narrow interface the doubling loop multiplies through;
//! each implementation owns the scratch memory its method needs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calculator::FibError;
use crate::limbs::LimbBuffer;
use crate::multiply::{recursive_multiply, schoolbook_multiply};
use crate::workspace::Workspace;

/// How F(k) is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Linear-time addition loop.
    Iterative,
    /// Fast doubling with schoolbook multiplication.
    #[default]
    #[serde(rename = "fast", alias = "fastdoubling")]
    FastDoubling,
    /// Fast doubling with recursive (Karatsuba) multiplication.
    Karatsuba,
}

impl Strategy {
    /// Every strategy, in mode order.
    pub const ALL: [Self; 3] = [Self::Iterative, Self::FastDoubling, Self::Karatsuba];

    /// Map a device mode number to a strategy.
    ///
    /// Mode 1 is iterative and mode 2 fast doubling; every other mode
    /// selects the recursive multiplier.
    #[must_use]
    pub fn from_mode(mode: usize) -> Self {
        match mode {
            1 => Self::Iterative,
            2 => Self::FastDoubling,
            _ => Self::Karatsuba,
        }
    }

    /// Device mode number for this strategy.
    #[must_use]
    pub fn mode(self) -> usize {
        match self {
            Self::Iterative => 1,
            Self::FastDoubling => 2,
            Self::Karatsuba => 3,
        }
    }

    /// Short lowercase name used on the command line and in the registry.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Iterative => "iterative",
            Self::FastDoubling => "fast",
            Self::Karatsuba => "karatsuba",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = FibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iterative" => Ok(Self::Iterative),
            "fast" | "fastdoubling" => Ok(Self::FastDoubling),
            "karatsuba" => Ok(Self::Karatsuba),
            other => Err(FibError::Config(format!("unknown strategy: {other}"))),
        }
    }
}

/// Narrow interface for multiplication operations.
pub trait Multiplier: Send {
    /// `output := x * y`.
    fn multiply(
        &mut self,
        output: &mut LimbBuffer,
        x: &LimbBuffer,
        y: &LimbBuffer,
    ) -> Result<(), FibError>;

    /// Get the name of this multiplication strategy.
    fn name(&self) -> &'static str;
}

/// Schoolbook multiplication with a dedicated carry row.
pub struct SchoolbookStrategy {
    carry: LimbBuffer,
}

impl SchoolbookStrategy {
    /// Reserve a carry row for products of up to `product_limbs` limbs.
    pub fn with_capacity(product_limbs: usize) -> Result<Self, FibError> {
        Ok(Self {
            carry: LimbBuffer::allocate(product_limbs)?,
        })
    }
}

impl Multiplier for SchoolbookStrategy {
    fn multiply(
        &mut self,
        output: &mut LimbBuffer,
        x: &LimbBuffer,
        y: &LimbBuffer,
    ) -> Result<(), FibError> {
        schoolbook_multiply(output, x, y, &mut self.carry)
    }

    fn name(&self) -> &'static str {
        "Schoolbook"
    }
}

/// Recursive (Karatsuba) multiplication over a pre-sized arena.
pub struct KaratsubaStrategy {
    workspace: Workspace,
}

impl KaratsubaStrategy {
    /// Reserve an arena for operands of up to `operand_limbs` limbs.
    pub fn with_capacity(operand_limbs: usize) -> Result<Self, FibError> {
        Ok(Self {
            workspace: Workspace::for_operands(operand_limbs)?,
        })
    }
}

impl Multiplier for KaratsubaStrategy {
    fn multiply(
        &mut self,
        output: &mut LimbBuffer,
        x: &LimbBuffer,
        y: &LimbBuffer,
    ) -> Result<(), FibError> {
        recursive_multiply(output, x, y, &mut self.workspace)
    }

    fn name(&self) -> &'static str {
        "Karatsuba"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mode_matches_device_modes() {
        assert_eq!(Strategy::from_mode(1), Strategy::Iterative);
        assert_eq!(Strategy::from_mode(2), Strategy::FastDoubling);
        assert_eq!(Strategy::from_mode(3), Strategy::Karatsuba);
        assert_eq!(Strategy::from_mode(0), Strategy::Karatsuba);
        assert_eq!(Strategy::from_mode(15), Strategy::Karatsuba);
    }

    #[test]
    fn mode_round_trips() {
        for s in Strategy::ALL {
            assert_eq!(Strategy::from_mode(s.mode()), s);
        }
    }

    #[test]
    fn default_is_fast_doubling() {
        assert_eq!(Strategy::default(), Strategy::FastDoubling);
    }

    #[test]
    fn parse_names() {
        assert_eq!("iterative".parse::<Strategy>().unwrap(), Strategy::Iterative);
        assert_eq!("fast".parse::<Strategy>().unwrap(), Strategy::FastDoubling);
        assert_eq!(
            "FastDoubling".parse::<Strategy>().unwrap(),
            Strategy::FastDoubling
        );
        assert_eq!(" karatsuba ".parse::<Strategy>().unwrap(), Strategy::Karatsuba);
        assert!(matches!(
            "matrix".parse::<Strategy>(),
            Err(FibError::Config(_))
        ));
    }

    #[test]
    fn display_uses_short_name() {
        assert_eq!(Strategy::FastDoubling.to_string(), "fast");
        for s in Strategy::ALL {
            assert_eq!(s.to_string().parse::<Strategy>().unwrap(), s);
        }
    }

    #[test]
    fn serde_names() {
        assert_eq!(
            serde_json::to_string(&Strategy::FastDoubling).unwrap(),
            "\"fast\""
        );
        assert_eq!(
            serde_json::from_str::<Strategy>("\"fastdoubling\"").unwrap(),
            Strategy::FastDoubling
        );
        assert_eq!(
            serde_json::from_str::<Strategy>("\"karatsuba\"").unwrap(),
            Strategy::Karatsuba
        );
    }

    #[test]
    fn multipliers_agree() {
        let x = LimbBuffer::from_limbs(&[u64::MAX; 12], 12).unwrap();
        let y = LimbBuffer::from_limbs(&[3, 5, 7, 11, 13, 17, 19, 23, 29, 31], 10).unwrap();
        let mut a = LimbBuffer::allocate(22).unwrap();
        let mut b = LimbBuffer::allocate(22).unwrap();

        let mut school = SchoolbookStrategy::with_capacity(22).unwrap();
        let mut kara = KaratsubaStrategy::with_capacity(12).unwrap();
        school.multiply(&mut a, &x, &y).unwrap();
        kara.multiply(&mut b, &x, &y).unwrap();
        assert_eq!(a, b);
        assert_eq!(school.name(), "Schoolbook");
        assert_eq!(kara.name(), "Karatsuba");
    }
}
