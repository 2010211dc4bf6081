//! Limb arena for the recursive multiplier.
//!
//! One block is reserved per top-level computation. Each recursive
//! multiplication receives a `&mut [Limb]` view starting at its own offset
//! and carves sub-views for its temporaries with `split_at_mut`; children
//! are handed the remainder. A call whose operands have at most `n` limbs
//! never touches more than [`karatsuba_scratch_len`]`(n)` limbs past the
//! start of its view, so siblings reuse the same region one after another.

use crate::calculator::FibError;
use crate::constants::KARATSUBA_THRESHOLD;
use crate::limbs::Limb;

/// Scratch limbs needed to multiply operands of at most `n` limbs.
///
/// Below the threshold the schoolbook carry row needs `x.len() + y.len()
/// <= 2n` limbs. Above it a split at `m = ceil(n / 2)` keeps the two half
/// sums (`m + 1` limbs each) and the middle product (`2m + 2` limbs) live
/// while recursing on `m + 1`-limb operands.
#[must_use]
pub fn karatsuba_scratch_len(n: usize) -> usize {
    if n <= KARATSUBA_THRESHOLD {
        2 * n
    } else {
        let m = n.div_ceil(2);
        4 * (m + 1) + karatsuba_scratch_len(m + 1)
    }
}

/// Pre-sized limb arena handed to the recursive multiplier.
pub struct Workspace {
    arena: Vec<Limb>,
}

impl Workspace {
    /// Reserve an arena of exactly `limbs` limbs.
    pub fn allocate(limbs: usize) -> Result<Self, FibError> {
        let mut arena = Vec::new();
        arena
            .try_reserve_exact(limbs)
            .map_err(|_| FibError::AllocationFailure(limbs))?;
        arena.resize(limbs, 0);
        Ok(Self { arena })
    }

    /// Reserve an arena large enough for operands of up to `operand_limbs` limbs.
    pub fn for_operands(operand_limbs: usize) -> Result<Self, FibError> {
        Self::allocate(karatsuba_scratch_len(operand_limbs))
    }

    /// Arena size in limbs.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.arena.len()
    }

    /// Arena size in bytes.
    #[must_use]
    pub fn allocated_bytes(&self) -> usize {
        self.arena.len() * std::mem::size_of::<Limb>()
    }

    /// View of `len` limbs starting at `offset`.
    pub(crate) fn view(&mut self, offset: usize, len: usize) -> Result<&mut [Limb], FibError> {
        let end = offset.saturating_add(len);
        if end > self.arena.len() {
            return Err(FibError::CapacityExceeded {
                needed: end,
                capacity: self.arena.len(),
            });
        }
        Ok(&mut self.arena[offset..end])
    }
}
