//! Fixed-capacity base-2^64 limb buffers.
//!
//! A `LimbBuffer` owns a storage block allocated once at creation and never
//! grown. Only the first `len` limbs carry value bits; everything above is
//! scratch that arithmetic routines are free to overwrite.

use std::fmt;

use crate::calculator::FibError;
use crate::render::render_decimal;

/// One base-2^64 digit.
pub type Limb = u64;

/// Allocate `len` zero limbs, reporting failure instead of aborting.
pub fn zeroed_limbs(len: usize) -> Result<Vec<Limb>, FibError> {
    let mut limbs = Vec::new();
    limbs
        .try_reserve_exact(len)
        .map_err(|_| FibError::AllocationFailure(len))?;
    limbs.resize(len, 0);
    Ok(limbs)
}

/// Non-negative integer stored little-endian in a fixed-capacity limb block.
///
/// Invariants:
/// - `1 <= len <= capacity`
/// - `limbs[len - 1] != 0` unless `len == 1` (the value zero)
///
/// # Example
/// ```
/// use fibengine_core::LimbBuffer;
///
/// let mut buf = LimbBuffer::allocate(4).unwrap();
/// assert!(buf.is_zero());
/// buf.set_u64(55);
/// assert_eq!(buf.as_limbs(), &[55]);
/// assert_eq!(buf.to_string(), "55");
/// ```
#[derive(Clone)]
pub struct LimbBuffer {
    len: usize,
    limbs: Vec<Limb>,
}

#[allow(clippy::len_without_is_empty)]
impl LimbBuffer {
    /// Allocate a zero-valued buffer able to hold `capacity` limbs.
    ///
    /// A capacity of zero is rounded up to one so the zero value is representable.
    pub fn allocate(capacity: usize) -> Result<Self, FibError> {
        let limbs = zeroed_limbs(capacity.max(1))?;
        Ok(Self { len: 1, limbs })
    }

    /// Build a buffer from little-endian limbs, ignoring leading zero limbs.
    pub fn from_limbs(value: &[Limb], capacity: usize) -> Result<Self, FibError> {
        let significant = significant_len(value);
        let mut buf = Self::allocate(capacity)?;
        buf.ensure_capacity(significant)?;
        buf.limbs[..significant].copy_from_slice(&value[..significant]);
        buf.len = significant.max(1);
        Ok(buf)
    }

    /// Number of significant limbs (at least one).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of limbs the buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.limbs.len()
    }

    /// Whether the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.len == 1 && self.limbs[0] == 0
    }

    /// The significant limbs, least significant first.
    #[inline]
    pub fn as_limbs(&self) -> &[Limb] {
        &self.limbs[..self.len]
    }

    /// Copy the significant limbs out for transfer across the boundary.
    pub fn to_vec(&self) -> Vec<Limb> {
        self.as_limbs().to_vec()
    }

    /// Overwrite the value with a single-limb integer.
    pub fn set_u64(&mut self, value: Limb) {
        self.limbs[0] = value;
        self.len = 1;
    }

    /// Reset the value to zero.
    pub fn clear(&mut self) {
        self.set_u64(0);
    }

    /// Exchange the complete state of two buffers in O(1).
    ///
    /// Only the storage handles move; no limb data is copied.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Fail with `CapacityExceeded` unless `needed` limbs fit.
    pub(crate) fn ensure_capacity(&self, needed: usize) -> Result<(), FibError> {
        if needed > self.capacity() {
            return Err(FibError::CapacityExceeded {
                needed,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    /// Whole storage block, including scratch limbs above `len`.
    #[inline]
    pub(crate) fn storage_mut(&mut self) -> &mut [Limb] {
        &mut self.limbs
    }

    #[inline]
    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len >= 1 && len <= self.capacity());
        self.len = len;
    }

    /// Drop leading zero limbs, keeping at least one.
    pub(crate) fn normalize(&mut self) {
        while self.len > 1 && self.limbs[self.len - 1] == 0 {
            self.len -= 1;
        }
    }

    /// Append a carried-out limb of value one above the current top.
    pub(crate) fn push_carry(&mut self, carry: bool) -> Result<(), FibError> {
        if !carry {
            return Ok(());
        }
        self.ensure_capacity(self.len + 1)?;
        self.limbs[self.len] = 1;
        self.len += 1;
        Ok(())
    }
}

/// Length of `limbs` with leading (most significant) zero limbs removed.
pub(crate) fn significant_len(limbs: &[Limb]) -> usize {
    limbs.iter().rposition(|&l| l != 0).map_or(0, |i| i + 1)
}

impl PartialEq for LimbBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_limbs() == other.as_limbs()
    }
}

impl Eq for LimbBuffer {}

impl fmt::Debug for LimbBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LimbBuffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("limbs", &self.as_limbs())
            .finish()
    }
}

impl fmt::Display for LimbBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_decimal(self.as_limbs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_limbs_reports_failure() {
        assert_eq!(zeroed_limbs(3).unwrap(), vec![0, 0, 0]);
        assert!(zeroed_limbs(0).unwrap().is_empty());
        assert_eq!(
            zeroed_limbs(usize::MAX / 8),
            Err(FibError::AllocationFailure(usize::MAX / 8))
        );
    }

    #[test]
    fn allocate_is_zero() {
        let buf = LimbBuffer::allocate(8).unwrap();
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.capacity(), 8);
        assert!(buf.is_zero());
        assert_eq!(buf.as_limbs(), &[0]);
    }

    #[test]
    fn allocate_zero_capacity_rounds_up() {
        let buf = LimbBuffer::allocate(0).unwrap();
        assert_eq!(buf.capacity(), 1);
        assert!(buf.is_zero());
    }

    #[test]
    fn allocate_huge_fails_cleanly() {
        let result = LimbBuffer::allocate(usize::MAX / 4);
        assert!(matches!(result, Err(FibError::AllocationFailure(_))));
    }

    #[test]
    fn from_limbs_trims_leading_zeros() {
        let buf = LimbBuffer::from_limbs(&[7, 9, 0, 0], 4).unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.as_limbs(), &[7, 9]);
    }

    #[test]
    fn from_limbs_all_zero() {
        let buf = LimbBuffer::from_limbs(&[0, 0, 0], 3).unwrap();
        assert!(buf.is_zero());
        let empty = LimbBuffer::from_limbs(&[], 2).unwrap();
        assert!(empty.is_zero());
    }

    #[test]
    fn from_limbs_over_capacity() {
        let result = LimbBuffer::from_limbs(&[1, 2, 3], 2);
        assert_eq!(
            result.unwrap_err(),
            FibError::CapacityExceeded {
                needed: 3,
                capacity: 2
            }
        );
    }

    #[test]
    fn swap_exchanges_everything() {
        let mut a = LimbBuffer::from_limbs(&[1, 2], 2).unwrap();
        let mut b = LimbBuffer::from_limbs(&[3], 5).unwrap();
        a.swap(&mut b);
        assert_eq!(a.as_limbs(), &[3]);
        assert_eq!(a.capacity(), 5);
        assert_eq!(b.as_limbs(), &[1, 2]);
        assert_eq!(b.capacity(), 2);
    }

    #[test]
    fn swap_moves_storage_not_data() {
        let mut a = LimbBuffer::allocate(16).unwrap();
        let mut b = LimbBuffer::allocate(16).unwrap();
        let a_ptr = a.as_limbs().as_ptr();
        a.swap(&mut b);
        assert_eq!(b.as_limbs().as_ptr(), a_ptr);
    }

    #[test]
    fn equality_ignores_scratch_and_capacity() {
        let mut a = LimbBuffer::allocate(4).unwrap();
        a.storage_mut()[3] = 99;
        a.set_u64(5);
        let b = LimbBuffer::from_limbs(&[5], 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn push_carry_without_room() {
        let mut a = LimbBuffer::from_limbs(&[1, 1], 2).unwrap();
        assert!(a.push_carry(false).is_ok());
        assert!(matches!(
            a.push_carry(true),
            Err(FibError::CapacityExceeded { needed: 3, .. })
        ));
    }

    #[test]
    fn normalize_keeps_one_limb() {
        let mut a = LimbBuffer::allocate(3).unwrap();
        a.set_len(3);
        a.normalize();
        assert_eq!(a.len(), 1);
        assert!(a.is_zero());
    }

    #[test]
    fn display_renders_decimal() {
        let buf = LimbBuffer::from_limbs(&[0, 1], 2).unwrap();
        assert_eq!(buf.to_string(), "18446744073709551616");
    }
}
