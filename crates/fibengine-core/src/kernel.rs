//! In-place limb arithmetic kernel.
//!
//! Slice primitives at the bottom operate on fixed-length limb runs and
//! report the carry or borrow out of the top limb. The `LimbBuffer`
//! operations above them add length and capacity bookkeeping and turn
//! overflow and precondition violations into `FibError`s.
//!
//! On error the destination buffer holds an unspecified (but in-bounds)
//! value and must not be read.

use crate::calculator::FibError;
use crate::limbs::{Limb, LimbBuffer};

#[inline]
fn adc(a: Limb, b: Limb, carry: bool) -> (Limb, bool) {
    let (sum, c1) = a.overflowing_add(b);
    let (sum, c2) = sum.overflowing_add(Limb::from(carry));
    (sum, c1 | c2)
}

#[inline]
fn sbb(a: Limb, b: Limb, borrow: bool) -> (Limb, bool) {
    let (diff, b1) = a.overflowing_sub(b);
    let (diff, b2) = diff.overflowing_sub(Limb::from(borrow));
    (diff, b1 | b2)
}

fn propagate_carry(limbs: &mut [Limb], mut carry: bool) -> bool {
    for limb in limbs {
        if !carry {
            break;
        }
        let (sum, c) = limb.overflowing_add(1);
        *limb = sum;
        carry = c;
    }
    carry
}

fn propagate_borrow(limbs: &mut [Limb], mut borrow: bool) -> bool {
    for limb in limbs {
        if !borrow {
            break;
        }
        let (diff, b) = limb.overflowing_sub(1);
        *limb = diff;
        borrow = b;
    }
    borrow
}

/// `acc += y` across all of `acc`; returns the carry out of the top limb.
pub(crate) fn add_in_place(acc: &mut [Limb], y: &[Limb]) -> bool {
    debug_assert!(acc.len() >= y.len());
    let (low, high) = acc.split_at_mut(y.len());
    let mut carry = false;
    for (a, &b) in low.iter_mut().zip(y) {
        (*a, carry) = adc(*a, b, carry);
    }
    propagate_carry(high, carry)
}

/// `acc -= y` across all of `acc`; returns the borrow out of the top limb.
pub(crate) fn sub_in_place(acc: &mut [Limb], y: &[Limb]) -> bool {
    debug_assert!(acc.len() >= y.len());
    let (low, high) = acc.split_at_mut(y.len());
    let mut borrow = false;
    for (a, &b) in low.iter_mut().zip(y) {
        (*a, borrow) = sbb(*a, b, borrow);
    }
    propagate_borrow(high, borrow)
}

/// `out = x + y` with `out.len() == x.len() >= y.len()`; returns the carry.
fn add_into(out: &mut [Limb], x: &[Limb], y: &[Limb]) -> bool {
    debug_assert!(out.len() == x.len() && x.len() >= y.len());
    let mut carry = false;
    for (i, o) in out.iter_mut().enumerate() {
        let b = y.get(i).copied().unwrap_or(0);
        (*o, carry) = adc(x[i], b, carry);
    }
    carry
}

/// `out = x - y` with `out.len() == x.len() >= y.len()`; returns the borrow.
fn sub_into(out: &mut [Limb], x: &[Limb], y: &[Limb]) -> bool {
    debug_assert!(out.len() == x.len() && x.len() >= y.len());
    let mut borrow = false;
    for (i, o) in out.iter_mut().enumerate() {
        let b = y.get(i).copied().unwrap_or(0);
        (*o, borrow) = sbb(x[i], b, borrow);
    }
    borrow
}

/// `output := x + y`.
///
/// The result takes `max(len x, len y)` limbs, plus one when the top carries.
pub fn add(output: &mut LimbBuffer, x: &LimbBuffer, y: &LimbBuffer) -> Result<(), FibError> {
    let (long, short) = if x.len() >= y.len() { (x, y) } else { (y, x) };
    let n = long.len();
    output.ensure_capacity(n)?;
    let carry = add_into(
        &mut output.storage_mut()[..n],
        long.as_limbs(),
        short.as_limbs(),
    );
    output.set_len(n);
    output.push_carry(carry)
}

/// `acc := acc + y`.
pub fn add_assign(acc: &mut LimbBuffer, y: &LimbBuffer) -> Result<(), FibError> {
    let n = acc.len().max(y.len());
    acc.ensure_capacity(n)?;
    let old_len = acc.len();
    let storage = acc.storage_mut();
    storage[old_len..n].fill(0);
    let carry = add_in_place(&mut storage[..n], y.as_limbs());
    acc.set_len(n);
    acc.push_carry(carry)
}

/// `output := x - y`. Requires `x >= y`.
pub fn sub(output: &mut LimbBuffer, x: &LimbBuffer, y: &LimbBuffer) -> Result<(), FibError> {
    if y.len() > x.len() {
        return Err(FibError::PreconditionViolation("subtrahend exceeds minuend"));
    }
    let n = x.len();
    output.ensure_capacity(n)?;
    let borrow = sub_into(&mut output.storage_mut()[..n], x.as_limbs(), y.as_limbs());
    output.set_len(n);
    if borrow {
        return Err(FibError::PreconditionViolation("subtrahend exceeds minuend"));
    }
    output.normalize();
    Ok(())
}

/// `acc := acc - y`. Requires `acc >= y`.
pub fn sub_assign(acc: &mut LimbBuffer, y: &LimbBuffer) -> Result<(), FibError> {
    if y.len() > acc.len() {
        return Err(FibError::PreconditionViolation("subtrahend exceeds minuend"));
    }
    let n = acc.len();
    if sub_in_place(&mut acc.storage_mut()[..n], y.as_limbs()) {
        return Err(FibError::PreconditionViolation("subtrahend exceeds minuend"));
    }
    acc.normalize();
    Ok(())
}

/// Double the value in place.
pub fn left_shift(output: &mut LimbBuffer) -> Result<(), FibError> {
    let n = output.len();
    let mut carry: Limb = 0;
    for limb in &mut output.storage_mut()[..n] {
        let top = *limb >> 63;
        *limb = (*limb << 1) | carry;
        carry = top;
    }
    output.push_carry(carry != 0)
}

/// Add a single-limb constant in place.
pub fn add_constant(output: &mut LimbBuffer, c: Limb) -> Result<(), FibError> {
    let n = output.len();
    let carry = add_in_place(&mut output.storage_mut()[..n], &[c]);
    output.push_carry(carry)
}

/// Subtract a single-limb constant in place. Requires `c <= value`.
pub fn sub_constant(output: &mut LimbBuffer, c: Limb) -> Result<(), FibError> {
    if output.len() == 1 && output.as_limbs()[0] < c {
        return Err(FibError::PreconditionViolation("constant exceeds value"));
    }
    let n = output.len();
    let borrow = sub_in_place(&mut output.storage_mut()[..n], &[c]);
    debug_assert!(!borrow);
    output.normalize();
    Ok(())
}

/// Exchange two buffers in O(1).
#[inline]
pub fn swap(a: &mut LimbBuffer, b: &mut LimbBuffer) {
    a.swap(b);
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: Limb = Limb::MAX;

    fn buf(limbs: &[Limb], capacity: usize) -> LimbBuffer {
        LimbBuffer::from_limbs(limbs, capacity).unwrap()
    }

    #[test]
    fn add_simple() {
        let mut out = LimbBuffer::allocate(4).unwrap();
        add(&mut out, &buf(&[2], 1), &buf(&[3], 1)).unwrap();
        assert_eq!(out.as_limbs(), &[5]);
    }

    #[test]
    fn add_carry_extends_length() {
        let mut out = LimbBuffer::allocate(3).unwrap();
        add(&mut out, &buf(&[MAX, MAX], 2), &buf(&[1], 1)).unwrap();
        assert_eq!(out.as_limbs(), &[0, 0, 1]);
    }

    #[test]
    fn add_carry_without_room_is_reported() {
        let mut out = LimbBuffer::allocate(2).unwrap();
        let result = add(&mut out, &buf(&[MAX, MAX], 2), &buf(&[1], 1));
        assert_eq!(
            result,
            Err(FibError::CapacityExceeded {
                needed: 3,
                capacity: 2
            })
        );
    }

    #[test]
    fn add_operand_order_irrelevant() {
        let x = buf(&[MAX, 5, 7], 3);
        let y = buf(&[1], 1);
        let mut xy = LimbBuffer::allocate(4).unwrap();
        let mut yx = LimbBuffer::allocate(4).unwrap();
        add(&mut xy, &x, &y).unwrap();
        add(&mut yx, &y, &x).unwrap();
        assert_eq!(xy, yx);
        assert_eq!(xy.as_limbs(), &[0, 6, 7]);
    }

    #[test]
    fn add_assign_grows_from_shorter_accumulator() {
        let mut acc = LimbBuffer::allocate(4).unwrap();
        acc.storage_mut()[1] = 0xDEAD;
        acc.storage_mut()[2] = 0xBEEF;
        acc.set_u64(1);
        add_assign(&mut acc, &buf(&[MAX, 3, 4], 3)).unwrap();
        assert_eq!(acc.as_limbs(), &[0, 4, 4]);
    }

    #[test]
    fn add_assign_to_zero() {
        let mut acc = LimbBuffer::allocate(2).unwrap();
        add_assign(&mut acc, &buf(&[0], 1)).unwrap();
        assert!(acc.is_zero());
    }

    #[test]
    fn sub_with_borrow_chain() {
        let mut out = LimbBuffer::allocate(3).unwrap();
        sub(&mut out, &buf(&[0, 0, 1], 3), &buf(&[1], 1)).unwrap();
        assert_eq!(out.as_limbs(), &[MAX, MAX]);
    }

    #[test]
    fn sub_to_zero_normalizes() {
        let mut out = LimbBuffer::allocate(3).unwrap();
        let x = buf(&[4, 9, 2], 3);
        sub(&mut out, &x, &x).unwrap();
        assert!(out.is_zero());
    }

    #[test]
    fn sub_longer_subtrahend_rejected() {
        let mut out = LimbBuffer::allocate(3).unwrap();
        let result = sub(&mut out, &buf(&[1], 1), &buf(&[0, 1], 2));
        assert!(matches!(result, Err(FibError::PreconditionViolation(_))));
    }

    #[test]
    fn sub_same_length_larger_subtrahend_rejected() {
        let mut out = LimbBuffer::allocate(3).unwrap();
        let result = sub(&mut out, &buf(&[5, 1], 2), &buf(&[6, 1], 2));
        assert!(matches!(result, Err(FibError::PreconditionViolation(_))));
    }

    #[test]
    fn sub_assign_in_place() {
        let mut acc = buf(&[10, 1], 2);
        sub_assign(&mut acc, &buf(&[11], 1)).unwrap();
        assert_eq!(acc.as_limbs(), &[MAX]);
        assert!(matches!(
            sub_assign(&mut acc, &buf(&[0, 1], 2)),
            Err(FibError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn add_then_sub_round_trip() {
        let x = buf(&[MAX, 0, MAX, 12], 5);
        let y = buf(&[MAX, MAX, 3], 5);
        let mut diff = LimbBuffer::allocate(5).unwrap();
        let mut back = LimbBuffer::allocate(5).unwrap();
        sub(&mut diff, &x, &y).unwrap();
        add(&mut back, &diff, &y).unwrap();
        assert_eq!(back, x);
    }

    #[test]
    fn left_shift_carries_between_limbs() {
        let mut a = buf(&[1 << 63, 1], 3);
        left_shift(&mut a).unwrap();
        assert_eq!(a.as_limbs(), &[0, 3]);
    }

    #[test]
    fn left_shift_grows_top() {
        let mut a = buf(&[MAX], 2);
        left_shift(&mut a).unwrap();
        assert_eq!(a.as_limbs(), &[MAX - 1, 1]);
    }

    #[test]
    fn left_shift_without_room_is_reported() {
        let mut a = buf(&[1 << 63], 1);
        assert!(matches!(
            left_shift(&mut a),
            Err(FibError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn left_shift_then_subtract_recovers_original() {
        let original = buf(&[0x8000_0000_0000_0001, MAX, 42], 4);
        let mut doubled = original.clone();
        left_shift(&mut doubled).unwrap();
        sub_assign(&mut doubled, &original).unwrap();
        assert_eq!(doubled, original);
    }

    #[test]
    fn add_constant_ripples() {
        let mut a = buf(&[MAX - 1, MAX], 3);
        add_constant(&mut a, 2).unwrap();
        assert_eq!(a.as_limbs(), &[0, 0, 1]);
    }

    #[test]
    fn sub_constant_ripples_and_trims() {
        let mut a = buf(&[1, 1], 2);
        sub_constant(&mut a, 2).unwrap();
        assert_eq!(a.as_limbs(), &[MAX]);
    }

    #[test]
    fn sub_constant_to_zero() {
        let mut a = buf(&[2], 1);
        sub_constant(&mut a, 2).unwrap();
        assert!(a.is_zero());
    }

    #[test]
    fn sub_constant_exceeding_value_rejected() {
        let mut a = buf(&[1], 1);
        assert!(matches!(
            sub_constant(&mut a, 2),
            Err(FibError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn swap_free_function() {
        let mut a = buf(&[1], 1);
        let mut b = buf(&[2, 3], 2);
        swap(&mut a, &mut b);
        assert_eq!(a.as_limbs(), &[2, 3]);
        assert_eq!(b.as_limbs(), &[1]);
    }

    #[test]
    fn slice_primitives_report_overflow() {
        let mut acc = [MAX, MAX];
        assert!(add_in_place(&mut acc, &[1]));
        assert_eq!(acc, [0, 0]);
        assert!(sub_in_place(&mut acc, &[1]));
        assert_eq!(acc, [MAX, MAX]);
    }
}
