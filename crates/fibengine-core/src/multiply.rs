//! Schoolbook and recursive (Karatsuba) multiplication over limb buffers.
//!
//! Both entry points check that the product fits the output before touching
//! it and report `CapacityExceeded` otherwise. The recursive multiplier works
//! on fixed-length slices: every internal call writes exactly
//! `x.len() + y.len()` limbs, leading zeros included, and draws all of its
//! temporaries from the scratch view it was given.

use crate::calculator::FibError;
use crate::constants::KARATSUBA_THRESHOLD;
use crate::kernel::{add_in_place, sub_in_place};
use crate::limbs::{Limb, LimbBuffer};
use crate::workspace::{karatsuba_scratch_len, Workspace};

/// Split the 128-bit product of two limbs into (low, high).
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn mul_wide(a: Limb, b: Limb) -> (Limb, Limb) {
    let p = u128::from(a) * u128::from(b);
    (p as Limb, (p >> 64) as Limb)
}

/// Schoolbook product with a deferred carry row.
///
/// `out` and `carry` are both `x.len() + y.len()` limbs long. Overflow from
/// adding each partial product is counted in `carry` one position up and
/// folded back in a single pass at the end.
fn schoolbook_slices(out: &mut [Limb], x: &[Limb], y: &[Limb], carry: &mut [Limb]) {
    let n = x.len() + y.len();
    debug_assert!(out.len() == n && carry.len() == n);
    out.fill(0);
    carry.fill(0);

    for (i, &xi) in x.iter().enumerate() {
        for (j, &yj) in y.iter().enumerate() {
            let (low, high) = mul_wide(xi, yj);

            let (sum, overflow) = out[i + j].overflowing_add(low);
            out[i + j] = sum;
            carry[i + j + 1] += Limb::from(overflow);

            let (sum, overflow) = out[i + j + 1].overflowing_add(high);
            out[i + j + 1] = sum;
            // The top limb only ever receives one high half, so it cannot overflow.
            if i + j + 2 < n {
                carry[i + j + 2] += Limb::from(overflow);
            }
        }
    }

    let overflow = add_in_place(out, carry);
    debug_assert!(!overflow);
}

/// `out = long * d` in one multiply-accumulate pass.
#[allow(clippy::cast_possible_truncation)]
fn mul_limb(out: &mut [Limb], long: &[Limb], d: Limb) {
    debug_assert_eq!(out.len(), long.len() + 1);
    let mut carry: Limb = 0;
    for (o, &l) in out.iter_mut().zip(long) {
        let t = u128::from(l) * u128::from(d) + u128::from(carry);
        *o = t as Limb;
        carry = (t >> 64) as Limb;
    }
    out[long.len()] = carry;
}

/// `out = lo + hi` where `out` has one limb more than `lo`.
fn sum_halves(out: &mut [Limb], lo: &[Limb], hi: &[Limb]) {
    debug_assert!(out.len() == lo.len() + 1 && hi.len() <= lo.len());
    let (body, top) = out.split_at_mut(lo.len());
    body.copy_from_slice(lo);
    top[0] = Limb::from(add_in_place(body, hi));
}

/// `out = x * y` with `out.len() == x.len() + y.len()`.
///
/// `scratch` must hold at least `karatsuba_scratch_len(max(x.len(), y.len()))` limbs.
fn mul_recursive(out: &mut [Limb], x: &[Limb], y: &[Limb], scratch: &mut [Limb]) {
    debug_assert_eq!(out.len(), x.len() + y.len());
    let n = x.len().max(y.len());
    debug_assert!(scratch.len() >= karatsuba_scratch_len(n));

    if x.len() == 1 {
        mul_limb(out, y, x[0]);
        return;
    }
    if y.len() == 1 {
        mul_limb(out, x, y[0]);
        return;
    }
    if n <= KARATSUBA_THRESHOLD {
        let carry = &mut scratch[..out.len()];
        schoolbook_slices(out, x, y, carry);
        return;
    }

    let m = n.div_ceil(2);
    let (long, short) = if x.len() >= y.len() { (x, y) } else { (y, x) };
    if short.len() <= m {
        mul_unbalanced(out, long, short, m, scratch);
    } else {
        mul_karatsuba(out, x, y, m, scratch);
    }
}

/// Short operand lies entirely below the split: `lo·short + (hi·short)·B^m`.
fn mul_unbalanced(out: &mut [Limb], long: &[Limb], short: &[Limb], m: usize, scratch: &mut [Limb]) {
    let (lo, hi) = long.split_at(m);
    let s = short.len();

    mul_recursive(&mut out[..m + s], lo, short, scratch);
    out[m + s..].fill(0);

    let (upper, rest) = scratch.split_at_mut(hi.len() + s);
    mul_recursive(upper, hi, short, rest);
    let overflow = add_in_place(&mut out[m..], upper);
    debug_assert!(!overflow);
}

/// Three half-size products: `HH·B^2m + (MID − HH − LL)·B^m + LL`.
fn mul_karatsuba(out: &mut [Limb], x: &[Limb], y: &[Limb], m: usize, scratch: &mut [Limb]) {
    let (x0, x1) = x.split_at(m);
    let (y0, y1) = y.split_at(m);

    {
        let (low, high) = out.split_at_mut(2 * m);
        mul_recursive(low, x0, y0, scratch);
        mul_recursive(high, x1, y1, scratch);
    }

    let (sx, rest) = scratch.split_at_mut(m + 1);
    let (sy, rest) = rest.split_at_mut(m + 1);
    let (mid, rest) = rest.split_at_mut(2 * m + 2);
    sum_halves(sx, x0, x1);
    sum_halves(sy, y0, y1);
    mul_recursive(mid, sx, sy, rest);

    let (low, high) = out.split_at(2 * m);
    let borrow = sub_in_place(mid, low);
    debug_assert!(!borrow);
    let borrow = sub_in_place(mid, high);
    debug_assert!(!borrow);

    // MID − HH − LL = x0·y1 + x1·y0, which fits in the limbs above offset m.
    let span = (out.len() - m).min(mid.len());
    let (mid, mid_zeros) = mid.split_at(span);
    debug_assert!(mid_zeros.iter().all(|&l| l == 0));
    let overflow = add_in_place(&mut out[m..], mid);
    debug_assert!(!overflow);
}

/// `output := x * y` by the schoolbook method, using `carry` as the deferred carry row.
///
/// Fails with `CapacityExceeded` when `len(x) + len(y)` exceeds the capacity
/// of `output` or `carry`; neither buffer is modified in that case.
pub fn schoolbook_multiply(
    output: &mut LimbBuffer,
    x: &LimbBuffer,
    y: &LimbBuffer,
    carry: &mut LimbBuffer,
) -> Result<(), FibError> {
    let n = x.len() + y.len();
    output.ensure_capacity(n)?;
    carry.ensure_capacity(n)?;

    schoolbook_slices(
        &mut output.storage_mut()[..n],
        x.as_limbs(),
        y.as_limbs(),
        &mut carry.storage_mut()[..n],
    );
    carry.clear();
    output.set_len(n);
    output.normalize();
    Ok(())
}

/// `output := x * y` by divide and conquer, with temporaries carved from `workspace`.
///
/// Fails with `CapacityExceeded` when the product does not fit `output` or the
/// arena is smaller than `karatsuba_scratch_len(max(len x, len y))`.
pub fn recursive_multiply(
    output: &mut LimbBuffer,
    x: &LimbBuffer,
    y: &LimbBuffer,
    workspace: &mut Workspace,
) -> Result<(), FibError> {
    let n = x.len() + y.len();
    output.ensure_capacity(n)?;
    let scratch_len = karatsuba_scratch_len(x.len().max(y.len()));
    let scratch = workspace.view(0, scratch_len)?;

    tracing::trace!(x_limbs = x.len(), y_limbs = y.len(), scratch_len, "recursive multiply");
    mul_recursive(
        &mut output.storage_mut()[..n],
        x.as_limbs(),
        y.as_limbs(),
        scratch,
    );
    output.set_len(n);
    output.normalize();
    Ok(())
}
