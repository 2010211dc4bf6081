//! Fast Doubling algorithm over fixed-capacity limb buffers.
//!
//! Uses the doubling identities:
//!   F(2m)   = 2·F(m+1)² − 2·F(m)² ∓ 2 − F(m)²   (via Cassini, `+2` for odd m)
//!   F(2m+1) = F(m+1)² + F(m)²
//!
//! Iterates from MSB to LSB over the bits of k, so F(k) costs O(log k)
//! multiplications. The last step only needs one of the two results and
//! computes it with a single product or a sum of squares.

use crate::calculator::{CoreCalculator, FibError};
use crate::capacity::CapacityEstimate;
use crate::kernel::{
    add, add_assign, add_constant, left_shift, sub, sub_assign, sub_constant, swap,
};
use crate::limbs::LimbBuffer;
use crate::strategy::{KaratsubaStrategy, Multiplier, SchoolbookStrategy, Strategy};

/// Run the doubling loop for F(k) with `working`-limb buffers.
///
/// Holds `a = F(m)` and `b = F(m+1)`, starting from `m = 0`.
pub(crate) fn execute_doubling_loop<M: Multiplier>(
    k: u64,
    working: usize,
    mul: &mut M,
) -> Result<LimbBuffer, FibError> {
    let mut a = LimbBuffer::allocate(working)?;
    let mut b = LimbBuffer::allocate(working)?;
    if k <= 1 {
        a.set_u64(k);
        return Ok(a);
    }
    b.set_u64(1);
    let mut aa = LimbBuffer::allocate(working)?;
    let mut bb = LimbBuffer::allocate(working)?;

    let top = 63 - k.leading_zeros();
    let mut m_is_odd = false;

    for bit in (1..=top).rev() {
        mul.multiply(&mut aa, &a, &a)?;
        mul.multiply(&mut bb, &b, &b)?;

        // a = 2(b² − a²) ± 2 − a² = F(2m)
        sub(&mut a, &bb, &aa)?;
        left_shift(&mut a)?;
        if m_is_odd {
            add_constant(&mut a, 2)?;
        } else {
            sub_constant(&mut a, 2)?;
        }
        sub_assign(&mut a, &aa)?;

        // b = a² + b² = F(2m+1)
        add(&mut b, &aa, &bb)?;

        m_is_odd = (k >> bit) & 1 == 1;
        if m_is_odd {
            add_assign(&mut a, &b)?;
            swap(&mut a, &mut b);
        }
    }

    if k & 1 == 1 {
        // F(2m+1) = F(m)² + F(m+1)²
        mul.multiply(&mut aa, &a, &a)?;
        mul.multiply(&mut bb, &b, &b)?;
        add(&mut a, &aa, &bb)?;
    } else {
        // F(2m) = F(m)·(2F(m+1) − F(m))
        left_shift(&mut b)?;
        sub_assign(&mut b, &a)?;
        mul.multiply(&mut aa, &b, &a)?;
        swap(&mut a, &mut aa);
    }
    Ok(a)
}

/// Fast Doubling calculator multiplying by the schoolbook method.
///
/// # Example
/// ```
/// use fibengine_core::calculator::CoreCalculator;
/// use fibengine_core::fastdoubling::OptimizedFastDoubling;
///
/// let calc = OptimizedFastDoubling::new();
/// let result = calc.calculate_core(100).unwrap();
/// assert_eq!(result.to_string(), "354224848179261915075");
/// ```
pub struct OptimizedFastDoubling;

impl OptimizedFastDoubling {
    /// Create a new `OptimizedFastDoubling` calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for OptimizedFastDoubling {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreCalculator for OptimizedFastDoubling {
    fn calculate_core(&self, k: u64) -> Result<LimbBuffer, FibError> {
        let plan = CapacityEstimate::estimate(k, Strategy::FastDoubling)?;
        tracing::debug!(
            k,
            working_limbs = plan.working_limbs,
            carry_limbs = plan.scratch_limbs,
            "sizing fast doubling buffers"
        );
        let mut mul = SchoolbookStrategy::with_capacity(plan.scratch_limbs)?;
        execute_doubling_loop(k, plan.working_limbs, &mut mul)
    }

    fn name(&self) -> &'static str {
        "FastDoubling"
    }
}

/// Fast Doubling calculator multiplying by recursive splitting.
pub struct KaratsubaFastDoubling;

impl KaratsubaFastDoubling {
    /// Create a new `KaratsubaFastDoubling` calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for KaratsubaFastDoubling {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreCalculator for KaratsubaFastDoubling {
    fn calculate_core(&self, k: u64) -> Result<LimbBuffer, FibError> {
        let plan = CapacityEstimate::estimate(k, Strategy::Karatsuba)?;
        tracing::debug!(
            k,
            working_limbs = plan.working_limbs,
            workspace_limbs = plan.scratch_limbs,
            "sizing karatsuba buffers"
        );
        let mut mul = KaratsubaStrategy::with_capacity(plan.working_limbs)?;
        execute_doubling_loop(k, plan.working_limbs, &mut mul)
    }

    fn name(&self) -> &'static str {
        "KaratsubaFastDoubling"
    }
}
