//! Iterative Fibonacci baseline.
//!
//! Linear in k, but it only ever adds, so it doubles as the oracle the
//! doubling strategies are checked against.

use crate::calculator::{CoreCalculator, FibError};
use crate::capacity::CapacityEstimate;
use crate::kernel::{add_assign, swap};
use crate::limbs::LimbBuffer;
use crate::strategy::Strategy;

/// Iterative calculator: `k - 1` additions over a running pair.
pub struct IterativeCalculator;

impl IterativeCalculator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for IterativeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreCalculator for IterativeCalculator {
    fn calculate_core(&self, k: u64) -> Result<LimbBuffer, FibError> {
        let plan = CapacityEstimate::estimate(k, Strategy::Iterative)?;
        tracing::debug!(k, working_limbs = plan.working_limbs, "sizing iterative buffers");

        let mut prev = LimbBuffer::allocate(plan.working_limbs)?;
        let mut cur = LimbBuffer::allocate(plan.working_limbs)?;
        if k == 0 {
            return Ok(cur);
        }
        cur.set_u64(1);

        for _ in 1..k {
            add_assign(&mut prev, &cur)?;
            swap(&mut prev, &mut cur);
        }
        Ok(cur)
    }

    fn name(&self) -> &'static str {
        "Iterative"
    }
}
