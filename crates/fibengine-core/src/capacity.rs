//! Buffer sizing and memory budget estimation.
//!
//! F(k) has about `k * log2(phi) ≈ 0.6942k` bits, i.e. `0.01085k` limbs.
//! `7/640 = 0.0109375` bounds that from above, so `2 + 7k/640` limbs always
//! hold the result.

use crate::calculator::FibError;
use crate::constants::WORKING_HEADROOM;
use crate::limbs::Limb;
use crate::strategy::Strategy;
use crate::workspace::karatsuba_scratch_len;

/// Limbs needed to hold F(k).
pub fn result_capacity(k: u64) -> Result<usize, FibError> {
    let limbs = 2 + u128::from(k) * 7 / 640;
    usize::try_from(limbs).map_err(|_| FibError::AllocationFailure(usize::MAX))
}

/// Per-call allocation plan for computing F(k) with one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityEstimate {
    /// Limbs reserved for the result.
    pub result_limbs: usize,
    /// Capacity of each working buffer.
    pub working_limbs: usize,
    /// Number of working buffers the strategy keeps live.
    pub buffers: usize,
    /// Carry row (schoolbook) or arena (recursive) limbs.
    pub scratch_limbs: usize,
    /// Total bytes allocated for the call.
    pub total_bytes: usize,
}

impl CapacityEstimate {
    /// Plan the buffers `strategy` allocates for F(k).
    pub fn estimate(k: u64, strategy: Strategy) -> Result<Self, FibError> {
        let result_limbs = result_capacity(k)?;
        let working_limbs = result_limbs + WORKING_HEADROOM;
        let (buffers, scratch_limbs) = match strategy {
            Strategy::Iterative => (2, 0),
            Strategy::FastDoubling => (4, working_limbs),
            Strategy::Karatsuba => (4, karatsuba_scratch_len(working_limbs)),
        };
        let total_limbs = buffers * working_limbs + scratch_limbs;

        Ok(Self {
            result_limbs,
            working_limbs,
            buffers,
            scratch_limbs,
            total_bytes: total_limbs.saturating_mul(std::mem::size_of::<Limb>()),
        })
    }

    /// Check if the computation fits within the given memory limit.
    ///
    /// `None` means unlimited (always fits).
    #[must_use]
    pub fn fits_in(&self, limit: Option<usize>) -> bool {
        match limit {
            None => true,
            Some(l) => self.total_bytes <= l,
        }
    }
}

/// Parse a memory limit string (e.g., "8G", "512M", "1024K").
///
/// An empty string means no limit and parses to 0.
///
/// # Errors
///
/// Returns an error string if the format is invalid or the number cannot be parsed.
pub fn parse_memory_limit(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('K') {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('B') {
        (n, 1)
    } else {
        (s, 1)
    };

    let value: usize = num_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid memory limit: {e}"))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("memory limit too large: {s}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_capacity_formula() {
        assert_eq!(result_capacity(0).unwrap(), 2);
        assert_eq!(result_capacity(93).unwrap(), 3);
        assert_eq!(result_capacity(500_000).unwrap(), 5470);
    }

    #[test]
    fn result_capacity_covers_actual_size() {
        // F(k) < phi^k, so ceil(k * log2(phi) / 64) limbs always suffice.
        for k in [1u64, 10, 93, 94, 1000, 12_345, 500_000, 10_000_000] {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let needed = ((k as f64 * 0.694_242) / 64.0).ceil() as usize;
            assert!(result_capacity(k).unwrap() >= needed.max(1), "k={k}");
        }
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn result_capacity_extreme_index() {
        // 7 * u64::MAX / 640 fits usize on 64-bit targets.
        assert!(result_capacity(u64::MAX).is_ok());
    }

    #[test]
    fn estimate_per_strategy() {
        let it = CapacityEstimate::estimate(1000, Strategy::Iterative).unwrap();
        let fd = CapacityEstimate::estimate(1000, Strategy::FastDoubling).unwrap();
        let ka = CapacityEstimate::estimate(1000, Strategy::Karatsuba).unwrap();
        assert_eq!(it.working_limbs, it.result_limbs + WORKING_HEADROOM);
        assert_eq!(it.scratch_limbs, 0);
        assert_eq!(fd.scratch_limbs, fd.working_limbs);
        assert_eq!(ka.scratch_limbs, karatsuba_scratch_len(ka.working_limbs));
        assert!(it.total_bytes < fd.total_bytes);
        assert!(fd.total_bytes < ka.total_bytes);
    }

    #[test]
    fn fits_in_limits() {
        let est = CapacityEstimate::estimate(500_000, Strategy::Karatsuba).unwrap();
        assert!(est.fits_in(None));
        assert!(est.fits_in(Some(est.total_bytes)));
        assert!(!est.fits_in(Some(est.total_bytes - 1)));
    }

    #[test]
    fn parse_memory_limit_values() {
        assert_eq!(parse_memory_limit("8G").unwrap(), 8 * 1024 * 1024 * 1024);
        assert_eq!(parse_memory_limit("512M").unwrap(), 512 * 1024 * 1024);
        assert_eq!(parse_memory_limit("1024K").unwrap(), 1024 * 1024);
        assert_eq!(parse_memory_limit("64B").unwrap(), 64);
        assert_eq!(parse_memory_limit("").unwrap(), 0);
    }

    #[test]
    fn parse_memory_limit_invalid() {
        assert!(parse_memory_limit("abc").is_err());
        assert!(parse_memory_limit("99999999999999999999G").is_err());
    }
}
