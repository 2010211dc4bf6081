//! Decimal rendering of limb sequences.
//!
//! Only division by the fixed base 10^19 is supported: each pass divides the
//! whole number by 10^19 from the top limb down with a 128-bit remainder and
//! yields one 19-digit group.

use std::fmt::Write as _;

use crate::constants::{DECIMAL_GROUP_BASE, DECIMAL_GROUP_DIGITS};
use crate::limbs::{significant_len, Limb};

/// Divide `limbs` by 10^19 in place and return the remainder.
#[allow(clippy::cast_possible_truncation)]
fn div_rem_group(limbs: &mut [Limb]) -> Limb {
    let base = u128::from(DECIMAL_GROUP_BASE);
    let mut rem: u128 = 0;
    for limb in limbs.iter_mut().rev() {
        let cur = (rem << 64) | u128::from(*limb);
        *limb = (cur / base) as Limb;
        rem = cur % base;
    }
    rem as Limb
}

/// Render a little-endian limb sequence as decimal text.
///
/// Leading zero limbs are ignored; an empty or all-zero sequence renders as `"0"`.
///
/// # Example
/// ```
/// use fibengine_core::render_decimal;
///
/// assert_eq!(render_decimal(&[55]), "55");
/// assert_eq!(render_decimal(&[0, 1]), "18446744073709551616");
/// assert_eq!(render_decimal(&[]), "0");
/// ```
#[must_use]
pub fn render_decimal(limbs: &[Limb]) -> String {
    let mut work = limbs[..significant_len(limbs)].to_vec();
    if work.is_empty() {
        return "0".to_string();
    }

    let mut groups = Vec::with_capacity(work.len() * 2);
    while !work.is_empty() {
        groups.push(div_rem_group(&mut work));
        while work.last() == Some(&0) {
            work.pop();
        }
    }

    let mut out = String::with_capacity(groups.len() * DECIMAL_GROUP_DIGITS);
    let mut iter = groups.iter().rev();
    if let Some(first) = iter.next() {
        let _ = write!(out, "{first}");
    }
    for group in iter {
        let _ = write!(out, "{group:0width$}", width = DECIMAL_GROUP_DIGITS);
    }
    out
}
