//! Boundary encoding: limbs travel as little-endian bytes, eight per limb.

use fibengine_core::{FibError, Limb};

/// Bytes per limb on the wire.
pub const LIMB_BYTES: usize = std::mem::size_of::<Limb>();

/// Number of whole limbs a byte buffer can carry.
#[must_use]
pub fn limb_capacity(byte_len: usize) -> usize {
    byte_len / LIMB_BYTES
}

/// Zeroed byte buffer large enough for `limbs` limbs.
///
/// Fails with `AllocationFailure` (counted in limbs) rather than aborting.
pub fn byte_buffer(limbs: usize) -> Result<Vec<u8>, FibError> {
    let len = limbs
        .checked_mul(LIMB_BYTES)
        .ok_or(FibError::AllocationFailure(limbs))?;
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|_| FibError::AllocationFailure(limbs))?;
    bytes.resize(len, 0);
    Ok(bytes)
}

/// Encode `limbs` into the front of `out`; returns the bytes written.
///
/// `out` must hold at least `limbs.len() * 8` bytes.
pub fn encode_limbs(limbs: &[Limb], out: &mut [u8]) -> usize {
    debug_assert!(out.len() >= limbs.len() * LIMB_BYTES);
    for (chunk, limb) in out.chunks_exact_mut(LIMB_BYTES).zip(limbs) {
        chunk.copy_from_slice(&limb.to_le_bytes());
    }
    limbs.len() * LIMB_BYTES
}

/// Decode whole little-endian limbs; a trailing partial limb is ignored.
#[must_use]
pub fn decode_limbs(bytes: &[u8]) -> Vec<Limb> {
    bytes
        .chunks_exact(LIMB_BYTES)
        .map(|chunk| {
            let mut raw = [0u8; LIMB_BYTES];
            raw.copy_from_slice(chunk);
            Limb::from_le_bytes(raw)
        })
        .collect()
}
