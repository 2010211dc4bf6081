//! The Fibonacci device and its sessions.
//!
//! A `FibDevice` admits one `Session` at a time. The session's position is
//! the Fibonacci index the next read computes; reads never move it.

use std::time::{Duration, Instant};

use parking_lot::{Mutex, MutexGuard};

use fibengine_core::limbs::zeroed_limbs;
use fibengine_core::{CalculatorFactory, DefaultFactory, Limb, Strategy};

use crate::error::DeviceError;
use crate::interfaces::{ReadRequest, ReadResponse};
use crate::transfer::{encode_limbs, limb_capacity};

/// Cursor origin for [`Session::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekFrom {
    /// Absolute position.
    Start(u64),
    /// Relative to the current position.
    Current(i64),
    /// Counted back from the largest index: `End(n)` is `max - n`.
    End(i64),
}

/// Serve one read: compute F(index) with the requested strategy into `out`.
///
/// Fails with `BufferTooSmall` when the result has more limbs than `out`;
/// `out` is left untouched in that case.
pub fn serve(
    factory: &dyn CalculatorFactory,
    request: &ReadRequest,
    out: &mut [Limb],
) -> Result<ReadResponse, DeviceError> {
    let calc = factory.get(request.strategy);
    let start = Instant::now();
    let limbs = calc.calculate(request.index)?;
    let elapsed = start.elapsed();

    if limbs.len() > out.len() {
        tracing::warn!(
            index = request.index,
            needed = limbs.len(),
            provided = out.len(),
            "read buffer too small"
        );
        return Err(DeviceError::BufferTooSmall {
            needed: limbs.len(),
            provided: out.len(),
        });
    }
    out[..limbs.len()].copy_from_slice(&limbs);

    Ok(ReadResponse {
        index: request.index,
        strategy: request.strategy,
        limbs: limbs.len(),
        elapsed,
    })
}

/// Single-session Fibonacci device.
pub struct FibDevice {
    max_index: u64,
    factory: DefaultFactory,
    session_lock: Mutex<()>,
}

impl FibDevice {
    /// Create a device serving indices `0..=max_index`.
    #[must_use]
    pub fn new(max_index: u64) -> Self {
        Self {
            max_index,
            factory: DefaultFactory::new(),
            session_lock: Mutex::new(()),
        }
    }

    /// Largest index a session can seek to.
    #[must_use]
    pub fn max_index(&self) -> u64 {
        self.max_index
    }

    /// Open a session, failing with `Busy` if one is already open.
    pub fn open(&self) -> Result<Session<'_>, DeviceError> {
        let Some(guard) = self.session_lock.try_lock() else {
            tracing::warn!("device busy");
            return Err(DeviceError::Busy);
        };
        tracing::info!(max_index = self.max_index, "session opened");
        Ok(Session {
            device: self,
            _guard: guard,
            position: 0,
            strategy: Strategy::default(),
            last_elapsed: Duration::ZERO,
        })
    }
}

impl Default for FibDevice {
    fn default() -> Self {
        Self::new(fibengine_core::MAX_INDEX)
    }
}

/// Exclusive handle on a [`FibDevice`]; the device is released on drop.
pub struct Session<'a> {
    device: &'a FibDevice,
    _guard: MutexGuard<'a, ()>,
    position: u64,
    strategy: Strategy,
    last_elapsed: Duration,
}

impl Session<'_> {
    /// Move the cursor, clamping to `0..=max_index`. Returns the new position.
    pub fn seek(&mut self, pos: SeekFrom) -> u64 {
        let max = i128::from(self.device.max_index);
        let target = match pos {
            SeekFrom::Start(n) => i128::from(n),
            SeekFrom::Current(delta) => i128::from(self.position) + i128::from(delta),
            SeekFrom::End(n) => max - i128::from(n),
        };
        // Clamped into 0..=max, which always fits u64.
        self.position = u64::try_from(target.clamp(0, max)).unwrap_or(self.device.max_index);
        self.position
    }

    /// Current cursor position.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Strategy used by subsequent reads.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Switch the strategy used by subsequent reads.
    pub fn set_strategy(&mut self, strategy: Strategy) {
        tracing::debug!(%strategy, "strategy switched");
        self.strategy = strategy;
    }

    /// Side channel: a non-empty write selects the strategy whose mode number
    /// equals the write length. Returns the previous read's compute time in
    /// nanoseconds.
    pub fn write(&mut self, buf: &[u8]) -> u64 {
        if !buf.is_empty() {
            self.set_strategy(Strategy::from_mode(buf.len()));
        }
        u64::try_from(self.last_elapsed.as_nanos()).unwrap_or(u64::MAX)
    }

    /// Compute time of the last successful read.
    #[must_use]
    pub fn last_elapsed(&self) -> Duration {
        self.last_elapsed
    }

    /// Compute F(position) into `out`.
    pub fn read(&mut self, out: &mut [Limb]) -> Result<ReadResponse, DeviceError> {
        let request = ReadRequest {
            index: self.position,
            strategy: self.strategy,
        };
        let response = serve(&self.device.factory, &request, out)?;
        self.last_elapsed = response.elapsed;
        Ok(response)
    }

    /// Compute F(position) into a byte buffer as little-endian limbs.
    ///
    /// The buffer holds `out.len() / 8` limbs; the response's `limbs` field
    /// times eight is the number of bytes written.
    pub fn read_bytes(&mut self, out: &mut [u8]) -> Result<ReadResponse, DeviceError> {
        let mut limbs = zeroed_limbs(limb_capacity(out.len()))?;
        let response = self.read(&mut limbs)?;
        encode_limbs(&limbs[..response.limbs], out);
        Ok(response)
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        tracing::info!("session closed");
    }
}
