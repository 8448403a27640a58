//! Blocking byte pipe between a cpal stream callback and the pump thread.
//!
//! cpal delivers and requests audio from its own callback thread. The pump
//! wants blocking `read`/`write` calls instead. A `BytePipe` sits between
//! the two: the callback side never blocks, the pump side waits on a
//! condvar for data (capture) or space (playback), bounded by `timeout` so
//! the pump can keep polling its cancel flag.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use passthrough_core::PlatformStatus;

use crate::ring_buffer::RingBuffer;

#[derive(Debug)]
struct PipeState {
    ring: RingBuffer,
    closed: bool,
    dead: bool,
    overrun: u64,
}

#[derive(Debug)]
pub struct BytePipe {
    state: Mutex<PipeState>,
    ready: Condvar,
    /// Bytes per interleaved sample frame. Drops and callback pops happen
    /// in whole frames so channels never shift.
    align: usize,
    timeout: Duration,
}

impl BytePipe {
    pub fn new(capacity: usize, align: usize, timeout: Duration) -> Self {
        let align = align.max(1);
        // Round up so a full pipe still holds whole frames.
        let capacity = capacity.max(align).div_ceil(align) * align;
        Self {
            state: Mutex::new(PipeState {
                ring: RingBuffer::new(capacity),
                closed: false,
                dead: false,
                overrun: 0,
            }),
            ready: Condvar::new(),
            align,
            timeout,
        }
    }

    /// Producer side of a capture pipe (callback thread). Never blocks: when
    /// the pump falls behind, the oldest whole frames are dropped.
    pub fn push_overwrite(&self, bytes: &[u8]) {
        let mut state = self.state.lock();
        if state.closed || state.dead {
            return;
        }

        let capacity = state.ring.capacity();
        let bytes = if bytes.len() > capacity {
            &bytes[bytes.len() - capacity..]
        } else {
            bytes
        };
        let overflow = bytes.len().saturating_sub(state.ring.free());
        if overflow > 0 {
            let dropped = state.ring.discard(overflow.div_ceil(self.align) * self.align);
            state.overrun += dropped as u64;
        }
        state.ring.write(bytes);
        drop(state);
        self.ready.notify_all();
    }

    /// Consumer side of a playback pipe (callback thread). Never blocks.
    /// Returns the number of bytes copied, always a multiple of the frame
    /// size.
    pub fn pop_available(&self, out: &mut [u8]) -> usize {
        let mut state = self.state.lock();
        let whole = state.ring.count().min(out.len()) / self.align * self.align;
        let n = state.ring.read_into(&mut out[..whole]);
        drop(state);
        if n > 0 {
            self.ready.notify_all();
        }
        n
    }

    /// Blocking read for the pump. Returns what is buffered (possibly a
    /// short read) or `Ok(0)` once `timeout` passes with nothing arriving.
    pub fn read(&self, out: &mut [u8]) -> Result<usize, PlatformStatus> {
        if out.is_empty() {
            return Ok(0);
        }

        let mut state = self.state.lock();
        if state.ring.is_empty() && !state.closed && !state.dead {
            self.ready.wait_for(&mut state, self.timeout);
        }
        if state.dead {
            return Err(PlatformStatus::DeadObject);
        }
        if state.closed && state.ring.is_empty() {
            return Err(PlatformStatus::InvalidOperation);
        }

        let n = state.ring.read_into(out);
        drop(state);
        if n > 0 {
            self.ready.notify_all();
        }
        Ok(n)
    }

    /// Blocking write for the pump. Accepts as much as fits (possibly a
    /// short write) or `Ok(0)` once `timeout` passes without free space.
    pub fn write(&self, bytes: &[u8]) -> Result<usize, PlatformStatus> {
        if bytes.is_empty() {
            return Ok(0);
        }

        let mut state = self.state.lock();
        if state.ring.free() == 0 && !state.closed && !state.dead {
            self.ready.wait_for(&mut state, self.timeout);
        }
        if state.dead {
            return Err(PlatformStatus::DeadObject);
        }
        if state.closed {
            return Err(PlatformStatus::InvalidOperation);
        }

        let n = state.ring.write(bytes);
        drop(state);
        if n > 0 {
            self.ready.notify_all();
        }
        Ok(n)
    }

    /// The stream behind this pipe reported an error. Every later pump call
    /// fails with `DeadObject`.
    pub fn mark_dead(&self) {
        self.state.lock().dead = true;
        self.ready.notify_all();
    }

    /// The device was stopped. Buffered capture data can still be drained.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.ready.notify_all();
    }

    /// Bytes dropped so far because the pump fell behind the capture
    /// callback.
    pub fn overrun_bytes(&self) -> u64 {
        self.state.lock().overrun
    }

    pub fn buffered(&self) -> usize {
        self.state.lock().ring.count()
    }
}
