//! Two-pool arena allocator.
//!
//! All engine memory comes from two regions handed over once by the host: a
//! small fast pool and a large bulk pool. Requests below
//! [`SMALL_OBJECT_THRESHOLD`] go to the fast pool while it still has room,
//! everything else is served from the bulk pool. Memory is never returned;
//! the engine is built once and lives until power-off.

mod pool;

pub use pool::Pool;

use core::mem::{align_of, size_of};

use crate::constants::SMALL_OBJECT_THRESHOLD;
use crate::error::{Error, PoolKind, Result};

/// Element types the arena may hand out.
///
/// # Safety
/// Implementors must be plain data: no drop glue, and the all-zero bit
/// pattern must be a valid value.
pub unsafe trait Plain: Copy + 'static {}

// SAFETY: primitive numbers are valid when zeroed and have no drop glue.
unsafe impl Plain for f32 {}
unsafe impl Plain for f64 {}
unsafe impl Plain for u8 {}
unsafe impl Plain for i16 {}
unsafe impl Plain for u32 {}
unsafe impl Plain for i32 {}

/// Snapshot of pool consumption for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaUsage {
    pub fast_used: usize,
    pub fast_capacity: usize,
    pub bulk_used: usize,
    pub bulk_capacity: usize,
}

impl ArenaUsage {
    /// Fraction of the fast pool handed out.
    pub fn fast_utilization(&self) -> f32 {
        ratio(self.fast_used, self.fast_capacity)
    }

    /// Fraction of the bulk pool handed out.
    pub fn bulk_utilization(&self) -> f32 {
        ratio(self.bulk_used, self.bulk_capacity)
    }
}

fn ratio(used: usize, capacity: usize) -> f32 {
    if capacity == 0 {
        0.0
    } else {
        used as f32 / capacity as f32
    }
}

/// Allocation service injected into every owning component at construction.
pub struct Arena<'a> {
    fast: Pool<'a>,
    bulk: Pool<'a>,
}

impl<'a> Arena<'a> {
    /// Build an arena over the host-supplied fast and bulk regions.
    pub fn new(fast: &'a mut [u8], bulk: &'a mut [u8]) -> Self {
        Arena {
            fast: Pool::new(fast),
            bulk: Pool::new(bulk),
        }
    }

    /// Allocate `len` zeroed elements, routed by size.
    pub fn alloc_slice<T: Plain>(&mut self, len: usize) -> Result<&'a mut [T]> {
        let size = len.checked_mul(size_of::<T>()).ok_or(Error::PoolExhausted {
            pool: PoolKind::Bulk,
            requested: usize::MAX,
            available: self.bulk.available(),
        })?;
        let align = align_of::<T>();
        let bytes = self.alloc_bytes(size, align)?;
        // SAFETY: `bytes` is exclusively ours for 'a, is aligned for `T`, holds
        // exactly `len * size_of::<T>()` zeroed bytes, and `T: Plain` makes the
        // zero pattern a valid `T`.
        Ok(unsafe { core::slice::from_raw_parts_mut(bytes.as_mut_ptr().cast::<T>(), len) })
    }

    /// Allocate `len` zeroed samples.
    pub fn alloc_floats(&mut self, len: usize) -> Result<&'a mut [f32]> {
        self.alloc_slice::<f32>(len)
    }

    fn alloc_bytes(&mut self, size: usize, align: usize) -> Result<&'a mut [u8]> {
        if size < SMALL_OBJECT_THRESHOLD {
            if let Some(block) = self.fast.try_alloc(size, align) {
                return Ok(block);
            }
            log::debug!(
                "fast pool full ({} of {} bytes), serving {} bytes from bulk",
                self.fast.used(),
                self.fast.capacity(),
                size
            );
        }
        let available = self.bulk.available();
        self.bulk.try_alloc(size, align).ok_or(Error::PoolExhausted {
            pool: PoolKind::Bulk,
            requested: size,
            available,
        })
    }

    /// Current consumption of both pools.
    pub fn usage(&self) -> ArenaUsage {
        ArenaUsage {
            fast_used: self.fast.used(),
            fast_capacity: self.fast.capacity(),
            bulk_used: self.bulk.used(),
            bulk_capacity: self.bulk.capacity(),
        }
    }

    /// The fast pool.
    pub fn fast(&self) -> &Pool<'a> {
        &self.fast
    }

    /// The bulk pool.
    pub fn bulk(&self) -> &Pool<'a> {
        &self.bulk
    }
}
