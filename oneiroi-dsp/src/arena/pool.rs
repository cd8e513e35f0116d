use core::mem;

/// Bump allocator over one fixed byte region.
///
/// Requests are carved off the front of the remaining region; nothing is
/// ever handed back. `used` counts requested bytes only, `offset` also counts
/// the padding inserted to satisfy alignment.
pub struct Pool<'a> {
    /// Not yet handed out.
    remaining: &'a mut [u8],
    /// Total bytes in the region.
    capacity: usize,
    /// Bytes consumed including alignment padding.
    offset: usize,
    /// Bytes requested by callers.
    used: usize,
}

impl<'a> Pool<'a> {
    /// Wrap a region. Its contents are irrelevant; every allocation is zeroed.
    pub fn new(region: &'a mut [u8]) -> Self {
        let capacity = region.len();
        Pool {
            remaining: region,
            capacity,
            offset: 0,
            used: 0,
        }
    }

    /// Total size of the region in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sum of all requested sizes so far.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Bytes consumed from the region, alignment padding included.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes still available, before any alignment padding.
    pub fn available(&self) -> usize {
        self.remaining.len()
    }

    /// Whether a request of `size` bytes at `align` would fit.
    pub fn fits(&self, size: usize, align: usize) -> bool {
        self.padding(align)
            .checked_add(size)
            .is_some_and(|total| total <= self.remaining.len())
    }

    fn padding(&self, align: usize) -> usize {
        self.remaining.as_ptr().align_offset(align)
    }

    /// Carve `size` zeroed bytes aligned to `align` off the region.
    ///
    /// Returns `None` when the region cannot hold the request.
    pub fn try_alloc(&mut self, size: usize, align: usize) -> Option<&'a mut [u8]> {
        if !self.fits(size, align) {
            return None;
        }
        let pad = self.padding(align);
        let region = mem::take(&mut self.remaining);
        let (head, tail) = region.split_at_mut(pad + size);
        self.remaining = tail;
        self.offset += pad + size;
        self.used += size;

        let block = &mut head[pad..];
        block.fill(0);
        Some(block)
    }

    /// Fraction of the region handed out, in `[0, 1]`.
    pub fn utilization(&self) -> f32 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.used as f32 / self.capacity as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_returns_requested_size() {
        let mut region = [0xAAu8; 64];
        let mut pool = Pool::new(&mut region);
        let block = pool.try_alloc(10, 1).unwrap();
        assert_eq!(block.len(), 10);
        assert_eq!(pool.used(), 10);
        assert_eq!(pool.offset(), 10);
    }

    #[test]
    fn alloc_zeroes_data() {
        let mut region = [0xAAu8; 32];
        let mut pool = Pool::new(&mut region);
        let block = pool.try_alloc(16, 1).unwrap();
        assert!(block.iter().all(|&b| b == 0));
    }

    #[test]
    fn alloc_respects_alignment() {
        let mut region = [0u8; 64];
        let mut pool = Pool::new(&mut region);
        pool.try_alloc(1, 1).unwrap();
        let block = pool.try_alloc(8, 4).unwrap();
        assert_eq!(block.as_ptr() as usize % 4, 0);
        // Padding shows up in the offset but not in the used count.
        assert_eq!(pool.used(), 9);
        assert!(pool.offset() >= pool.used());
    }

    #[test]
    fn alloc_exhaustion() {
        let mut region = [0u8; 16];
        let mut pool = Pool::new(&mut region);
        assert!(pool.try_alloc(12, 1).is_some());
        assert!(pool.try_alloc(8, 1).is_none());
        // A failed request leaves the pool untouched.
        assert_eq!(pool.used(), 12);
        assert!(pool.try_alloc(4, 1).is_some());
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn zero_sized_request() {
        let mut region = [0u8; 4];
        let mut pool = Pool::new(&mut region);
        assert_eq!(pool.try_alloc(0, 1).unwrap().len(), 0);
        assert_eq!(pool.used(), 0);
    }

    #[test]
    fn utilization_ratio() {
        let mut region = [0u8; 100];
        let mut pool = Pool::new(&mut region);
        pool.try_alloc(25, 1).unwrap();
        assert!((pool.utilization() - 0.25).abs() < 1e-6);
    }
}
