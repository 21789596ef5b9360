//! Position/limit cursor views over caller-owned byte storage.
//!
//! Every adapter method in this crate consumes only the `[position, limit)`
//! range of a source region, writes only into the `[position, limit)` range of
//! a destination region, and advances each `position` by exactly the number of
//! bytes consumed or produced. The `limit` cursor and bytes outside the window
//! are never modified. The backing storage stays owned by the caller; it can
//! be a heap slice or a memory-mapped view.

/// Read-only view with `position`/`limit` cursors.
///
/// Cloning yields an independently positioned duplicate over the same
/// storage; duplicates never affect each other's cursors.
#[derive(Debug, Clone)]
pub struct ReadRegion<'a> {
    buf: &'a [u8],
    pos: usize,
    limit: usize,
}

impl<'a> ReadRegion<'a> {
    /// Creates a region spanning the whole slice.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            limit: buf.len(),
        }
    }

    /// Creates a region over `[pos, limit)` of the slice.
    ///
    /// Panics when `pos > limit` or `limit > buf.len()`.
    pub fn with_bounds(buf: &'a [u8], pos: usize, limit: usize) -> Self {
        assert!(pos <= limit && limit <= buf.len(), "invalid region bounds");
        Self { buf, pos, limit }
    }

    /// Index of the next byte to consume.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the read cursor. Panics when `pos > limit`.
    pub fn set_position(&mut self, pos: usize) {
        assert!(pos <= self.limit, "position beyond limit");
        self.pos = pos;
    }

    /// One past the last consumable byte.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of unconsumed bytes.
    pub fn remaining(&self) -> usize {
        self.limit - self.pos
    }

    /// True while unconsumed bytes remain.
    pub fn has_remaining(&self) -> bool {
        self.pos < self.limit
    }

    /// The unconsumed `[position, limit)` slice.
    pub fn unread(&self) -> &'a [u8] {
        &self.buf[self.pos..self.limit]
    }

    /// Marks `n` bytes as consumed. Panics when `n > remaining()`.
    pub fn advance(&mut self, n: usize) {
        assert!(n <= self.remaining(), "advance past limit");
        self.pos += n;
    }
}

/// Writable view with `position`/`limit` cursors.
#[derive(Debug)]
pub struct WriteRegion<'a> {
    buf: &'a mut [u8],
    pos: usize,
    limit: usize,
}

impl<'a> WriteRegion<'a> {
    /// Creates a region spanning the whole slice.
    pub fn new(buf: &'a mut [u8]) -> Self {
        let limit = buf.len();
        Self { buf, pos: 0, limit }
    }

    /// Creates a region over `[pos, limit)` of the slice.
    ///
    /// Panics when `pos > limit` or `limit > buf.len()`.
    pub fn with_bounds(buf: &'a mut [u8], pos: usize, limit: usize) -> Self {
        assert!(pos <= limit && limit <= buf.len(), "invalid region bounds");
        Self { buf, pos, limit }
    }

    /// Index of the next byte to fill.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// One past the last writable byte.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Remaining capacity.
    pub fn remaining(&self) -> usize {
        self.limit - self.pos
    }

    /// True while remaining capacity exists.
    pub fn has_remaining(&self) -> bool {
        self.pos < self.limit
    }

    /// The still-writable `[position, limit)` slice.
    pub fn spare(&mut self) -> &mut [u8] {
        &mut self.buf[self.pos..self.limit]
    }

    /// The bytes written behind the cursor, from the start of the storage.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Marks `n` bytes as produced. Panics when `n > remaining()`.
    pub fn advance(&mut self, n: usize) {
        assert!(n <= self.remaining(), "advance past limit");
        self.pos += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_region_tracks_cursors() {
        let data = [1u8, 2, 3, 4, 5];
        let mut r = ReadRegion::with_bounds(&data, 1, 4);
        assert_eq!(r.remaining(), 3);
        assert_eq!(r.unread(), &[2, 3, 4]);
        r.advance(2);
        assert_eq!(r.position(), 3);
        assert_eq!(r.unread(), &[4]);
        r.advance(1);
        assert!(!r.has_remaining());
    }

    #[test]
    fn duplicate_views_are_independent() {
        let data = [9u8; 8];
        let mut a = ReadRegion::new(&data);
        let mut b = a.clone();
        a.advance(5);
        b.advance(2);
        assert_eq!(a.position(), 5);
        assert_eq!(b.position(), 2);
        assert_eq!(b.unread().len(), 6);
    }

    #[test]
    fn write_region_respects_limit() {
        let mut buf = [0u8; 8];
        let mut w = WriteRegion::with_bounds(&mut buf, 2, 6);
        assert_eq!(w.remaining(), 4);
        w.spare()[..3].copy_from_slice(b"abc");
        w.advance(3);
        assert_eq!(w.position(), 5);
        assert_eq!(&w.written()[2..], b"abc");
        assert_eq!(w.remaining(), 1);
    }

    #[test]
    #[should_panic(expected = "advance past limit")]
    fn advance_past_limit_panics() {
        let data = [0u8; 4];
        let mut r = ReadRegion::new(&data);
        r.advance(5);
    }

    #[test]
    #[should_panic(expected = "invalid region bounds")]
    fn crossed_bounds_panic() {
        let data = [0u8; 4];
        let _ = ReadRegion::with_bounds(&data, 3, 2);
    }
}
