//! A fixed-capacity buffer that yields its overflow.
//!
//! [`OverflowingBuffer`] retains the most recent `capacity` bytes it has
//! ever been fed and returns everything older as "overflow", preserving
//! order. It is the piece that lets the streaming decryptor withhold the
//! trailing MAC candidate from a stream of unknown length: feed every byte
//! through a capacity-32 buffer, decrypt only what overflows, and whatever
//! is still retained when the stream ends is the MAC.

/// A FIFO byte buffer of fixed capacity that returns excess bytes as it is
/// fed.
///
/// Invariant: after updates totaling `T` bytes, the buffer retains exactly
/// `min(T, capacity)` bytes (the newest), and `update` has returned exactly
/// `max(0, T - capacity)` bytes, oldest first.
///
/// # Example
///
/// ```rust
/// use rncrypt::buffer::OverflowingBuffer;
///
/// let mut buf = OverflowingBuffer::new(4);
/// assert!(buf.update(b"ab").is_empty());        // retains "ab"
/// assert_eq!(buf.update(b"cdef"), b"ab");       // retains "cdef"
/// assert_eq!(buf.finish(), b"cdef");
/// ```
#[derive(Debug)]
pub struct OverflowingBuffer {
    capacity: usize,
    retained: Vec<u8>,
}

impl OverflowingBuffer {
    /// Creates a buffer that retains at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            retained: Vec::with_capacity(capacity),
        }
    }

    /// Feeds bytes in and returns whatever no longer fits, oldest first.
    ///
    /// An empty `data` returns an empty vector. If `data` alone exceeds the
    /// capacity, the overflow is the previously retained bytes followed by
    /// the head of `data`, and only the final `capacity` bytes of `data`
    /// are kept.
    pub fn update(&mut self, data: &[u8]) -> Vec<u8> {
        if self.retained.len() + data.len() <= self.capacity {
            self.retained.extend_from_slice(data);
            return Vec::new();
        }

        let excess = self.retained.len() + data.len() - self.capacity;
        let from_retained = excess.min(self.retained.len());
        let from_incoming = excess - from_retained;

        let mut overflow = Vec::with_capacity(excess);
        overflow.extend(self.retained.drain(..from_retained));
        overflow.extend_from_slice(&data[..from_incoming]);

        self.retained.extend_from_slice(&data[from_incoming..]);
        overflow
    }

    /// Consumes the buffer and returns the retained tail.
    pub fn finish(self) -> Vec<u8> {
        self.retained
    }

    /// Returns the number of bytes currently retained.
    pub fn len(&self) -> usize {
        self.retained.len()
    }

    /// Returns `true` if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_returns_empty() {
        let mut buf = OverflowingBuffer::new(8);
        assert!(buf.update(&[]).is_empty());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_retains_up_to_capacity() {
        let mut buf = OverflowingBuffer::new(4);
        assert!(buf.update(b"abc").is_empty());
        assert_eq!(buf.len(), 3);
        assert!(buf.update(b"d").is_empty());
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.finish(), b"abcd");
    }

    #[test]
    fn test_overflow_is_oldest_first() {
        let mut buf = OverflowingBuffer::new(4);
        buf.update(b"abcd");
        assert_eq!(buf.update(b"ef"), b"ab");
        assert_eq!(buf.finish(), b"cdef");
    }

    #[test]
    fn test_update_larger_than_capacity() {
        let mut buf = OverflowingBuffer::new(4);
        buf.update(b"xy");
        // Overflow must be retained bytes, then the head of the new data.
        assert_eq!(buf.update(b"abcdefgh"), b"xyabcd");
        assert_eq!(buf.finish(), b"efgh");
    }

    #[test]
    fn test_single_oversized_update() {
        let mut buf = OverflowingBuffer::new(4);
        assert_eq!(buf.update(b"0123456789"), b"012345");
        assert_eq!(buf.finish(), b"6789");
    }

    #[test]
    fn test_reconstruction_law() {
        // Concatenating overflows with the final tail reproduces the input.
        let input: Vec<u8> = (0u8..=255).collect();
        let mut buf = OverflowingBuffer::new(32);
        let mut out = Vec::new();
        for chunk in input.chunks(7) {
            out.extend(buf.update(chunk));
            assert!(buf.len() <= 32);
        }
        out.extend(buf.finish());
        assert_eq!(out, input);
    }

    #[test]
    fn test_zero_capacity_passes_everything_through() {
        let mut buf = OverflowingBuffer::new(0);
        assert_eq!(buf.update(b"abc"), b"abc");
        assert!(buf.finish().is_empty());
    }
}
