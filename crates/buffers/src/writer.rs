//! Append-only byte writer with geometric growth.

use crate::BufferError;

/// Default capacity of a freshly allocated writer (4KB).
pub const DEFAULT_CAPACITY: usize = 4 * 1024;

/// Longest decimal rendering of a 64-bit integer, sign included.
const MAX_DECIMAL_LEN: usize = 20;

/// An append-only byte buffer that grows automatically as needed.
///
/// Whenever a write does not fit, the buffer grows to twice its current
/// capacity plus the size of the pending write, so appends are amortized
/// O(1). Allocation failures are reported instead of aborting.
///
/// # Example
///
/// ```
/// use bencode_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(b'i').unwrap();
/// writer.i64(-42).unwrap();
/// writer.u8(b'e').unwrap();
/// assert_eq!(writer.flush(), b"i-42e");
/// ```
#[derive(Debug)]
pub struct Writer {
    uint8: Vec<u8>,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a new writer with a custom initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written since the last reset.
    #[inline]
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Currently allocated capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.uint8.capacity()
    }

    /// View of the bytes written so far.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    /// Ensures at least `size` more bytes can be written without growing.
    pub fn ensure_capacity(&mut self, size: usize) -> Result<(), BufferError> {
        let remaining = self.uint8.capacity() - self.uint8.len();
        if remaining >= size {
            return Ok(());
        }
        let target = self
            .uint8
            .capacity()
            .checked_mul(2)
            .and_then(|doubled| doubled.checked_add(size))
            .ok_or(BufferError::CapacityOverflow)?;
        let additional = target - self.uint8.len();
        self.uint8
            .try_reserve_exact(additional)
            .map_err(|_| BufferError::AllocFailed { requested: target })
    }

    /// Drops the written bytes, keeping the allocation.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Shortens the written output to `len` bytes.
    pub fn truncate(&mut self, len: usize) {
        self.uint8.truncate(len);
    }

    /// Returns a copy of the written bytes and resets the writer.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8.clone();
        self.uint8.clear();
        result
    }

    /// Consumes the writer, returning the written bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.uint8
    }

    /// Writes a single byte.
    #[inline]
    pub fn u8(&mut self, val: u8) -> Result<(), BufferError> {
        self.ensure_capacity(1)?;
        self.uint8.push(val);
        Ok(())
    }

    /// Writes a byte slice verbatim.
    pub fn buf(&mut self, buf: &[u8]) -> Result<(), BufferError> {
        self.ensure_capacity(buf.len())?;
        self.uint8.extend_from_slice(buf);
        Ok(())
    }

    /// Writes an ASCII string.
    pub fn ascii(&mut self, s: &str) -> Result<(), BufferError> {
        self.buf(s.as_bytes())
    }

    /// Writes the decimal rendering of an unsigned integer.
    pub fn u64(&mut self, val: u64) -> Result<(), BufferError> {
        let mut digits = [0u8; MAX_DECIMAL_LEN];
        let start = render_decimal(&mut digits, val);
        self.buf(&digits[start..])
    }

    /// Writes the decimal rendering of a signed integer.
    pub fn i64(&mut self, val: i64) -> Result<(), BufferError> {
        let mut digits = [0u8; MAX_DECIMAL_LEN];
        let mut start = render_decimal(&mut digits, val.unsigned_abs());
        if val < 0 {
            start -= 1;
            digits[start] = b'-';
        }
        self.buf(&digits[start..])
    }

    /// Writes the decimal rendering of a length.
    #[inline]
    pub fn usize(&mut self, val: usize) -> Result<(), BufferError> {
        self.u64(val as u64)
    }
}

/// Renders `val` right-aligned into `out`, returning the index of the first digit.
fn render_decimal(out: &mut [u8; MAX_DECIMAL_LEN], mut val: u64) -> usize {
    let mut pos = MAX_DECIMAL_LEN;
    loop {
        pos -= 1;
        out[pos] = b'0' + (val % 10) as u8;
        val /= 10;
        if val == 0 {
            return pos;
        }
    }
}
