//! Append-only byte buffer used to build fingerprints.

use smallvec::SmallVec;

use crate::{TypeofError, TypeofResult};

/// Bytes kept inline before spilling to the heap. Scalars, short tuples and
/// plain arrays fit comfortably.
pub const INLINE_CAPACITY: usize = 40;

/// Growable byte buffer with fallible growth.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buf: SmallVec<[u8; INLINE_CAPACITY]>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn ensure(&mut self, additional: usize) -> TypeofResult<()> {
        self.buf
            .try_reserve(additional)
            .map_err(|_| TypeofError::OutOfMemory {
                context: "growing a fingerprint buffer",
            })
    }

    #[inline]
    pub fn put_u8(&mut self, byte: u8) -> TypeofResult<()> {
        self.ensure(1)?;
        self.buf.push(byte);
        Ok(())
    }

    /// Append a 32-bit value, little endian.
    #[inline]
    pub fn put_u32_le(&mut self, value: u32) -> TypeofResult<()> {
        self.put_slice(&value.to_le_bytes())
    }

    /// Append a machine word, little endian, at pointer width.
    #[inline]
    pub fn put_word(&mut self, value: usize) -> TypeofResult<()> {
        self.put_slice(&value.to_le_bytes())
    }

    /// Append a NUL-terminated string. Bytes after an interior NUL are
    /// dropped; `None` writes the terminator alone.
    pub fn put_cstr(&mut self, s: Option<&str>) -> TypeofResult<()> {
        let bytes = s.map(str::as_bytes).unwrap_or_default();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        self.ensure(end + 1)?;
        self.buf.extend_from_slice(&bytes[..end]);
        self.buf.push(0);
        Ok(())
    }

    #[inline]
    pub fn put_slice(&mut self, bytes: &[u8]) -> TypeofResult<()> {
        self.ensure(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Whether the contents still live in the inline buffer.
    #[inline]
    pub fn is_inline(&self) -> bool {
        !self.buf.spilled()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_integers() {
        let mut w = ByteWriter::new();
        w.put_u32_le(0x0403_0201).unwrap();
        assert_eq!(w.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn word_is_pointer_width() {
        let mut w = ByteWriter::new();
        w.put_word(0x1234).unwrap();
        assert_eq!(w.len(), std::mem::size_of::<usize>());
        assert_eq!(&w.as_bytes()[..2], &[0x34, 0x12]);
    }

    #[test]
    fn cstr_terminates_and_truncates() {
        let mut w = ByteWriter::new();
        w.put_cstr(Some("<i4")).unwrap();
        w.put_cstr(None).unwrap();
        w.put_cstr(Some("d\0junk")).unwrap();
        assert_eq!(w.as_bytes(), b"<i4\0\0d\0");
    }

    #[test]
    fn spills_past_inline_capacity() {
        let mut w = ByteWriter::new();
        for i in 0..INLINE_CAPACITY {
            w.put_u8(i as u8).unwrap();
        }
        assert!(w.is_inline());
        w.put_u8(0xff).unwrap();
        assert!(!w.is_inline());
        assert_eq!(w.len(), INLINE_CAPACITY + 1);
        assert_eq!(w.as_bytes()[INLINE_CAPACITY], 0xff);
    }

    #[test]
    fn clear_resets_length() {
        let mut w = ByteWriter::new();
        w.put_slice(b"abc").unwrap();
        w.clear();
        assert!(w.is_empty());
    }
}
