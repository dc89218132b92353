//! Netlink attribute (NLA) writing and parsing.
//!
//! Netlink uses a TLV (Type-Length-Value) format for attributes:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Length (2 bytes) │  Type (2 bytes)     │  <- NLA header (4 bytes)
//! ├─────────────────────────────────────────┤
//! │  Value (variable length, padded to 4)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The length covers the header and the value, but not the trailing padding. For nested
//! attributes the value is itself a sequence of attributes, so the length of the container is
//! only known once every child has been written.
//!
//! Reference: <linux/netlink.h>

use std::ops::{Deref, DerefMut};

use bytes::{BufMut, Bytes, BytesMut};

use crate::attr::{NLA_F_NESTED, NLA_HEADER_SIZE, NLA_TYPE_MASK, nla_align};
use crate::error::{Error, Result};

/// Append-only writer for a sequence of netlink attributes.
///
/// Nested containers are opened with [`NlaWriter::nest`], which hands out a [`Nest`] guard that
/// mutably borrows the writer. The container length is patched when the guard is dropped, so a
/// buffer can only be [finished](NlaWriter::finish) once every container is closed.
///
/// An attribute longer than the 16-bit length field can express is remembered rather than
/// written with a wrapped length, and makes [`NlaWriter::finish`] fail.
#[derive(Debug, Default)]
pub struct NlaWriter {
    buf: BytesMut,
    oversized: Option<Error>,
}

impl NlaWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far, including padding.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write a complete attribute: header, value and padding.
    pub fn put(&mut self, kind: u16, value: &[u8]) {
        let nla_len = NLA_HEADER_SIZE + value.len();
        let Some(header_len) = self.header_len(kind, nla_len) else {
            return;
        };

        self.buf.reserve(nla_align(nla_len));
        self.buf.put_u16_ne(header_len);
        self.buf.put_u16_ne(kind);
        self.buf.put_slice(value);
        self.pad();
    }

    /// Write a one-byte attribute.
    pub fn put_u8(&mut self, kind: u16, value: u8) {
        self.put(kind, &[value]);
    }

    /// Write a native-endian `u32` attribute.
    pub fn put_u32(&mut self, kind: u16, value: u32) {
        self.put(kind, &value.to_ne_bytes());
    }

    /// Write a native-endian `s32` attribute.
    pub fn put_i32(&mut self, kind: u16, value: i32) {
        self.put(kind, &value.to_ne_bytes());
    }

    /// Write a native-endian `s64` attribute.
    pub fn put_i64(&mut self, kind: u16, value: i64) {
        self.put(kind, &value.to_ne_bytes());
    }

    /// Open a nested container of the given type.
    ///
    /// The header is written with a placeholder length that the returned guard fills in when it
    /// goes out of scope (or when [`Nest::end`] is called).
    pub fn nest(&mut self, kind: u16) -> Nest<'_> {
        let start = self.buf.len();
        self.buf.put_u16_ne(0);
        self.buf.put_u16_ne(kind);
        Nest { writer: self, start, kind }
    }

    /// Consume the writer, returning the encoded attributes.
    ///
    /// Fails with [`Error::AttributeTooLarge`] if any attribute or container outgrew the 16-bit
    /// length field.
    pub fn finish(self) -> Result<Bytes> {
        match self.oversized {
            Some(err) => Err(err),
            None => Ok(self.buf.freeze()),
        }
    }

    /// The header length for an attribute of `len` bytes, or `None` after recording the
    /// overflow.
    fn header_len(&mut self, kind: u16, len: usize) -> Option<u16> {
        let header_len = u16::try_from(len).ok();
        if header_len.is_none() && self.oversized.is_none() {
            self.oversized = Some(Error::AttributeTooLarge { kind, len });
        }
        header_len
    }

    fn pad(&mut self) {
        let padded = nla_align(self.buf.len());
        self.buf.resize(padded, 0);
    }
}

/// An open nested container. Dereferences to the underlying [`NlaWriter`] so children are
/// written through it.
#[derive(Debug)]
pub struct Nest<'a> {
    writer: &'a mut NlaWriter,
    start: usize,
    kind: u16,
}

impl Nest<'_> {
    /// Close the container. Equivalent to dropping the guard.
    pub fn end(self) {}
}

impl Deref for Nest<'_> {
    type Target = NlaWriter;

    fn deref(&self) -> &Self::Target {
        self.writer
    }
}

impl DerefMut for Nest<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.writer
    }
}

impl Drop for Nest<'_> {
    fn drop(&mut self) {
        // Children are already padded, so the length covers the whole nested payload.
        let len = self.writer.buf.len() - self.start;
        if let Some(len) = self.writer.header_len(self.kind, len) {
            self.writer.buf[self.start..self.start + 2].copy_from_slice(&len.to_ne_bytes());
        }
    }
}

/// A borrowed attribute parsed from a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nla<'a> {
    /// Attribute type with the flag bits stripped.
    pub kind: u16,
    /// Whether the sender flagged the payload as nested.
    pub nested: bool,
    /// Attribute value, without header or padding.
    pub payload: &'a [u8],
}

impl<'a> Nla<'a> {
    /// Iterate over the attributes nested in this one.
    pub fn nested(&self) -> NlaIter<'a> {
        NlaIter::new(self.payload)
    }

    /// Check that the payload holds at least `N` bytes and return them.
    pub fn fixed<const N: usize>(&self) -> Result<[u8; N]> {
        self.payload.get(..N).and_then(|b| b.try_into().ok()).ok_or_else(|| {
            Error::TruncatedAttribute { kind: self.kind, expected: N, actual: self.payload.len() }
        })
    }

    /// Read a one-byte payload.
    pub fn get_u8(&self) -> Result<u8> {
        self.fixed::<1>().map(|b| b[0])
    }

    /// Read a native-endian `u32` payload.
    pub fn get_u32(&self) -> Result<u32> {
        self.fixed().map(u32::from_ne_bytes)
    }

    /// Read a native-endian `s32` payload.
    pub fn get_i32(&self) -> Result<i32> {
        self.fixed().map(i32::from_ne_bytes)
    }

    /// Read a native-endian `s64` payload.
    pub fn get_i64(&self) -> Result<i64> {
        self.fixed().map(i64::from_ne_bytes)
    }
}

/// Iterator over a sequence of attributes.
///
/// Yields an error and stops if a header is truncated or claims more bytes than remain.
#[derive(Debug, Clone)]
pub struct NlaIter<'a> {
    buf: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> NlaIter<'a> {
    /// Walk the attributes in `buf`, starting at its first byte.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0, failed: false }
    }
}

impl<'a> Iterator for NlaIter<'a> {
    type Item = Result<Nla<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.buf.len() {
            return None;
        }

        let rest = &self.buf[self.offset..];
        let len = match rest {
            [a, b, _, _, ..] => u16::from_ne_bytes([*a, *b]) as usize,
            _ => 0,
        };
        if len < NLA_HEADER_SIZE || len > rest.len() {
            self.failed = true;
            return Some(Err(Error::MalformedAttribute { offset: self.offset }));
        }
        let raw_kind = u16::from_ne_bytes([rest[2], rest[3]]);

        // The padding after the last attribute may be missing.
        self.offset += nla_align(len).min(rest.len());

        Some(Ok(Nla {
            kind: raw_kind & NLA_TYPE_MASK,
            nested: raw_kind & NLA_F_NESTED != 0,
            payload: &rest[NLA_HEADER_SIZE..len],
        }))
    }
}
