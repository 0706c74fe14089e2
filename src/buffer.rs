use core::fmt;
use core::num::IntErrorKind;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use tracing::trace;

use crate::{Error, Result, TextEncoding, int24, text};

/// A fixed-capacity byte region with two independent cursors, one advanced
/// by reads and one by writes.
///
/// Codec methods check bounds (and value range, where one applies) before
/// touching anything, so a failing call leaves both the storage and the
/// cursors exactly as they were. On success the relevant cursor advances by
/// the operand width. The cursors never constrain each other: they may
/// cross, overlap, or coincide.
///
/// The storage parameter `B` makes the ownership mode explicit:
/// [`zeroed`](OffsetBuffer::zeroed) and [`from_bytes`](OffsetBuffer::from_bytes)
/// own a `Vec<u8>`, while [`wrap`](OffsetBuffer::wrap) over a `&mut [u8]`
/// aliases caller storage, whose mutations stay visible to the caller.
pub struct OffsetBuffer<B = Vec<u8>> {
    storage: B,
    read_offset: usize,
    write_offset: usize,
}

impl OffsetBuffer<Vec<u8>> {
    /// Creates an owned, zero-filled buffer of `len` bytes.
    pub fn zeroed(len: usize) -> Self {
        Self::wrap(vec![0; len])
    }

    /// Creates an owned buffer by copying the given byte values.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::wrap(bytes.into())
    }
}

impl<B: AsRef<[u8]>> OffsetBuffer<B> {
    /// Wraps existing storage, with both cursors at 0.
    ///
    /// Wrapping a `&mut [u8]` aliases the caller's region instead of
    /// copying it.
    pub fn wrap(storage: B) -> Self {
        Self {
            storage,
            read_offset: 0,
            write_offset: 0,
        }
    }

    /// Wraps existing storage with explicit initial cursors.
    ///
    /// A cursor beyond the storage length fails with
    /// [`Error::InvalidArgument`] right away rather than at first use.
    pub fn with_offsets(storage: B, read_offset: usize, write_offset: usize) -> Result<Self> {
        let len = storage.as_ref().len();

        for (name, offset) in [("read", read_offset), ("write", write_offset)] {
            if offset > len {
                return Err(Error::InvalidArgument {
                    op: "with_offsets",
                    reason: format!("initial {name} offset {offset} exceeds storage length {len}"),
                });
            }
        }

        Ok(Self {
            storage,
            read_offset,
            write_offset,
        })
    }

    /// Length of the underlying storage. Fixed for the buffer's lifetime.
    pub fn len(&self) -> usize {
        self.storage.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current read cursor.
    pub fn read_offset(&self) -> usize {
        self.read_offset
    }

    /// Current write cursor.
    pub fn write_offset(&self) -> usize {
        self.write_offset
    }

    /// Bytes left between the read cursor and the end of storage.
    pub fn remaining_read(&self) -> usize {
        self.len() - self.read_offset
    }

    /// Bytes left between the write cursor and the end of storage.
    pub fn remaining_write(&self) -> usize {
        self.len() - self.write_offset
    }

    /// The whole underlying storage, cursors notwithstanding.
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_ref()
    }

    /// Consumes the buffer and returns the storage.
    pub fn into_inner(self) -> B {
        self.storage
    }

    /// Decodes the whole storage as text under the given scheme.
    pub fn decode_text(&self, encoding: TextEncoding) -> Result<String> {
        text::decode(self.storage.as_ref(), encoding)
    }

    /// Reads 8-bit unsigned integer at the read cursor.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_exact("read_u8", 1)?[0])
    }

    /// Reads 8-bit signed integer at the read cursor.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_exact("read_i8", 1)?[0] as i8)
    }

    /// Reads 24-bit BE-encoded unsigned integer at the read cursor.
    pub fn read_u24_be(&mut self) -> Result<u32> {
        Ok(int24::decode_u24_be(self.read_array("read_u24_be")?))
    }

    /// Reads 24-bit LE-encoded unsigned integer at the read cursor.
    pub fn read_u24_le(&mut self) -> Result<u32> {
        Ok(int24::decode_u24_le(self.read_array("read_u24_le")?))
    }

    /// Reads 24-bit BE-encoded signed integer at the read cursor.
    pub fn read_i24_be(&mut self) -> Result<i32> {
        Ok(int24::decode_i24_be(self.read_array("read_i24_be")?))
    }

    /// Reads 24-bit LE-encoded signed integer at the read cursor.
    pub fn read_i24_le(&mut self) -> Result<i32> {
        Ok(int24::decode_i24_le(self.read_array("read_i24_le")?))
    }

    /// Reads 64-bit BE-encoded unsigned integer at the read cursor,
    /// rendered as its exact decimal representation.
    pub fn read_u64_be(&mut self) -> Result<String> {
        let bytes = self.read_exact("read_u64_be", 8)?;
        Ok(BigEndian::read_u64(bytes).to_string())
    }

    /// Reads 64-bit LE-encoded unsigned integer at the read cursor,
    /// rendered as its exact decimal representation.
    pub fn read_u64_le(&mut self) -> Result<String> {
        let bytes = self.read_exact("read_u64_le", 8)?;
        Ok(LittleEndian::read_u64(bytes).to_string())
    }

    /// Reads 64-bit BE-encoded signed integer at the read cursor,
    /// rendered as its exact decimal representation.
    pub fn read_i64_be(&mut self) -> Result<String> {
        let bytes = self.read_exact("read_i64_be", 8)?;
        Ok(BigEndian::read_i64(bytes).to_string())
    }

    /// Reads 64-bit LE-encoded signed integer at the read cursor,
    /// rendered as its exact decimal representation.
    pub fn read_i64_le(&mut self) -> Result<String> {
        let bytes = self.read_exact("read_i64_le", 8)?;
        Ok(LittleEndian::read_i64(bytes).to_string())
    }

    /// Fills `destination` entirely from the bytes at the read cursor and
    /// advances it by `destination.len()`.
    pub fn copy_to(&mut self, destination: &mut [u8]) -> Result<()> {
        let source = self.read_exact("copy_to", destination.len())?;
        destination.copy_from_slice(source);
        trace!(bytes = destination.len(), offset = self.read_offset, "copy_to");
        Ok(())
    }

    /// Checks bounds at the read cursor, then returns the `n` bytes there
    /// and advances the cursor past them.
    fn read_exact(&mut self, op: &'static str, n: usize) -> Result<&[u8]> {
        let storage = self.storage.as_ref();
        let available = storage.len() - self.read_offset;
        if n > available {
            return Err(Error::OutOfRange {
                op,
                offset: self.read_offset,
                needed: n,
                available,
            });
        }

        let bytes = &storage[self.read_offset..self.read_offset + n];
        self.read_offset += n;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self, op: &'static str) -> Result<[u8; N]> {
        Ok(self.read_exact(op, N)?.try_into().expect("N-byte slice"))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> OffsetBuffer<B> {
    /// The whole underlying storage, mutable.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.storage.as_mut()
    }

    /// Writes 8-bit unsigned integer at the write cursor.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_array("write_u8", [value])
    }

    /// Writes 8-bit signed integer at the write cursor.
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_array("write_i8", [value as u8])
    }

    /// Writes 24-bit BE-encoded unsigned integer at the write cursor.
    pub fn write_u24_be(&mut self, value: u32) -> Result<()> {
        check_u24("write_u24_be", value)?;
        self.write_array("write_u24_be", int24::encode_u24_be(value))
    }

    /// Writes 24-bit LE-encoded unsigned integer at the write cursor.
    pub fn write_u24_le(&mut self, value: u32) -> Result<()> {
        check_u24("write_u24_le", value)?;
        self.write_array("write_u24_le", int24::encode_u24_le(value))
    }

    /// Writes 24-bit BE-encoded signed integer at the write cursor.
    pub fn write_i24_be(&mut self, value: i32) -> Result<()> {
        check_i24("write_i24_be", value)?;
        self.write_array("write_i24_be", int24::encode_i24_be(value))
    }

    /// Writes 24-bit LE-encoded signed integer at the write cursor.
    pub fn write_i24_le(&mut self, value: i32) -> Result<()> {
        check_i24("write_i24_le", value)?;
        self.write_array("write_i24_le", int24::encode_i24_le(value))
    }

    /// Writes 64-bit BE-encoded unsigned integer at the write cursor.
    ///
    /// `value` is the exact decimal representation of the integer; the full
    /// `u64` range is accepted.
    pub fn write_u64_be(&mut self, value: &str) -> Result<()> {
        let value = parse_u64("write_u64_be", value)?;
        let dst = self.writable("write_u64_be", 8)?;
        BigEndian::write_u64(dst, value);
        self.write_offset += 8;
        Ok(())
    }

    /// Writes 64-bit LE-encoded unsigned integer at the write cursor.
    ///
    /// `value` is the exact decimal representation of the integer; the full
    /// `u64` range is accepted.
    pub fn write_u64_le(&mut self, value: &str) -> Result<()> {
        let value = parse_u64("write_u64_le", value)?;
        let dst = self.writable("write_u64_le", 8)?;
        LittleEndian::write_u64(dst, value);
        self.write_offset += 8;
        Ok(())
    }

    /// Writes 64-bit BE-encoded signed integer at the write cursor.
    ///
    /// `value` is the exact decimal representation of the integer; the full
    /// `i64` range is accepted.
    pub fn write_i64_be(&mut self, value: &str) -> Result<()> {
        let value = parse_i64("write_i64_be", value)?;
        let dst = self.writable("write_i64_be", 8)?;
        BigEndian::write_i64(dst, value);
        self.write_offset += 8;
        Ok(())
    }

    /// Writes 64-bit LE-encoded signed integer at the write cursor.
    ///
    /// `value` is the exact decimal representation of the integer; the full
    /// `i64` range is accepted.
    pub fn write_i64_le(&mut self, value: &str) -> Result<()> {
        let value = parse_i64("write_i64_le", value)?;
        let dst = self.writable("write_i64_le", 8)?;
        LittleEndian::write_i64(dst, value);
        self.write_offset += 8;
        Ok(())
    }

    /// Fills everything from the write cursor to the end of storage with
    /// `value` and moves the cursor to the end.
    pub fn fill(&mut self, value: u8) -> Result<()> {
        let end = self.len();
        self.fill_to(value, end)
    }

    /// Fills `storage[write_offset..end)` with `value` and moves the write
    /// cursor to `end`.
    pub fn fill_to(&mut self, value: u8, end: usize) -> Result<()> {
        let len = self.len();
        if end > len {
            return Err(Error::InvalidArgument {
                op: "fill_to",
                reason: format!("end {end} exceeds storage length {len}"),
            });
        }
        if end < self.write_offset {
            return Err(Error::InvalidArgument {
                op: "fill_to",
                reason: format!("end {end} is before the write cursor {}", self.write_offset),
            });
        }

        trace!(start = self.write_offset, end, value, "fill");
        self.storage.as_mut()[self.write_offset..end].fill(value);
        self.write_offset = end;
        Ok(())
    }

    /// Copies all of `source` to the write cursor and advances it by
    /// `source.len()`.
    pub fn copy_from(&mut self, source: &[u8]) -> Result<()> {
        self.copy_from_range(source, 0, source.len())
    }

    /// Copies `source[start..end)` to the write cursor and advances it by
    /// the copied length.
    pub fn copy_from_range(&mut self, source: &[u8], start: usize, end: usize) -> Result<()> {
        if start > end || end > source.len() {
            return Err(Error::InvalidArgument {
                op: "copy_from_range",
                reason: format!(
                    "range {start}..{end} is invalid for a source of {} bytes",
                    source.len()
                ),
            });
        }

        let n = end - start;
        let dst = self.writable("copy_from_range", n)?;
        dst.copy_from_slice(&source[start..end]);
        trace!(bytes = n, offset = self.write_offset, "copy_from");
        self.write_offset += n;
        Ok(())
    }

    /// Converts `s` to bytes under the given scheme and copies them to the
    /// write cursor, advancing it by the converted length.
    pub fn write_str(&mut self, s: &str, encoding: TextEncoding) -> Result<()> {
        let bytes = text::encode(s, encoding)?;
        let dst = self.writable("write_str", bytes.len())?;
        dst.copy_from_slice(&bytes);
        self.write_offset += bytes.len();
        Ok(())
    }

    /// Checks bounds at the write cursor and returns the `n` bytes there.
    /// The cursor is advanced by the caller once the bytes are in place.
    fn writable(&mut self, op: &'static str, n: usize) -> Result<&mut [u8]> {
        let write_offset = self.write_offset;
        let storage = self.storage.as_mut();
        let available = storage.len() - write_offset;
        if n > available {
            return Err(Error::OutOfRange {
                op,
                offset: write_offset,
                needed: n,
                available,
            });
        }

        Ok(&mut storage[write_offset..write_offset + n])
    }

    fn write_array<const N: usize>(&mut self, op: &'static str, bytes: [u8; N]) -> Result<()> {
        self.writable(op, N)?.copy_from_slice(&bytes);
        self.write_offset += N;
        Ok(())
    }
}

macro_rules! int_codecs {
    ($($ty:ty { $size:literal, $get:ident, $put:ident,
        $read_be:ident, $read_le:ident, $write_be:ident, $write_le:ident }),* $(,)?) => {
        impl<B: AsRef<[u8]>> OffsetBuffer<B> {
            $(
                #[doc = concat!("Reads ", stringify!($size), "-byte BE-encoded `", stringify!($ty), "` at the read cursor.")]
                pub fn $read_be(&mut self) -> Result<$ty> {
                    let bytes = self.read_exact(stringify!($read_be), $size)?;
                    Ok(BigEndian::$get(bytes))
                }

                #[doc = concat!("Reads ", stringify!($size), "-byte LE-encoded `", stringify!($ty), "` at the read cursor.")]
                pub fn $read_le(&mut self) -> Result<$ty> {
                    let bytes = self.read_exact(stringify!($read_le), $size)?;
                    Ok(LittleEndian::$get(bytes))
                }
            )*
        }

        impl<B: AsRef<[u8]> + AsMut<[u8]>> OffsetBuffer<B> {
            $(
                #[doc = concat!("Writes ", stringify!($size), "-byte BE-encoded `", stringify!($ty), "` at the write cursor.")]
                pub fn $write_be(&mut self, value: $ty) -> Result<()> {
                    let dst = self.writable(stringify!($write_be), $size)?;
                    BigEndian::$put(dst, value);
                    self.write_offset += $size;
                    Ok(())
                }

                #[doc = concat!("Writes ", stringify!($size), "-byte LE-encoded `", stringify!($ty), "` at the write cursor.")]
                pub fn $write_le(&mut self, value: $ty) -> Result<()> {
                    let dst = self.writable(stringify!($write_le), $size)?;
                    LittleEndian::$put(dst, value);
                    self.write_offset += $size;
                    Ok(())
                }
            )*
        }
    };
}

int_codecs! {
    u16 { 2, read_u16, write_u16, read_u16_be, read_u16_le, write_u16_be, write_u16_le },
    i16 { 2, read_i16, write_i16, read_i16_be, read_i16_le, write_i16_be, write_i16_le },
    u32 { 4, read_u32, write_u32, read_u32_be, read_u32_le, write_u32_be, write_u32_le },
    i32 { 4, read_i32, write_i32, read_i32_be, read_i32_le, write_i32_be, write_i32_le },
}

impl<B: AsRef<[u8]>> fmt::Debug for OffsetBuffer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffsetBuffer")
            .field("storage", &text::to_hex(self.storage.as_ref()))
            .field("read_offset", &self.read_offset)
            .field("write_offset", &self.write_offset)
            .finish()
    }
}

fn check_u24(op: &'static str, value: u32) -> Result<()> {
    if value > int24::U24_MAX {
        return Err(Error::ValueOutOfRange {
            op,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn check_i24(op: &'static str, value: i32) -> Result<()> {
    if !(int24::I24_MIN..=int24::I24_MAX).contains(&value) {
        return Err(Error::ValueOutOfRange {
            op,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn parse_u64(op: &'static str, input: &str) -> Result<u64> {
    input.parse::<u64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow => Error::ValueOutOfRange {
            op,
            value: input.to_owned(),
        },
        // A well-formed negative literal is below the unsigned range, not
        // malformed.
        _ if input.parse::<i128>().is_ok() => Error::ValueOutOfRange {
            op,
            value: input.to_owned(),
        },
        _ => Error::ParseError {
            op,
            input: input.to_owned(),
        },
    })
}

fn parse_i64(op: &'static str, input: &str) -> Result<i64> {
    input.parse::<i64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Error::ValueOutOfRange {
            op,
            value: input.to_owned(),
        },
        _ if input.parse::<i128>().is_ok() => Error::ValueOutOfRange {
            op,
            value: input.to_owned(),
        },
        _ => Error::ParseError {
            op,
            input: input.to_owned(),
        },
    })
}
