//! Little-endian primitives at explicit offsets
//!
//! Every read is bounds-checked and fails with [`Error::OutOfBounds`] instead of
//! returning partial data. Writes patch an existing buffer in place.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::error::{Error, Result};

/// Borrow `len` bytes at `offset`.
pub fn bytes_at(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(Error::OutOfBounds {
            offset,
            len,
            size: data.len(),
        })
}

fn bytes_at_mut(data: &mut [u8], offset: usize, len: usize) -> Result<&mut [u8]> {
    let size = data.len();
    offset
        .checked_add(len)
        .and_then(|end| data.get_mut(offset..end))
        .ok_or(Error::OutOfBounds { offset, len, size })
}

pub fn read_u8(data: &[u8], offset: usize) -> Result<u8> {
    Ok(bytes_at(data, offset, 1)?[0])
}

pub fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    Ok(LittleEndian::read_u16(bytes_at(data, offset, 2)?))
}

pub fn read_i32(data: &[u8], offset: usize) -> Result<i32> {
    Ok(LittleEndian::read_i32(bytes_at(data, offset, 4)?))
}

pub fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    Ok(LittleEndian::read_u32(bytes_at(data, offset, 4)?))
}

pub fn read_i64(data: &[u8], offset: usize) -> Result<i64> {
    Ok(LittleEndian::read_i64(bytes_at(data, offset, 8)?))
}

pub fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    Ok(LittleEndian::read_u64(bytes_at(data, offset, 8)?))
}

pub fn write_i32(data: &mut [u8], offset: usize, value: i32) -> Result<()> {
    LittleEndian::write_i32(bytes_at_mut(data, offset, 4)?, value);
    Ok(())
}

pub fn write_i64(data: &mut [u8], offset: usize, value: i64) -> Result<()> {
    LittleEndian::write_i64(bytes_at_mut(data, offset, 8)?, value);
    Ok(())
}

/// A decoded length-prefixed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FString {
    /// Text with one trailing NUL removed.
    pub value: String,
    /// True when stored as UTF-16 (negative length prefix).
    pub wide: bool,
    /// Total encoded size including the 4-byte length prefix.
    pub size: usize,
}

/// Read a length-prefixed string at `offset`.
///
/// A positive length is a count of 8-bit bytes, a negative one a count of
/// UTF-16 code units. Zero is the empty string with no body.
pub fn read_fstring(data: &[u8], offset: usize) -> Result<FString> {
    let stored = read_i32(data, offset)?;
    let units = stored.unsigned_abs() as usize;
    let body_offset = offset + 4;

    if stored < 0 {
        let byte_len = units.checked_mul(2).ok_or(Error::OutOfBounds {
            offset: body_offset,
            len: usize::MAX,
            size: data.len(),
        })?;
        let body = bytes_at(data, body_offset, byte_len)?;
        let mut code_units = vec![0u16; units];
        LittleEndian::read_u16_into(body, &mut code_units);
        if code_units.last() == Some(&0) {
            code_units.pop();
        }
        Ok(FString {
            value: String::from_utf16_lossy(&code_units),
            wide: true,
            size: 4 + byte_len,
        })
    } else {
        let mut body = bytes_at(data, body_offset, units)?;
        if let Some((&0, rest)) = body.split_last() {
            body = rest;
        }
        Ok(FString {
            value: String::from_utf8_lossy(body).into_owned(),
            wide: false,
            size: 4 + units,
        })
    }
}

/// Append `value` as a NUL-terminated length-prefixed string.
///
/// ASCII text uses the 8-bit form. Anything else is written as UTF-16 with a
/// negative length, since the engine reads 8-bit strings as ANSI.
pub fn write_fstring<W: WriteBytesExt>(writer: &mut W, value: &str) -> Result<()> {
    if value.is_ascii() {
        let bytes = value.as_bytes();
        writer.write_i32::<LittleEndian>((bytes.len() + 1) as i32)?;
        writer.write_all(bytes)?;
        writer.write_u8(0)?;
    } else {
        let units: Vec<u16> = value.encode_utf16().chain(std::iter::once(0)).collect();
        writer.write_i32::<LittleEndian>(-(units.len() as i32))?;
        for unit in units {
            writer.write_u16::<LittleEndian>(unit)?;
        }
    }
    Ok(())
}

/// Sequential reader over a borrowed buffer for the fixed-layout summary.
///
/// Each call delegates to the random-access readers above and advances.
#[derive(Debug)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn skip(&mut self, len: usize) -> Result<()> {
        bytes_at(self.data, self.pos, len)?;
        self.pos += len;
        Ok(())
    }

    pub(crate) fn u16(&mut self) -> Result<u16> {
        let v = read_u16(self.data, self.pos)?;
        self.pos += 2;
        Ok(v)
    }

    pub(crate) fn i32(&mut self) -> Result<i32> {
        let v = read_i32(self.data, self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        let v = read_u32(self.data, self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    pub(crate) fn i64(&mut self) -> Result<i64> {
        let v = read_i64(self.data, self.pos)?;
        self.pos += 8;
        Ok(v)
    }

    pub(crate) fn fstring(&mut self) -> Result<FString> {
        let s = read_fstring(self.data, self.pos)?;
        self.pos += s.size;
        Ok(s)
    }

    /// Read a non-negative count.
    pub(crate) fn count(&mut self, field: &'static str) -> Result<usize> {
        let value = self.i32()?;
        usize::try_from(value).map_err(|_| Error::InvalidCount {
            field,
            value: i64::from(value),
        })
    }
}
