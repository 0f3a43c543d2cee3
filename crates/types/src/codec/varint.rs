// Path: crates/types/src/codec/varint.rs
//! Canonical LEB128 varints and their zigzag-encoded signed variants.
//!
//! Every value has exactly one accepted byte sequence: readers reject a trailing
//! zero byte and any final byte whose payload would overflow the target width.

use crate::error::CodecError;

const CONTINUATION: u8 = 0x80;
const PAYLOAD: u8 = 0x7f;

/// Appends the varint encoding of `value` to `out`.
pub fn write_u64(mut value: u64, out: &mut Vec<u8>) {
    while value >= u64::from(CONTINUATION) {
        out.push((value as u8 & PAYLOAD) | CONTINUATION);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Appends the varint encoding of `value` to `out`.
pub fn write_u32(value: u32, out: &mut Vec<u8>) {
    write_u64(u64::from(value), out);
}

/// Appends the zigzag varint encoding of `value` to `out`.
pub fn write_s32(value: i32, out: &mut Vec<u8>) {
    write_u32(((value << 1) ^ (value >> 31)) as u32, out);
}

/// Appends the zigzag varint encoding of `value` to `out`.
pub fn write_s64(value: i64, out: &mut Vec<u8>) {
    write_u64(((value << 1) ^ (value >> 63)) as u64, out);
}

/// Returns the number of bytes `write_u64` emits for `value`.
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

/// Reads a `u32` varint at `offset`, returning the value and the bytes consumed.
pub fn read_u32(buf: &[u8], offset: usize) -> Result<(u32, usize), CodecError> {
    let (value, size) = read_varint(buf, offset, 5, 0x0f, "uint32")?;
    Ok((value as u32, size))
}

/// Reads a `u64` varint at `offset`, returning the value and the bytes consumed.
pub fn read_u64(buf: &[u8], offset: usize) -> Result<(u64, usize), CodecError> {
    read_varint(buf, offset, 10, 0x01, "uint64")
}

/// Reads a zigzag `i32` varint at `offset`.
pub fn read_s32(buf: &[u8], offset: usize) -> Result<(i32, usize), CodecError> {
    let (raw, size) = read_u32(buf, offset)?;
    Ok((((raw >> 1) as i32) ^ -((raw & 1) as i32), size))
}

/// Reads a zigzag `i64` varint at `offset`.
pub fn read_s64(buf: &[u8], offset: usize) -> Result<(i64, usize), CodecError> {
    let (raw, size) = read_u64(buf, offset)?;
    Ok((((raw >> 1) as i64) ^ -((raw & 1) as i64), size))
}

fn read_varint(
    buf: &[u8],
    offset: usize,
    max_bytes: usize,
    last_byte_max: u8,
    width: &'static str,
) -> Result<(u64, usize), CodecError> {
    let mut result = 0u64;
    for i in 0..max_bytes {
        let byte = *buf
            .get(offset + i)
            .ok_or(CodecError::InvalidBufferLength)?;
        if i == max_bytes - 1 && byte > last_byte_max {
            return Err(CodecError::OutOfRange(width));
        }
        result |= u64::from(byte & PAYLOAD) << (7 * i);
        if byte & CONTINUATION == 0 {
            if byte == 0 && i > 0 {
                return Err(CodecError::NonCanonicalVarint);
            }
            return Ok((result, i + 1));
        }
    }
    Err(CodecError::OutOfRange(width))
}
