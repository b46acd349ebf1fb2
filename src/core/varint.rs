//! # Variable-Length Integers
//!
//! Little-endian base-128 varints and the zigzag mapping for signed values.
//!
//! ## Wire Format
//! ```text
//! 300 -> [0xAC 0x02]   (1010_1100 0000_0010)
//!         ^ continuation bit set on every group but the last
//! ```
//!
//! Encoding is always minimal length. Decoding rejects more groups than the
//! integer width allows (5 for `u32`, 10 for `u64`).

use crate::error::{ProtocolError, Result};
use bytes::{Buf, BufMut};

/// Maximum encoded size of a `u32` varint
pub const MAX_VARINT_LEN_32: usize = 5;

/// Maximum encoded size of a `u64` varint
pub const MAX_VARINT_LEN_64: usize = 10;

const CONTINUATION: u8 = 0x80;
const PAYLOAD: u8 = 0x7F;

#[inline]
pub fn write_var_u32(dst: &mut impl BufMut, value: u32) {
    write_var_u64(dst, u64::from(value));
}

#[inline]
pub fn write_var_u64(dst: &mut impl BufMut, mut value: u64) {
    while value >= u64::from(CONTINUATION) {
        dst.put_u8((value as u8 & PAYLOAD) | CONTINUATION);
        value >>= 7;
    }
    dst.put_u8(value as u8);
}

#[inline]
pub fn read_var_u32(src: &mut impl Buf) -> Result<u32> {
    let value = read_var(src, MAX_VARINT_LEN_32)?;
    u32::try_from(value).map_err(|_| ProtocolError::VarIntTooLong {
        max_bytes: MAX_VARINT_LEN_32,
    })
}

#[inline]
pub fn read_var_u64(src: &mut impl Buf) -> Result<u64> {
    read_var(src, MAX_VARINT_LEN_64)
}

fn read_var(src: &mut impl Buf, max_bytes: usize) -> Result<u64> {
    let mut value: u64 = 0;
    for i in 0..max_bytes {
        if !src.has_remaining() {
            return Err(ProtocolError::BufferUnderflow {
                needed: 1,
                remaining: 0,
            });
        }
        let byte = src.get_u8();
        let shift = 7 * i as u32;
        let group = u64::from(byte & PAYLOAD);
        // The 10th group of a u64 only has room for one bit.
        if shift == 63 && group > 1 {
            return Err(ProtocolError::VarIntTooLong { max_bytes });
        }
        value |= group << shift;
        if byte & CONTINUATION == 0 {
            return Ok(value);
        }
    }
    Err(ProtocolError::VarIntTooLong { max_bytes })
}

/// Encoded size of `value` as a varint.
pub fn var_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

#[inline]
pub fn zigzag_encode_32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

#[inline]
pub fn zigzag_decode_32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

#[inline]
pub fn zigzag_encode_64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

#[inline]
pub fn zigzag_decode_64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}
