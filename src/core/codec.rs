//! # Codec Library
//!
//! Primitive and composite field codecs.
//!
//! A codec is a small immutable value implementing [`Codec`]: it writes one
//! value into a [`BytesMut`] and reads one value back from a byte cursor
//! (`&mut &[u8]`, advanced through [`bytes::Buf`]). Composite codecs are built
//! from other codecs ([`Triple`], [`Array`], [`Vector3`], [`BlockPos`]), so
//! nested layouts never need a hand-written serializer.
//!
//! ## Codecs
//! - **Fixed-width integers**: [`Uint8`], [`Int8`], [`Uint16`] .. [`Int64`] with [`Endian`]
//! - **Varints**: [`VarInt`] (u32), [`VarLong`] (u64), [`ZigZag`] (i32), [`ZigZong`] (i64)
//! - **Floats**: [`Float32`], [`Float64`]
//! - **Other**: [`Bool`], [`Utf8String`]
//! - **Composites**: [`Triple`], [`Array`], [`Vector3`], [`BlockPos`]
//!
//! ## Usage
//! ```rust
//! use bytes::BytesMut;
//! use game_protocol::core::codec::{Codec, ZigZag};
//!
//! let mut buf = BytesMut::new();
//! ZigZag.encode(&-3, &mut buf).unwrap();
//! assert_eq!(&buf[..], &[0x05]);
//!
//! let mut cursor = &buf[..];
//! assert_eq!(ZigZag.decode(&mut cursor).unwrap(), -3);
//! ```

use crate::core::types::{BlockPosition, Vec3f};
use crate::core::varint::{
    read_var_u32, read_var_u64, write_var_u32, write_var_u64, zigzag_decode_32, zigzag_decode_64,
    zigzag_encode_32, zigzag_encode_64,
};
use crate::error::{ProtocolError, Result};
use bytes::{Buf, BufMut, BytesMut};
use std::mem::size_of;

/// Default cap on a decoded string's byte length (1 MiB)
pub const DEFAULT_MAX_STRING_LENGTH: usize = 1024 * 1024;

/// Default cap on a decoded array's element count
pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 65_536;

/// Default cap on a whole packet's size (16 MiB)
pub const DEFAULT_MAX_PACKET_SIZE: usize = 16 * 1024 * 1024;

/// Encode/decode capability for one field type.
///
/// Implementations must satisfy `decode(encode(v)) == v` for every value in
/// their domain, and must not write any bytes when `encode` fails.
pub trait Codec: Send + Sync {
    type Value;

    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    fn encode(&self, value: &Self::Value, dst: &mut BytesMut) -> Result<()>;

    fn decode(&self, src: &mut &[u8]) -> Result<Self::Value>;
}

/// Byte order of a fixed-width codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// Size limits applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecLimits {
    pub max_string_length: usize,
    pub max_array_length: usize,
    pub max_packet_size: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
        }
    }
}

/// Fails with `BufferUnderflow` unless `needed` bytes remain.
#[inline]
pub fn ensure_remaining(src: &[u8], needed: usize) -> Result<()> {
    let remaining = src.len();
    if remaining < needed {
        return Err(ProtocolError::BufferUnderflow { needed, remaining });
    }
    Ok(())
}

/// Fails with `LengthLimit` when a string or array length exceeds `max`.
#[inline]
pub fn check_len(len: usize, max: usize) -> Result<()> {
    if len > max {
        return Err(ProtocolError::LengthLimit { len, max });
    }
    Ok(())
}

/// Single unsigned byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Uint8;

impl Codec for Uint8 {
    type Value = u8;

    fn name(&self) -> &'static str {
        "Uint8"
    }

    fn encode(&self, value: &u8, dst: &mut BytesMut) -> Result<()> {
        dst.put_u8(*value);
        Ok(())
    }

    fn decode(&self, src: &mut &[u8]) -> Result<u8> {
        ensure_remaining(src, 1)?;
        Ok(src.get_u8())
    }
}

/// Single signed byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Int8;

impl Codec for Int8 {
    type Value = i8;

    fn name(&self) -> &'static str {
        "Int8"
    }

    fn encode(&self, value: &i8, dst: &mut BytesMut) -> Result<()> {
        dst.put_i8(*value);
        Ok(())
    }

    fn decode(&self, src: &mut &[u8]) -> Result<i8> {
        ensure_remaining(src, 1)?;
        Ok(src.get_i8())
    }
}

macro_rules! fixed_width_codec {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $put_le:ident, $put_be:ident, $get_le:ident, $get_be:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name(pub Endian);

        impl Codec for $name {
            type Value = $ty;

            fn name(&self) -> &'static str {
                stringify!($name)
            }

            fn encode(&self, value: &$ty, dst: &mut BytesMut) -> Result<()> {
                match self.0 {
                    Endian::Little => dst.$put_le(*value),
                    Endian::Big => dst.$put_be(*value),
                }
                Ok(())
            }

            fn decode(&self, src: &mut &[u8]) -> Result<$ty> {
                ensure_remaining(src, size_of::<$ty>())?;
                Ok(match self.0 {
                    Endian::Little => src.$get_le(),
                    Endian::Big => src.$get_be(),
                })
            }
        }
    };
}

fixed_width_codec!(
    /// 2-byte unsigned integer.
    Uint16, u16, put_u16_le, put_u16, get_u16_le, get_u16
);
fixed_width_codec!(
    /// 2-byte signed integer.
    Int16, i16, put_i16_le, put_i16, get_i16_le, get_i16
);
fixed_width_codec!(
    /// 4-byte unsigned integer.
    Uint32, u32, put_u32_le, put_u32, get_u32_le, get_u32
);
fixed_width_codec!(
    /// 4-byte signed integer.
    Int32, i32, put_i32_le, put_i32, get_i32_le, get_i32
);
fixed_width_codec!(
    /// 8-byte unsigned integer.
    Uint64, u64, put_u64_le, put_u64, get_u64_le, get_u64
);
fixed_width_codec!(
    /// 8-byte signed integer.
    Int64, i64, put_i64_le, put_i64, get_i64_le, get_i64
);
fixed_width_codec!(
    /// IEEE-754 single precision.
    Float32, f32, put_f32_le, put_f32, get_f32_le, get_f32
);
fixed_width_codec!(
    /// IEEE-754 double precision.
    Float64, f64, put_f64_le, put_f64, get_f64_le, get_f64
);

/// One byte, `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bool;

impl Codec for Bool {
    type Value = bool;

    fn name(&self) -> &'static str {
        "Bool"
    }

    fn encode(&self, value: &bool, dst: &mut BytesMut) -> Result<()> {
        dst.put_u8(u8::from(*value));
        Ok(())
    }

    fn decode(&self, src: &mut &[u8]) -> Result<bool> {
        ensure_remaining(src, 1)?;
        match src.get_u8() {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ProtocolError::value_range("Bool", other)),
        }
    }
}

/// Unsigned 32-bit varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VarInt;

impl Codec for VarInt {
    type Value = u32;

    fn name(&self) -> &'static str {
        "VarInt"
    }

    fn encode(&self, value: &u32, dst: &mut BytesMut) -> Result<()> {
        write_var_u32(dst, *value);
        Ok(())
    }

    fn decode(&self, src: &mut &[u8]) -> Result<u32> {
        read_var_u32(src)
    }
}

/// Unsigned 64-bit varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VarLong;

impl Codec for VarLong {
    type Value = u64;

    fn name(&self) -> &'static str {
        "VarLong"
    }

    fn encode(&self, value: &u64, dst: &mut BytesMut) -> Result<()> {
        write_var_u64(dst, *value);
        Ok(())
    }

    fn decode(&self, src: &mut &[u8]) -> Result<u64> {
        read_var_u64(src)
    }
}

/// Zigzag-mapped signed 32-bit varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZigZag;

impl Codec for ZigZag {
    type Value = i32;

    fn name(&self) -> &'static str {
        "ZigZag"
    }

    fn encode(&self, value: &i32, dst: &mut BytesMut) -> Result<()> {
        write_var_u32(dst, zigzag_encode_32(*value));
        Ok(())
    }

    fn decode(&self, src: &mut &[u8]) -> Result<i32> {
        read_var_u32(src).map(zigzag_decode_32)
    }
}

/// Zigzag-mapped signed 64-bit varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZigZong;

impl Codec for ZigZong {
    type Value = i64;

    fn name(&self) -> &'static str {
        "ZigZong"
    }

    fn encode(&self, value: &i64, dst: &mut BytesMut) -> Result<()> {
        write_var_u64(dst, zigzag_encode_64(*value));
        Ok(())
    }

    fn decode(&self, src: &mut &[u8]) -> Result<i64> {
        read_var_u64(src).map(zigzag_decode_64)
    }
}

/// Varint byte length followed by UTF-8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf8String {
    pub max_len: usize,
}

impl Default for Utf8String {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_STRING_LENGTH,
        }
    }
}

impl Codec for Utf8String {
    type Value = String;

    fn name(&self) -> &'static str {
        "String"
    }

    fn encode(&self, value: &String, dst: &mut BytesMut) -> Result<()> {
        check_len(value.len(), self.max_len)?;
        let len = u32::try_from(value.len())
            .map_err(|_| ProtocolError::value_range("String", value.len()))?;
        write_var_u32(dst, len);
        dst.put_slice(value.as_bytes());
        Ok(())
    }

    fn decode(&self, src: &mut &[u8]) -> Result<String> {
        let len = read_var_u32(src)? as usize;
        check_len(len, self.max_len)?;
        ensure_remaining(src, len)?;
        let data: &[u8] = *src;
        let (head, tail) = data.split_at(len);
        let text = std::str::from_utf8(head).map_err(|_| ProtocolError::InvalidUtf8)?;
        *src = tail;
        Ok(text.to_owned())
    }
}

/// Three consecutive values of the inner codec, in x/y/z order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Triple<C>(pub C);

impl<C: Codec> Codec for Triple<C> {
    type Value = [C::Value; 3];

    fn name(&self) -> &'static str {
        "Triple"
    }

    fn encode(&self, value: &Self::Value, dst: &mut BytesMut) -> Result<()> {
        for component in value {
            self.0.encode(component, dst)?;
        }
        Ok(())
    }

    fn decode(&self, src: &mut &[u8]) -> Result<Self::Value> {
        let x = self.0.decode(src)?;
        let y = self.0.decode(src)?;
        let z = self.0.decode(src)?;
        Ok([x, y, z])
    }
}

/// Varint element count followed by that many values of the inner codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Array<C> {
    pub item: C,
    pub max_len: usize,
}

impl<C> Array<C> {
    pub fn new(item: C) -> Self {
        Self {
            item,
            max_len: DEFAULT_MAX_ARRAY_LENGTH,
        }
    }
}

impl<C: Codec> Codec for Array<C> {
    type Value = Vec<C::Value>;

    fn name(&self) -> &'static str {
        "Array"
    }

    fn encode(&self, value: &Self::Value, dst: &mut BytesMut) -> Result<()> {
        check_len(value.len(), self.max_len)?;
        let len =
            u32::try_from(value.len()).map_err(|_| ProtocolError::value_range("Array", value.len()))?;
        let start = dst.len();
        write_var_u32(dst, len);
        for item in value {
            if let Err(e) = self.item.encode(item, dst) {
                dst.truncate(start);
                return Err(e);
            }
        }
        Ok(())
    }

    fn decode(&self, src: &mut &[u8]) -> Result<Self::Value> {
        let len = read_var_u32(src)? as usize;
        check_len(len, self.max_len)?;
        // Every element takes at least one byte, so cap the preallocation.
        let mut items = Vec::with_capacity(len.min(src.remaining()));
        for _ in 0..len {
            items.push(self.item.decode(src)?);
        }
        Ok(items)
    }
}

/// Little-endian [`Float32`] triple as a [`Vec3f`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vector3;

const VECTOR3_INNER: Triple<Float32> = Triple(Float32(Endian::Little));

impl Codec for Vector3 {
    type Value = Vec3f;

    fn name(&self) -> &'static str {
        "Vector3f"
    }

    fn encode(&self, value: &Vec3f, dst: &mut BytesMut) -> Result<()> {
        VECTOR3_INNER.encode(&(*value).into(), dst)
    }

    fn decode(&self, src: &mut &[u8]) -> Result<Vec3f> {
        VECTOR3_INNER.decode(src).map(Vec3f::from)
    }
}

/// [`ZigZag`] triple as a [`BlockPosition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockPos;

const BLOCK_POS_INNER: Triple<ZigZag> = Triple(ZigZag);

impl Codec for BlockPos {
    type Value = BlockPosition;

    fn name(&self) -> &'static str {
        "BlockPosition"
    }

    fn encode(&self, value: &BlockPosition, dst: &mut BytesMut) -> Result<()> {
        BLOCK_POS_INNER.encode(&(*value).into(), dst)
    }

    fn decode(&self, src: &mut &[u8]) -> Result<BlockPosition> {
        BLOCK_POS_INNER.decode(src).map(BlockPosition::from)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn encode<C: Codec>(codec: &C, value: &C::Value) -> BytesMut {
        let mut buf = BytesMut::new();
        codec.encode(value, &mut buf).expect("encode");
        buf
    }

    #[test]
    fn test_endianness() {
        assert_eq!(&encode(&Uint16(Endian::Little), &0x0102)[..], &[0x02, 0x01]);
        assert_eq!(&encode(&Uint16(Endian::Big), &0x0102)[..], &[0x01, 0x02]);
        assert_eq!(
            &encode(&Int32(Endian::Big), &-2)[..],
            &[0xFF, 0xFF, 0xFF, 0xFE]
        );
        assert_eq!(
            &encode(&Float32(Endian::Little), &1.0)[..],
            &[0x00, 0x00, 0x80, 0x3F]
        );
    }

    #[test]
    fn test_fixed_width_underflow() {
        let bytes = [0x00, 0x00];
        let err = Float32(Endian::Little).decode(&mut &bytes[..]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::BufferUnderflow {
                needed: 4,
                remaining: 2
            }
        ));

        let empty: [u8; 0] = [];
        assert!(Uint8.decode(&mut &empty[..]).is_err());
        assert!(Int64(Endian::Big).decode(&mut &bytes[..]).is_err());
    }

    #[test]
    fn test_bool_rejects_other_bytes() {
        assert!(Bool.decode(&mut &[1u8][..]).unwrap());
        assert!(!Bool.decode(&mut &[0u8][..]).unwrap());
        assert!(matches!(
            Bool.decode(&mut &[2u8][..]),
            Err(ProtocolError::ValueRange { .. })
        ));
    }

    #[test]
    fn test_string_layout_and_errors() {
        let buf = encode(&Utf8String::default(), &"hé".to_string());
        assert_eq!(&buf[..], &[0x03, b'h', 0xC3, 0xA9]);

        // Declares 5 bytes, carries 2.
        let short = [0x05, b'a', b'b'];
        assert!(matches!(
            Utf8String::default().decode(&mut &short[..]),
            Err(ProtocolError::BufferUnderflow {
                needed: 5,
                remaining: 2
            })
        ));

        let invalid = [0x02, 0xC3, 0x28];
        assert!(matches!(
            Utf8String::default().decode(&mut &invalid[..]),
            Err(ProtocolError::InvalidUtf8)
        ));

        let limited = Utf8String { max_len: 2 };
        let long = [0x03, b'a', b'b', b'c'];
        assert!(matches!(
            limited.decode(&mut &long[..]),
            Err(ProtocolError::LengthLimit { len: 3, max: 2 })
        ));
    }

    #[test]
    fn test_string_decode_advances_cursor() {
        let bytes = [0x01, b'x', 0xAA];
        let mut cursor = &bytes[..];
        assert_eq!(Utf8String::default().decode(&mut cursor).unwrap(), "x");
        assert_eq!(cursor, &[0xAA]);
    }

    #[test]
    fn test_vector3_layout() {
        let buf = encode(&Vector3, &Vec3f::new(1.0, 2.0, 3.0));
        assert_eq!(
            &buf[..],
            &[0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x40, 0x40]
        );
        assert_eq!(
            Vector3.decode(&mut &buf[..]).unwrap(),
            Vec3f::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn test_block_pos_layout() {
        let pos = BlockPosition::new(10, 64, -5);
        let buf = encode(&BlockPos, &pos);
        assert_eq!(&buf[..], &[0x14, 0x80, 0x01, 0x09]);
        assert_eq!(BlockPos.decode(&mut &buf[..]).unwrap(), pos);
    }

    #[test]
    fn test_array_of_triples() {
        let codec = Array::new(Triple(VarInt));
        let value = vec![[1, 2, 3], [300, 0, 7]];
        let buf = encode(&codec, &value);
        assert_eq!(buf[0], 0x02);
        assert_eq!(codec.decode(&mut &buf[..]).unwrap(), value);
    }

    #[test]
    fn test_array_length_limit() {
        let codec = Array {
            item: Uint8,
            max_len: 2,
        };
        let bytes = [0x03, 1, 2, 3];
        assert!(matches!(
            codec.decode(&mut &bytes[..]),
            Err(ProtocolError::LengthLimit { len: 3, max: 2 })
        ));
    }

    #[test]
    fn test_encode_enforces_length_limits() {
        let mut buf = BytesMut::from(&b"keep"[..]);
        let limited = Utf8String { max_len: 2 };
        assert!(matches!(
            limited.encode(&"abc".to_string(), &mut buf),
            Err(ProtocolError::LengthLimit { len: 3, max: 2 })
        ));
        limited.encode(&"ab".to_string(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"keep\x02ab");

        let mut buf = BytesMut::new();
        let codec = Array {
            item: Uint8,
            max_len: 1,
        };
        assert!(matches!(
            codec.encode(&vec![1, 2], &mut buf),
            Err(ProtocolError::LengthLimit { len: 2, max: 1 })
        ));
        assert!(buf.is_empty());

        codec.encode(&vec![9], &mut buf).unwrap();
        assert_eq!(codec.decode(&mut &buf[..]).unwrap(), vec![9]);
    }

    #[test]
    fn test_array_huge_count_underflows_without_allocating() {
        let codec = Array::new(Uint8);
        // Count of 60_000 with one byte of data.
        let bytes = [0xE0, 0xD4, 0x03, 0x01];
        assert!(matches!(
            codec.decode(&mut &bytes[..]),
            Err(ProtocolError::BufferUnderflow { .. })
        ));
    }
}
