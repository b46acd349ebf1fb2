//! # Field Kinds
//!
//! [`FieldKind`] is the closed set of codecs a packet descriptor can name. It
//! bridges the dynamic [`Value`] model to the typed codecs in
//! [`crate::core::codec`]: each arm narrows the value, then delegates to the
//! matching codec. [`FieldKind::Array`] nests any other kind, arrays of arrays
//! included.

use crate::core::codec::{
    check_len, BlockPos, Bool, Codec, CodecLimits, Endian, Float32, Float64, Int16, Int32, Int64,
    Int8, Uint16, Uint32, Uint64, Uint8, Utf8String, VarInt, VarLong, Vector3, ZigZag, ZigZong,
};
use crate::core::value::{narrow_f64, type_mismatch, Value};
use crate::core::varint::{read_var_u32, write_var_u32};
use crate::error::{ProtocolError, Result};
use bytes::BytesMut;
use std::fmt;

/// Wire type of one packet field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Uint8,
    Int8,
    Uint16(Endian),
    Int16(Endian),
    Uint32(Endian),
    Int32(Endian),
    Uint64(Endian),
    Int64(Endian),
    VarInt,
    VarLong,
    ZigZag,
    ZigZong,
    Float32(Endian),
    Float64(Endian),
    String,
    Vector3f,
    BlockPosition,
    Array(Box<FieldKind>),
}

impl FieldKind {
    /// Array of `item`.
    pub fn array(item: FieldKind) -> Self {
        FieldKind::Array(Box::new(item))
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Bool => "Bool",
            FieldKind::Uint8 => "Uint8",
            FieldKind::Int8 => "Int8",
            FieldKind::Uint16(_) => "Uint16",
            FieldKind::Int16(_) => "Int16",
            FieldKind::Uint32(_) => "Uint32",
            FieldKind::Int32(_) => "Int32",
            FieldKind::Uint64(_) => "Uint64",
            FieldKind::Int64(_) => "Int64",
            FieldKind::VarInt => "VarInt",
            FieldKind::VarLong => "VarLong",
            FieldKind::ZigZag => "ZigZag",
            FieldKind::ZigZong => "ZigZong",
            FieldKind::Float32(_) => "Float32",
            FieldKind::Float64(_) => "Float64",
            FieldKind::String => "String",
            FieldKind::Vector3f => "Vector3f",
            FieldKind::BlockPosition => "BlockPosition",
            FieldKind::Array(_) => "Array",
        }
    }

    /// The [`Value`] variant this kind accepts.
    pub fn value_kind(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Float32(_) | FieldKind::Float64(_) => "float",
            FieldKind::String => "string",
            FieldKind::Vector3f => "vec3",
            FieldKind::BlockPosition => "position",
            FieldKind::Array(_) => "list",
            _ => "integer",
        }
    }

    /// Encodes `value` for the field named `field`.
    ///
    /// May leave a partial write in `dst` on failure; the engine rolls back.
    pub fn encode(
        &self,
        field: &str,
        value: &Value,
        dst: &mut BytesMut,
        limits: &CodecLimits,
    ) -> Result<()> {
        match (self, value) {
            (FieldKind::Bool, Value::Bool(b)) => Bool.encode(b, dst),
            (FieldKind::Uint8, Value::Integer(v)) => Uint8.encode(&narrow("Uint8", *v)?, dst),
            (FieldKind::Int8, Value::Integer(v)) => Int8.encode(&narrow("Int8", *v)?, dst),
            (FieldKind::Uint16(e), Value::Integer(v)) => {
                Uint16(*e).encode(&narrow("Uint16", *v)?, dst)
            }
            (FieldKind::Int16(e), Value::Integer(v)) => {
                Int16(*e).encode(&narrow("Int16", *v)?, dst)
            }
            (FieldKind::Uint32(e), Value::Integer(v)) => {
                Uint32(*e).encode(&narrow("Uint32", *v)?, dst)
            }
            (FieldKind::Int32(e), Value::Integer(v)) => {
                Int32(*e).encode(&narrow("Int32", *v)?, dst)
            }
            (FieldKind::Uint64(e), Value::Integer(v)) => {
                Uint64(*e).encode(&narrow("Uint64", *v)?, dst)
            }
            (FieldKind::Int64(e), Value::Integer(v)) => {
                Int64(*e).encode(&narrow("Int64", *v)?, dst)
            }
            (FieldKind::VarInt, Value::Integer(v)) => VarInt.encode(&narrow("VarInt", *v)?, dst),
            (FieldKind::VarLong, Value::Integer(v)) => {
                VarLong.encode(&narrow("VarLong", *v)?, dst)
            }
            (FieldKind::ZigZag, Value::Integer(v)) => ZigZag.encode(&narrow("ZigZag", *v)?, dst),
            (FieldKind::ZigZong, Value::Integer(v)) => {
                ZigZong.encode(&narrow("ZigZong", *v)?, dst)
            }
            (FieldKind::Float32(e), Value::Float(v)) => Float32(*e).encode(&narrow_f64(*v)?, dst),
            (FieldKind::Float64(e), Value::Float(v)) => Float64(*e).encode(v, dst),
            (FieldKind::String, Value::String(s)) => {
                check_len(s.len(), limits.max_string_length)?;
                string_codec(limits).encode(s, dst)
            }
            (FieldKind::Vector3f, Value::Vec3(v)) => Vector3.encode(v, dst),
            (FieldKind::BlockPosition, Value::Position(p)) => BlockPos.encode(p, dst),
            (FieldKind::Array(item), Value::List(items)) => {
                check_len(items.len(), limits.max_array_length)?;
                write_var_u32(dst, narrow("Array", items.len() as i128)?);
                for entry in items {
                    item.encode(field, entry, dst, limits)?;
                }
                Ok(())
            }
            (kind, other) => Err(type_mismatch(field, kind.value_kind(), other)),
        }
    }

    pub fn decode(&self, src: &mut &[u8], limits: &CodecLimits) -> Result<Value> {
        let value = match self {
            FieldKind::Bool => Value::Bool(Bool.decode(src)?),
            FieldKind::Uint8 => Value::Integer(Uint8.decode(src)?.into()),
            FieldKind::Int8 => Value::Integer(Int8.decode(src)?.into()),
            FieldKind::Uint16(e) => Value::Integer(Uint16(*e).decode(src)?.into()),
            FieldKind::Int16(e) => Value::Integer(Int16(*e).decode(src)?.into()),
            FieldKind::Uint32(e) => Value::Integer(Uint32(*e).decode(src)?.into()),
            FieldKind::Int32(e) => Value::Integer(Int32(*e).decode(src)?.into()),
            FieldKind::Uint64(e) => Value::Integer(Uint64(*e).decode(src)?.into()),
            FieldKind::Int64(e) => Value::Integer(Int64(*e).decode(src)?.into()),
            FieldKind::VarInt => Value::Integer(VarInt.decode(src)?.into()),
            FieldKind::VarLong => Value::Integer(VarLong.decode(src)?.into()),
            FieldKind::ZigZag => Value::Integer(ZigZag.decode(src)?.into()),
            FieldKind::ZigZong => Value::Integer(ZigZong.decode(src)?.into()),
            FieldKind::Float32(e) => Value::Float(Float32(*e).decode(src)?.into()),
            FieldKind::Float64(e) => Value::Float(Float64(*e).decode(src)?),
            FieldKind::String => Value::String(string_codec(limits).decode(src)?),
            FieldKind::Vector3f => Value::Vec3(Vector3.decode(src)?),
            FieldKind::BlockPosition => Value::Position(BlockPos.decode(src)?),
            FieldKind::Array(item) => {
                let len = read_var_u32(src)? as usize;
                check_len(len, limits.max_array_length)?;
                let mut items = Vec::with_capacity(len.min(src.len()));
                for _ in 0..len {
                    items.push(item.decode(src, limits)?);
                }
                Value::List(items)
            }
        };
        Ok(value)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Array(item) => write!(f, "Array<{item}>"),
            other => f.write_str(other.name()),
        }
    }
}

fn narrow<T: TryFrom<i128>>(codec: &'static str, v: i128) -> Result<T> {
    T::try_from(v).map_err(|_| ProtocolError::value_range(codec, v))
}

fn string_codec(limits: &CodecLimits) -> Utf8String {
    Utf8String {
        max_len: limits.max_string_length,
    }
}
