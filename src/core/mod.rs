//! # Core Codec Components
//!
//! Low-level field codecs and the value model they operate on.
//!
//! This module is the leaf layer of the crate: it knows how to turn one field
//! into bytes and back, but nothing about packet ids or registries.
//!
//! ## Components
//! - **Codec**: the [`codec::Codec`] trait with primitive and composite codecs
//! - **VarInt**: base-128 varints and zigzag mapping
//! - **Field**: [`field::FieldKind`], the closed set of codecs a descriptor names
//! - **Value**: the dynamic field value model
//! - **Types**: `Vec3f` and `BlockPosition`
//!
//! ## Wire Format
//! ```text
//! VarInt:        [1..5 bytes, 7 bits each, MSB = continuation]
//! ZigZag:        (n << 1) ^ (n >> 31), then VarInt
//! String:        [VarInt length] [UTF-8 bytes]
//! Vector3f:      [f32 LE x] [f32 LE y] [f32 LE z]
//! BlockPosition: [ZigZag x] [ZigZag y] [ZigZag z]
//! ```
//!
//! ## Security
//! - String and array lengths are checked against [`codec::CodecLimits`] before allocation
//! - Varints longer than their integer width are rejected

pub mod codec;
pub mod field;
pub mod types;
pub mod value;
pub mod varint;
