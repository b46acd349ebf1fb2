//! # DataPacket Engine
//!
//! The single encode/decode routine shared by every packet type. It walks a
//! [`PacketDescriptor`]'s fields in order and calls each field's codec; no
//! packet type carries its own serialization code.
//!
//! ## Wire Format
//! ```text
//! [VarInt packet id] [field 0] [field 1] ... [field N-1]
//! ```
//! No padding, no field tags, no overall length prefix: framing belongs to the
//! transport.
//!
//! ## Guarantees
//! - Encode and decode iterate the same `descriptor.fields()` slice
//! - A failed encode leaves the destination buffer exactly as it was
//! - A failed decode never yields a partial packet
//! - An unknown id fails before any field byte is read

use crate::core::codec::CodecLimits;
use crate::core::value::Value;
use crate::core::varint::{read_var_u32, write_var_u32};
use crate::error::constants::{ERR_TRAILING_BYTES, ERR_VALUE_COUNT, ERR_WRONG_DESCRIPTOR};
use crate::error::{ProtocolError, Result};
use crate::protocol::descriptor::PacketDescriptor;
use crate::protocol::packet::DataPacket;
use crate::protocol::registry::PacketRegistry;
use bytes::{Bytes, BytesMut};
use std::sync::Arc;

/// A decoded packet in descriptor form: one value per declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPacket {
    descriptor: Arc<PacketDescriptor>,
    values: Vec<Value>,
}

impl RawPacket {
    /// Pairs values with a descriptor, checking the field count.
    pub fn new(descriptor: Arc<PacketDescriptor>, values: Vec<Value>) -> Result<Self> {
        if values.len() != descriptor.fields().len() {
            return Err(ProtocolError::DescriptorMismatch {
                id: descriptor.id(),
                reason: ERR_VALUE_COUNT,
            });
        }
        Ok(Self { descriptor, values })
    }

    pub fn id(&self) -> u32 {
        self.descriptor.id()
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &Arc<PacketDescriptor> {
        &self.descriptor
    }

    /// Values in wire order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.descriptor
            .position_of(field)
            .and_then(|i| self.values.get(i))
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Descriptor-driven encoder/decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketEngine {
    limits: CodecLimits,
}

impl PacketEngine {
    pub fn new(limits: CodecLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &CodecLimits {
        &self.limits
    }

    /// Appends `[id][fields...]` to `dst`.
    pub fn encode(
        &self,
        descriptor: &PacketDescriptor,
        values: &[Value],
        dst: &mut BytesMut,
    ) -> Result<()> {
        if values.len() != descriptor.fields().len() {
            return Err(ProtocolError::DescriptorMismatch {
                id: descriptor.id(),
                reason: ERR_VALUE_COUNT,
            });
        }

        let start = dst.len();
        let result = self.write_packet(descriptor, values, dst);
        if result.is_err() {
            dst.truncate(start);
        }
        result
    }

    fn write_packet(
        &self,
        descriptor: &PacketDescriptor,
        values: &[Value],
        dst: &mut BytesMut,
    ) -> Result<()> {
        write_var_u32(dst, descriptor.id());
        for (field, value) in descriptor.fields().iter().zip(values) {
            field.kind().encode(field.name(), value, dst, &self.limits)?;
        }
        Ok(())
    }

    pub fn encode_raw(&self, packet: &RawPacket, dst: &mut BytesMut) -> Result<()> {
        self.encode(packet.descriptor(), packet.values(), dst)
    }

    /// Encodes a typed packet using the descriptor registered under its id.
    pub fn encode_packet<P: DataPacket>(
        &self,
        packet: &P,
        registry: &PacketRegistry,
        dst: &mut BytesMut,
    ) -> Result<()> {
        let descriptor = registry
            .get(P::ID)
            .ok_or(ProtocolError::UnknownPacketId(P::ID))?;
        if descriptor.name() != P::NAME {
            return Err(ProtocolError::DescriptorMismatch {
                id: P::ID,
                reason: ERR_WRONG_DESCRIPTOR,
            });
        }
        self.encode(descriptor, &packet.to_values(), dst)
    }

    /// Encodes into a fresh buffer.
    pub fn encode_to_bytes(&self, descriptor: &PacketDescriptor, values: &[Value]) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode(descriptor, values, &mut buf)?;
        Ok(buf.freeze())
    }

    /// Reads the leading packet id without resolving it.
    pub fn peek_id(buf: &[u8]) -> Result<u32> {
        let mut cursor = buf;
        read_var_u32(&mut cursor)
    }

    /// Decodes one complete packet.
    ///
    /// The buffer must hold exactly one packet; leftover bytes fail with
    /// `DescriptorMismatch`.
    pub fn decode(&self, buf: &[u8], registry: &PacketRegistry) -> Result<RawPacket> {
        if buf.len() > self.limits.max_packet_size {
            return Err(ProtocolError::OversizedPacket(buf.len()));
        }

        let mut cursor = buf;
        let id = read_var_u32(&mut cursor)?;
        let descriptor = registry
            .get(id)
            .ok_or(ProtocolError::UnknownPacketId(id))?;

        let mut values = Vec::with_capacity(descriptor.fields().len());
        for field in descriptor.fields() {
            values.push(field.kind().decode(&mut cursor, &self.limits)?);
        }

        if !cursor.is_empty() {
            return Err(ProtocolError::DescriptorMismatch {
                id,
                reason: ERR_TRAILING_BYTES,
            });
        }

        RawPacket::new(Arc::clone(descriptor), values)
    }

    /// Decodes a typed packet, failing if the buffer holds a different id.
    pub fn decode_packet<P: DataPacket>(&self, buf: &[u8], registry: &PacketRegistry) -> Result<P> {
        let raw = self.decode(buf, registry)?;
        if raw.id() != P::ID || raw.name() != P::NAME {
            return Err(ProtocolError::DescriptorMismatch {
                id: raw.id(),
                reason: ERR_WRONG_DESCRIPTOR,
            });
        }
        P::from_values(raw.into_values())
    }
}
