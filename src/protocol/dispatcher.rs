use crate::core::codec::CodecLimits;
use crate::error::constants::ERR_WRONG_DESCRIPTOR;
use crate::error::{ProtocolError, Result};
use crate::protocol::engine::{PacketEngine, RawPacket};
use crate::protocol::packets::{GamePacket, GamePacketVariant};
use crate::protocol::registry::PacketRegistry;
use crate::utils::metrics::Metrics;
use bytes::{Bytes, BytesMut};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

type HandlerFn = dyn Fn(&GamePacket) -> Result<Option<GamePacket>> + Send + Sync + 'static;

/// Packet dispatcher: resolves a buffer's leading id and decodes it.
///
/// Handlers are registered during setup through `&mut self`; afterwards the
/// dispatcher is shared read-only, so the hot path takes no locks.
pub struct Dispatcher {
    registry: Arc<PacketRegistry>,
    engine: PacketEngine,
    handlers: HashMap<u32, Box<HandlerFn>>,
    metrics: Arc<Metrics>,
}

impl Dispatcher {
    pub fn new(registry: Arc<PacketRegistry>) -> Self {
        Self::with_limits(registry, CodecLimits::default())
    }

    pub fn with_limits(registry: Arc<PacketRegistry>, limits: CodecLimits) -> Self {
        Self {
            registry,
            engine: PacketEngine::new(limits),
            handlers: HashMap::new(),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Shares an existing metrics collector instead of a private one.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn registry(&self) -> &Arc<PacketRegistry> {
        &self.registry
    }

    pub fn engine(&self) -> &PacketEngine {
        &self.engine
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Registers a handler for a typed packet.
    pub fn on<P, F>(&mut self, handler: F)
    where
        P: GamePacketVariant,
        F: Fn(&P) -> Result<Option<GamePacket>> + Send + Sync + 'static,
    {
        self.insert_handler(
            P::ID,
            Box::new(move |packet| match P::extract(packet) {
                Some(inner) => handler(inner),
                None => Err(ProtocolError::DescriptorMismatch {
                    id: packet.id(),
                    reason: ERR_WRONG_DESCRIPTOR,
                }),
            }),
        );
    }

    /// Registers a handler for any packet id, typed or raw.
    pub fn on_id<F>(&mut self, id: u32, handler: F)
    where
        F: Fn(&GamePacket) -> Result<Option<GamePacket>> + Send + Sync + 'static,
    {
        self.insert_handler(id, Box::new(handler));
    }

    fn insert_handler(&mut self, id: u32, handler: Box<HandlerFn>) {
        if self.handlers.insert(id, handler).is_some() {
            warn!(id, "Replaced existing packet handler");
        }
    }

    pub fn has_handler(&self, id: u32) -> bool {
        self.handlers.contains_key(&id)
    }

    /// Decodes one complete packet into its typed form.
    pub fn dispatch(&self, buf: &[u8]) -> Result<GamePacket> {
        let result = self
            .engine
            .decode(buf, &self.registry)
            .and_then(GamePacket::from_raw);
        self.record_decode(buf.len(), &result);
        result
    }

    /// Decodes without converting to a typed variant.
    pub fn dispatch_raw(&self, buf: &[u8]) -> Result<RawPacket> {
        let result = self.engine.decode(buf, &self.registry);
        self.record_decode(buf.len(), &result);
        result
    }

    fn record_decode<T>(&self, byte_count: usize, result: &Result<T>) {
        match result {
            Ok(_) => self.metrics.packet_decoded(byte_count as u64),
            Err(ProtocolError::UnknownPacketId(_)) => self.metrics.unknown_packet(),
            Err(_) => self.metrics.decode_error(),
        }
    }

    /// Dispatches, then runs the handler registered for the packet's id.
    pub fn route(&self, buf: &[u8]) -> Result<Option<GamePacket>> {
        let packet = self.dispatch(buf)?;
        let handler = self
            .handlers
            .get(&packet.id())
            .ok_or(ProtocolError::NoHandler(packet.id()))?;
        handler(&packet)
    }

    /// Encodes an outbound packet.
    ///
    /// A typed packet is only written with the descriptor registered under
    /// its own name; a different descriptor on the same id fails with
    /// `DescriptorMismatch`.
    pub fn encode(&self, packet: &GamePacket) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        match self.write_packet(packet, &mut buf) {
            Ok(()) => {
                self.metrics.packet_encoded(buf.len() as u64);
                Ok(buf.freeze())
            }
            Err(e) => {
                self.metrics.encode_error();
                Err(e)
            }
        }
    }

    fn write_packet(&self, packet: &GamePacket, buf: &mut BytesMut) -> Result<()> {
        match packet {
            GamePacket::Raw(raw) => self.engine.encode_raw(raw, buf),
            typed => {
                let descriptor = self
                    .registry
                    .get(typed.id())
                    .ok_or(ProtocolError::UnknownPacketId(typed.id()))?;
                if descriptor.name() != typed.name() {
                    return Err(ProtocolError::DescriptorMismatch {
                        id: typed.id(),
                        reason: ERR_WRONG_DESCRIPTOR,
                    });
                }
                self.engine.encode(descriptor, &typed.to_values(), buf)
            }
        }
    }
}
