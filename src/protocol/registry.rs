//! # Packet Registry
//!
//! Bidirectional lookup between packet ids and their descriptors.
//!
//! Registration happens in two phases:
//! 1. A [`RegistryBuilder`] collects descriptors at startup. Conflicts are
//!    reported immediately and leave the builder unchanged.
//! 2. [`RegistryBuilder::build`] freezes the table into a [`PacketRegistry`],
//!    which has no mutation API and is shared across connections behind an
//!    `Arc` without locking.
//!
//! Plugins add packet types by calling [`PacketRegistry::extend`], which seeds
//! a new builder with every existing descriptor.

use crate::core::field::FieldKind;
use crate::error::{ProtocolError, Result};
use crate::protocol::descriptor::PacketDescriptor;
use crate::protocol::packet::DataPacket;
use crate::protocol::packets::{BlockEvent, Disconnect, Respawn, SetTime};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Immutable `id <-> descriptor` table.
#[derive(Debug, Clone, Default)]
pub struct PacketRegistry {
    by_id: HashMap<u32, Arc<PacketDescriptor>>,
    by_name: HashMap<String, u32>,
}

impl PacketRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, id: u32) -> Option<&Arc<PacketDescriptor>> {
        self.by_id.get(&id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Arc<PacketDescriptor>> {
        self.by_name.get(name).and_then(|id| self.by_id.get(id))
    }

    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// A builder holding every descriptor of this registry, for adding more.
    pub fn extend(&self) -> RegistryBuilder {
        RegistryBuilder {
            by_id: self.by_id.clone(),
            by_name: self.by_name.clone(),
        }
    }
}

/// Mutable registration phase of a [`PacketRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    by_id: HashMap<u32, Arc<PacketDescriptor>>,
    by_name: HashMap<String, u32>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder pre-loaded with the built-in packet catalog.
    pub fn with_standard_packets() -> Result<Self> {
        let mut builder = Self::new();
        builder.register::<Disconnect>()?;
        builder.register::<SetTime>()?;
        builder.register::<BlockEvent>()?;
        builder.register::<Respawn>()?;
        Ok(builder)
    }

    /// Adds a descriptor.
    ///
    /// Fails with `DuplicatePacketId` or `DuplicatePacketName` without
    /// modifying the builder.
    pub fn register_packet(&mut self, descriptor: PacketDescriptor) -> Result<Arc<PacketDescriptor>> {
        let id = descriptor.id();
        if self.by_id.contains_key(&id) {
            return Err(ProtocolError::DuplicatePacketId(id));
        }
        if self.by_name.contains_key(descriptor.name()) {
            return Err(ProtocolError::DuplicatePacketName(descriptor.name().to_string()));
        }

        debug!(id, name = descriptor.name(), fields = descriptor.fields().len(), "Registered packet");

        let descriptor = Arc::new(descriptor);
        self.by_name.insert(descriptor.name().to_string(), id);
        self.by_id.insert(id, Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Builds and adds a descriptor from `(order, name, kind)` triples.
    pub fn register_fields<I, N>(
        &mut self,
        id: u32,
        name: impl Into<Cow<'static, str>>,
        fields: I,
    ) -> Result<Arc<PacketDescriptor>>
    where
        I: IntoIterator<Item = (u16, N, FieldKind)>,
        N: Into<Cow<'static, str>>,
    {
        let descriptor = fields
            .into_iter()
            .fold(PacketDescriptor::builder(id, name), |builder, (order, field, kind)| {
                builder.field_at(order, field, kind)
            })
            .build()?;
        self.register_packet(descriptor)
    }

    /// Adds the descriptor of a typed packet.
    pub fn register<P: DataPacket>(&mut self) -> Result<Arc<PacketDescriptor>> {
        self.register_packet(P::descriptor()?)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Freezes the table.
    pub fn build(self) -> PacketRegistry {
        info!(packets = self.by_id.len(), "Packet registry built");
        PacketRegistry {
            by_id: self.by_id,
            by_name: self.by_name,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn ping(id: u32, name: &'static str) -> PacketDescriptor {
        PacketDescriptor::builder(id, name)
            .field("nonce", FieldKind::VarLong)
            .build()
            .unwrap()
    }

    #[test]
    fn test_duplicate_id_leaves_builder_unchanged() {
        let mut builder = RegistryBuilder::new();
        builder.register_packet(ping(1, "Ping")).unwrap();

        let err = builder.register_packet(ping(1, "OtherPing")).unwrap_err();
        assert!(matches!(err, ProtocolError::DuplicatePacketId(1)));
        assert_eq!(builder.len(), 1);

        let registry = builder.build();
        assert_eq!(registry.get(1).unwrap().name(), "Ping");
        assert_eq!(registry.id_of("OtherPing"), None);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut builder = RegistryBuilder::new();
        builder.register_packet(ping(1, "Ping")).unwrap();
        assert!(matches!(
            builder.register_packet(ping(2, "Ping")),
            Err(ProtocolError::DuplicatePacketName(_))
        ));
        assert!(!builder.contains(2));
    }

    #[test]
    fn test_register_fields_validates_orders() {
        let mut builder = RegistryBuilder::new();
        let err = builder
            .register_fields(
                7,
                "Broken",
                [(0, "a", FieldKind::Uint8), (0, "b", FieldKind::Uint8)],
            )
            .unwrap_err();
        assert!(matches!(err, ProtocolError::DuplicateFieldOrder { .. }));
        assert!(builder.is_empty());

        let descriptor = builder
            .register_fields(
                7,
                "Fixed",
                [(1, "b", FieldKind::Uint8), (0, "a", FieldKind::Uint8)],
            )
            .unwrap();
        assert_eq!(descriptor.position_of("a"), Some(0));
    }

    #[test]
    fn test_lookup_both_directions() {
        let registry = RegistryBuilder::with_standard_packets().unwrap().build();
        assert_eq!(registry.ids(), vec![5, 10, 26, 45]);
        assert_eq!(registry.id_of("BlockEvent"), Some(26));
        assert_eq!(registry.get_by_name("Respawn").unwrap().id(), 45);
        assert!(registry.get(99).is_none());
    }

    #[test]
    fn test_extend_keeps_existing_descriptors() {
        let base = RegistryBuilder::with_standard_packets().unwrap().build();
        let mut plugin = base.extend();
        plugin.register_packet(ping(200, "PluginPing")).unwrap();
        assert!(matches!(
            plugin.register_packet(ping(26, "Clash")),
            Err(ProtocolError::DuplicatePacketId(26))
        ));

        let extended = plugin.build();
        assert_eq!(extended.len(), base.len() + 1);
        assert!(Arc::ptr_eq(
            extended.get(26).unwrap(),
            base.get(26).unwrap()
        ));
        assert!(!base.contains(200));
    }
}
