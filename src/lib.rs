//! # game-protocol
//!
//! Declarative binary packet codec, registry and dispatcher for game server
//! network layers.
//!
//! Packets are described once, at startup, as an id plus an ordered list of
//! field codecs. A single engine encodes and decodes every packet type from
//! that description, and a dispatcher routes inbound buffers by their leading
//! varint id.
//!
//! ## Wire Format
//! ```text
//! [VarInt packet id] [field 0] [field 1] ... [field N-1]
//! ```
//!
//! ## Quick Start
//! ```rust
//! use std::sync::Arc;
//! use game_protocol::core::types::BlockPosition;
//! use game_protocol::protocol::dispatcher::Dispatcher;
//! use game_protocol::protocol::packets::{BlockEvent, GamePacket};
//! use game_protocol::protocol::registry::RegistryBuilder;
//!
//! let registry = Arc::new(RegistryBuilder::with_standard_packets().unwrap().build());
//! let dispatcher = Dispatcher::new(registry);
//!
//! let event = BlockEvent { position: BlockPosition::new(10, 64, -5), event_type: 2, data: 5 };
//! let bytes = dispatcher.encode(&event.clone().into()).unwrap();
//! assert_eq!(dispatcher.dispatch(&bytes).unwrap(), GamePacket::BlockEvent(event));
//! ```
//!
//! ## Modules
//! - [`core`]: field codecs, varints, the value model
//! - [`protocol`]: descriptors, registry, engine, packets, dispatcher
//! - [`config`]: TOML/env configuration of codec limits and logging
//! - [`error`]: the [`ProtocolError`] taxonomy
//! - [`utils`]: logging setup and metrics

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::codec::{Codec, CodecLimits, Endian};
pub use crate::core::field::FieldKind;
pub use crate::core::types::{BlockPosition, Vec3f};
pub use crate::core::value::Value;
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::descriptor::PacketDescriptor;
pub use crate::protocol::dispatcher::Dispatcher;
pub use crate::protocol::engine::{PacketEngine, RawPacket};
pub use crate::protocol::packet::DataPacket;
pub use crate::protocol::packets::GamePacket;
pub use crate::protocol::registry::{PacketRegistry, RegistryBuilder};
