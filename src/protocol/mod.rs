//! # Packet Protocol
//!
//! Packet schemas, registration, the descriptor-driven engine and dispatch.
//!
//! ## Components
//! - **Descriptor**: ordered field table of one packet type
//! - **Registry**: immutable `id <-> descriptor` table built at startup
//! - **Engine**: the one encode/decode routine shared by all packets
//! - **Packet**: the `DataPacket` trait and declaration macros
//! - **Packets**: built-in catalog and the `GamePacket` sum type
//! - **Dispatcher**: buffer in, typed packet out
//!
//! ## Flow
//! ```text
//! inbound:  bytes -> Dispatcher -> id -> Registry -> Engine.decode -> GamePacket
//! outbound: GamePacket -> Engine.encode(descriptor) -> bytes
//! ```

pub mod descriptor;
pub mod dispatcher;
pub mod engine;
pub mod packet;
pub mod packets;
pub mod registry;
