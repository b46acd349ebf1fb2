//! # Packet Catalog
//!
//! Built-in packet types and [`GamePacket`], the closed sum type the
//! dispatcher hands to game logic. Packets registered by plugins that have no
//! typed variant surface as [`GamePacket::Raw`].
//!
//! Ids follow the Bedrock protocol numbering.

use crate::core::field::FieldKind;
use crate::core::types::{BlockPosition, Vec3f};
use crate::core::value::Value;
use crate::error::Result;
use crate::protocol::engine::RawPacket;
use crate::protocol::packet::DataPacket;
use crate::{data_packet, wire_enum};

/// Length of a full in-game day in ticks.
pub const DAY_LENGTH_TICKS: i32 = 24_000;

wire_enum! {
    /// Stage of the respawn handshake.
    pub enum RespawnState {
        Searching = 0,
        ReadyToSpawn = 1,
        ClientReadyToSpawn = 2,
    }
}

data_packet! {
    /// Closes the session with an optional message.
    pub struct Disconnect = 5 {
        pub hide_disconnect_screen: bool => FieldKind::Bool,
        pub message: String => FieldKind::String,
    }
}

data_packet! {
    /// Synchronizes the world's day time.
    pub struct SetTime = 10 {
        pub time: i32 => FieldKind::ZigZag,
    }
}

impl SetTime {
    /// Packet for the given world tick, wrapped into one day.
    pub fn from_day_time(ticks: u64) -> Self {
        Self {
            time: (ticks % DAY_LENGTH_TICKS as u64) as i32,
        }
    }
}

data_packet! {
    /// Triggers a block animation such as a chest opening.
    pub struct BlockEvent = 26 {
        pub position: BlockPosition => FieldKind::BlockPosition,
        pub event_type: i32 => FieldKind::ZigZag,
        pub data: i32 => FieldKind::ZigZag,
    }
}

data_packet! {
    /// Moves a player to its spawn point.
    pub struct Respawn = 45 {
        pub position: Vec3f => FieldKind::Vector3f,
        pub state: RespawnState => FieldKind::Uint8,
        pub runtime_entity_id: u64 => FieldKind::VarLong,
    }
}

/// Any packet the dispatcher can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum GamePacket {
    Disconnect(Disconnect),
    SetTime(SetTime),
    BlockEvent(BlockEvent),
    Respawn(Respawn),
    /// A registered packet without a typed variant.
    Raw(RawPacket),
}

/// A [`DataPacket`] with its own [`GamePacket`] variant.
pub trait GamePacketVariant: DataPacket {
    fn extract(packet: &GamePacket) -> Option<&Self>;
}

macro_rules! game_packet_variants {
    ($($variant:ident),* $(,)?) => {
        impl GamePacket {
            pub fn id(&self) -> u32 {
                match self {
                    $(GamePacket::$variant(_) => $variant::ID,)*
                    GamePacket::Raw(raw) => raw.id(),
                }
            }

            pub fn name(&self) -> &str {
                match self {
                    $(GamePacket::$variant(_) => $variant::NAME,)*
                    GamePacket::Raw(raw) => raw.name(),
                }
            }

            /// Field values in wire order.
            pub fn to_values(&self) -> Vec<Value> {
                match self {
                    $(GamePacket::$variant(packet) => packet.to_values(),)*
                    GamePacket::Raw(raw) => raw.values().to_vec(),
                }
            }

            /// Converts a decoded packet to its typed variant when one exists.
            ///
            /// A descriptor only maps to a typed variant when both id and name
            /// match, so a plugin reusing an id under another name stays raw.
            pub fn from_raw(raw: RawPacket) -> Result<Self> {
                $(
                    if raw.id() == $variant::ID && raw.name() == $variant::NAME {
                        return $variant::from_values(raw.into_values()).map(GamePacket::$variant);
                    }
                )*
                Ok(GamePacket::Raw(raw))
            }
        }

        $(
            impl From<$variant> for GamePacket {
                fn from(packet: $variant) -> Self {
                    GamePacket::$variant(packet)
                }
            }

            impl GamePacketVariant for $variant {
                fn extract(packet: &GamePacket) -> Option<&Self> {
                    match packet {
                        GamePacket::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

game_packet_variants!(Disconnect, SetTime, BlockEvent, Respawn);

impl From<RawPacket> for GamePacket {
    fn from(raw: RawPacket) -> Self {
        GamePacket::Raw(raw)
    }
}
