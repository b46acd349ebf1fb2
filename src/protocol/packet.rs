//! # Typed Packets
//!
//! [`DataPacket`] ties a Rust struct to its packet id and field table. The
//! [`data_packet!`](crate::data_packet) macro declares both from a single
//! field list, so a packet type is pure data: the engine does the encoding.
//!
//! ## Usage
//! ```rust
//! use game_protocol::core::field::FieldKind;
//! use game_protocol::data_packet;
//! use game_protocol::protocol::packet::DataPacket;
//!
//! data_packet! {
//!     /// Client asks the server to echo a nonce.
//!     pub struct Ping = 200 {
//!         pub nonce: u64 => FieldKind::VarLong,
//!     }
//! }
//!
//! let descriptor = Ping::descriptor().unwrap();
//! assert_eq!(descriptor.id(), 200);
//! assert_eq!(descriptor.fields()[0].name(), "nonce");
//! ```

use crate::core::value::Value;
use crate::error::Result;
use crate::protocol::descriptor::PacketDescriptor;

/// A packet type with a fixed id and field layout.
pub trait DataPacket: Sized + Send + Sync + 'static {
    const ID: u32;
    const NAME: &'static str;

    /// Field table of this packet.
    fn descriptor() -> Result<PacketDescriptor>;

    /// Field values in wire order.
    fn to_values(&self) -> Vec<Value>;

    /// Rebuilds the packet from values in wire order.
    fn from_values(values: Vec<Value>) -> Result<Self>;
}

/// Declares a packet struct and its [`DataPacket`] implementation.
///
/// Each field is written `name: Type => FieldKind`; declaration order is wire
/// order. `Type` must implement [`IntoValue`](crate::core::value::IntoValue),
/// [`FromValue`](crate::core::value::FromValue) and `Clone`.
#[macro_export]
macro_rules! data_packet {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident = $id:literal {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty => $kind:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::protocol::packet::DataPacket for $name {
            const ID: u32 = $id;
            const NAME: &'static str = stringify!($name);

            fn descriptor() -> $crate::error::Result<$crate::protocol::descriptor::PacketDescriptor> {
                $crate::protocol::descriptor::PacketDescriptor::builder(Self::ID, Self::NAME)
                    $(.field(stringify!($field), $kind))*
                    .build()
            }

            fn to_values(&self) -> ::std::vec::Vec<$crate::core::value::Value> {
                ::std::vec![
                    $($crate::core::value::IntoValue::into_value(::std::clone::Clone::clone(&self.$field)),)*
                ]
            }

            #[allow(unused_mut, unused_variables)]
            fn from_values(
                values: ::std::vec::Vec<$crate::core::value::Value>,
            ) -> $crate::error::Result<Self> {
                let mut values = values.into_iter();
                let packet = Self {
                    $(
                        $field: {
                            let value = values.next().ok_or_else(|| {
                                $crate::error::ProtocolError::MissingField(
                                    stringify!($field).to_string(),
                                )
                            })?;
                            <$ty as $crate::core::value::FromValue>::from_value(
                                stringify!($field),
                                value,
                            )?
                        },
                    )*
                };
                if values.next().is_some() {
                    return Err($crate::error::ProtocolError::DescriptorMismatch {
                        id: $id,
                        reason: $crate::error::constants::ERR_VALUE_COUNT,
                    });
                }
                Ok(packet)
            }
        }
    };
}

/// Declares a `u8`-backed enum carried in an integer field.
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $value,
            )*
        }

        impl $crate::core::value::IntoValue for $name {
            fn into_value(self) -> $crate::core::value::Value {
                $crate::core::value::Value::Integer(self as u8 as i128)
            }
        }

        impl $crate::core::value::FromValue for $name {
            fn from_value(
                field: &str,
                value: $crate::core::value::Value,
            ) -> $crate::error::Result<Self> {
                match <u8 as $crate::core::value::FromValue>::from_value(field, value)? {
                    $($value => Ok($name::$variant),)*
                    other => Err($crate::error::ProtocolError::value_range(
                        stringify!($name),
                        other,
                    )),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::core::field::FieldKind;
    use crate::core::value::{FromValue, Value};
    use crate::error::ProtocolError;
    use crate::protocol::packet::DataPacket;

    crate::wire_enum! {
        enum Mode {
            Off = 0,
            On = 1,
        }
    }

    crate::data_packet! {
        struct Probe = 300 {
            mode: Mode => FieldKind::Uint8,
            label: String => FieldKind::String,
            samples: Vec<i32> => FieldKind::array(FieldKind::ZigZag),
        }
    }

    #[test]
    fn test_macro_descriptor_matches_declaration() {
        let descriptor = Probe::descriptor().unwrap();
        assert_eq!(descriptor.id(), 300);
        assert_eq!(descriptor.name(), "Probe");
        assert_eq!(
            descriptor.to_string(),
            "Probe#300 [mode: Uint8, label: String, samples: Array<ZigZag>]"
        );
    }

    #[test]
    fn test_values_round_trip() {
        let probe = Probe {
            mode: Mode::On,
            label: "x".into(),
            samples: vec![-1, 7],
        };
        let values = probe.to_values();
        assert_eq!(values[0], Value::Integer(1));
        assert_eq!(Probe::from_values(values).unwrap(), probe);
    }

    #[test]
    fn test_missing_and_extra_values() {
        let err = Probe::from_values(vec![Value::Integer(0)]).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingField(ref f) if f == "label"));

        let mut values = Probe {
            mode: Mode::Off,
            label: String::new(),
            samples: vec![],
        }
        .to_values();
        values.push(Value::Bool(true));
        assert!(matches!(
            Probe::from_values(values),
            Err(ProtocolError::DescriptorMismatch { id: 300, .. })
        ));
    }

    #[test]
    fn test_wire_enum_rejects_unknown_discriminant() {
        assert_eq!(Mode::from_value("mode", Value::Integer(1)).unwrap(), Mode::On);
        assert!(matches!(
            Mode::from_value("mode", Value::Integer(2)),
            Err(ProtocolError::ValueRange { codec: "Mode", .. })
        ));
    }
}
