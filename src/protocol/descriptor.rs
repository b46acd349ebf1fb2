//! # Packet Descriptors
//!
//! A [`PacketDescriptor`] is the registration-time schema of one packet type:
//! its numeric id plus the ordered list of fields that make up its wire layout.
//! Descriptors are built once through [`DescriptorBuilder`] and never change
//! afterwards.
//!
//! ## Usage
//! ```rust
//! use game_protocol::core::field::FieldKind;
//! use game_protocol::protocol::descriptor::PacketDescriptor;
//!
//! let descriptor = PacketDescriptor::builder(26, "BlockEvent")
//!     .field("position", FieldKind::BlockPosition)
//!     .field("event_type", FieldKind::ZigZag)
//!     .field("data", FieldKind::ZigZag)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(descriptor.fields().len(), 3);
//! assert_eq!(descriptor.position_of("data"), Some(2));
//! ```

use crate::core::field::FieldKind;
use crate::error::{ProtocolError, Result};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

/// One field of a packet: name, codec and wire position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: Cow<'static, str>,
    kind: FieldKind,
    order: u16,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Wire position of this field, starting at zero.
    pub fn order(&self) -> u16 {
        self.order
    }
}

/// Schema of one packet type.
///
/// `fields` is sorted by order and the orders are exactly `0..n`, so the
/// slice index of a field is its wire position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketDescriptor {
    id: u32,
    name: Cow<'static, str>,
    fields: Vec<FieldDescriptor>,
}

impl PacketDescriptor {
    pub fn builder(id: u32, name: impl Into<Cow<'static, str>>) -> DescriptorBuilder {
        DescriptorBuilder {
            id,
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

impl fmt::Display for PacketDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} [", self.name, self.id)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field.name, field.kind)?;
        }
        f.write_str("]")
    }
}

/// Collects fields for a [`PacketDescriptor`].
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    id: u32,
    name: Cow<'static, str>,
    fields: Vec<FieldDescriptor>,
}

impl DescriptorBuilder {
    /// Appends a field whose order is the number of fields declared so far.
    pub fn field(self, name: impl Into<Cow<'static, str>>, kind: FieldKind) -> Self {
        let order = u16::try_from(self.fields.len()).unwrap_or(u16::MAX);
        self.field_at(order, name, kind)
    }

    /// Declares a field at an explicit wire position.
    pub fn field_at(
        mut self,
        order: u16,
        name: impl Into<Cow<'static, str>>,
        kind: FieldKind,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            kind,
            order,
        });
        self
    }

    /// Validates the field table and freezes it.
    pub fn build(mut self) -> Result<PacketDescriptor> {
        self.fields.sort_by_key(|f| f.order);

        for (position, field) in self.fields.iter().enumerate() {
            if position > 0 && self.fields[position - 1].order == field.order {
                return Err(ProtocolError::DuplicateFieldOrder {
                    packet: self.name.to_string(),
                    order: field.order,
                });
            }
            if usize::from(field.order) != position {
                return Err(ProtocolError::FieldOrderGap {
                    packet: self.name.to_string(),
                    expected: u16::try_from(position).unwrap_or(u16::MAX),
                    found: field.order,
                });
            }
        }

        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.name.as_ref()) {
                return Err(ProtocolError::DuplicateFieldName {
                    packet: self.name.to_string(),
                    field: field.name.to_string(),
                });
            }
        }

        Ok(PacketDescriptor {
            id: self.id,
            name: self.name,
            fields: self.fields,
        })
    }
}
