//! Small math types carried by packets.

use serde::{Deserialize, Serialize};

/// A float triple, used for entity positions and motion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3f {
    pub const ZERO: Vec3f = Vec3f::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Compares bit patterns, so `NaN` equals an identical `NaN`.
    pub fn bitwise_eq(&self, other: &Vec3f) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }
}

impl From<[f32; 3]> for Vec3f {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3f> for [f32; 3] {
    fn from(v: Vec3f) -> Self {
        [v.x, v.y, v.z]
    }
}

/// Integer block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Block containing the given world-space point.
    pub fn containing(point: Vec3f) -> Self {
        Self {
            x: point.x.floor() as i32,
            y: point.y.floor() as i32,
            z: point.z.floor() as i32,
        }
    }
}

impl From<[i32; 3]> for BlockPosition {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<BlockPosition> for [i32; 3] {
    fn from(p: BlockPosition) -> Self {
        [p.x, p.y, p.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_containing_floors_negative() {
        let pos = BlockPosition::containing(Vec3f::new(-0.5, 64.9, 3.0));
        assert_eq!(pos, BlockPosition::new(-1, 64, 3));
    }

    #[test]
    fn test_bitwise_eq_nan() {
        let a = Vec3f::new(f32::NAN, 0.0, 1.0);
        assert!(a.bitwise_eq(&a));
        assert_ne!(a, a);
    }
}
