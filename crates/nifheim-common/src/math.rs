//! Plain-old-data math types as stored in NIF files.
//!
//! All types are `#[repr(C)]` aggregates of `f32`/`u8` with no padding, so
//! they can be read in bulk with [`StreamReader::read_array`](crate::StreamReader::read_array).

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// A 2D vector (texture coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

/// A 3D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    /// Create a vector from components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// A 4D vector, also used for Havok's padded 3D vectors.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// A rotation quaternion, stored scalar first.
#[derive(Debug, Clone, Copy, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quaternion {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A row-major 3x3 matrix.
#[derive(Debug, Clone, Copy, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Matrix3 {
    pub rows: [[f32; 3]; 3],
}

impl Matrix3 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A row-major 4x4 matrix (Havok transforms).
#[derive(Debug, Clone, Copy, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Matrix4 {
    pub rows: [[f32; 4]; 4],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self {
            rows: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

/// Translation, rotation and uniform scale, in file order.
#[derive(Debug, Clone, Copy, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Transform {
    pub translation: Vector3,
    pub rotation: Matrix3,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::default(),
            rotation: Matrix3::IDENTITY,
            scale: 1.0,
        }
    }
}

/// A bounding sphere.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct BoundingSphere {
    pub center: Vector3,
    pub radius: f32,
}

/// An RGB color with float channels.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// An RGBA color with float channels.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// An RGBA color with byte channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ByteColor4 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// A triangle as three vertex indices.
pub type Triangle = [u16; 3];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_match_file_layout() {
        assert_eq!(std::mem::size_of::<Vector3>(), 12);
        assert_eq!(std::mem::size_of::<Quaternion>(), 16);
        assert_eq!(std::mem::size_of::<Matrix3>(), 36);
        assert_eq!(std::mem::size_of::<Transform>(), 52);
        assert_eq!(std::mem::size_of::<BoundingSphere>(), 16);
        assert_eq!(std::mem::size_of::<ByteColor4>(), 4);
    }

    #[test]
    fn test_defaults_are_identity() {
        let t = Transform::default();
        assert_eq!(t.rotation, Matrix3::IDENTITY);
        assert_eq!(t.scale, 1.0);
        assert_eq!(Quaternion::default(), Quaternion::IDENTITY);
    }
}
