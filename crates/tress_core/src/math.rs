//! Mathematical value types shared across the pipeline.
//!
//! These are the canonical representations used in the `.hair` file format
//! and in the buffers handed to renderers, so they are `#[repr(C)]` and Pod.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D vector - positions, tangents, colors.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns this vector scaled to unit length.
    #[must_use]
    pub fn normalized(self) -> Self {
        self / self.length()
    }

    /// Component-wise floor.
    #[must_use]
    pub fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor(), self.z.floor())
    }

    /// Component-wise absolute value.
    #[must_use]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Largest of the three components.
    #[must_use]
    pub fn max_component(self) -> f32 {
        self.x.max(self.y).max(self.z)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::Div<f32> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl std::ops::Div for Vec3 {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y, self.z / rhs.z)
    }
}

/// 4D vector - interleaved GPU vertex layouts (position+thickness,
/// tangent+transparency, color+transparency).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec4 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Vec4 {
    /// Creates a new Vec4
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Packs a Vec3 with a scalar into the fourth lane.
    #[must_use]
    pub const fn from_vec3(v: Vec3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

/// Quantized signed 8-bit 4-vector.
///
/// Stores a voxel's mean tangent scaled by 127. The fourth lane is unused
/// and kept at zero so the grid uploads as a tightly packed 4-byte texel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct I8Vec4 {
    /// X component
    pub x: i8,
    /// Y component
    pub y: i8,
    /// Z component
    pub z: i8,
    /// W component (unused, zero)
    pub w: i8,
}

impl I8Vec4 {
    /// All-zero vector
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0, w: 0 };

    /// Creates a new I8Vec4
    #[must_use]
    pub const fn new(x: i8, y: i8, z: i8, w: i8) -> Self {
        Self { x, y, z, w }
    }
}

/// Axis-aligned bounding box, stored as origin + size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner of the box.
    pub origin: Vec3,
    /// Extent from the origin to the maximum corner.
    pub size: Vec3,
}

impl Aabb {
    /// Creates a box from its minimum and maximum corners.
    #[must_use]
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            origin: min,
            size: max - min,
        }
    }

    /// Length of the box diagonal.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.size.length()
    }

    /// Enclosed volume.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.size.x * self.size.y * self.size.z
    }
}
