//! Dense voxel grid storage.
//!
//! Densities and tangents live in flat arrays in grid order - x fastest,
//! then y, then z - matching the layout volumetric shaders sample and the
//! raw layout [`Volume::save`] writes.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;
use tress_core::math::{Aabb, I8Vec4, Vec3};

/// Grid dimensions of a volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridResolution {
    /// Voxels along x.
    pub width: usize,
    /// Voxels along y.
    pub height: usize,
    /// Voxels along z.
    pub depth: usize,
}

impl GridResolution {
    /// Creates a resolution.
    #[must_use]
    pub const fn new(width: usize, height: usize, depth: usize) -> Self {
        Self { width, height, depth }
    }

    /// A cubic resolution.
    #[must_use]
    pub const fn cubic(side: usize) -> Self {
        Self::new(side, side, side)
    }

    /// Total voxel count.
    #[must_use]
    pub const fn voxel_count(self) -> usize {
        self.width * self.height * self.depth
    }

    /// Linear index of a voxel, x fastest.
    #[inline]
    #[must_use]
    pub const fn voxel_index(self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.width + z * self.width * self.height
    }

    /// The resolution as a float vector, for voxel-space arithmetic.
    #[must_use]
    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.width as f32, self.height as f32, self.depth as f32)
    }
}

/// A voxelized hair volume: per-voxel density and mean tangent.
///
/// Built by [`Volume::from_vertices`] or [`Volume::from_segments`];
/// immutable afterwards (normalization rescales densities in place but is
/// the owner's call, before sharing).
#[derive(Clone, Debug)]
pub struct Volume {
    pub(crate) resolution: GridResolution,
    pub(crate) bounds: Aabb,
    pub(crate) densities: Vec<u8>,
    pub(crate) tangents: Vec<I8Vec4>,
}

impl Volume {
    /// Grid dimensions.
    #[inline]
    #[must_use]
    pub fn resolution(&self) -> GridResolution {
        self.resolution
    }

    /// The box the grid covers, from the source asset's bounding box.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Per-voxel saturating density counters, grid order.
    #[inline]
    #[must_use]
    pub fn densities(&self) -> &[u8] {
        &self.densities
    }

    /// Per-voxel quantized mean tangents, grid order.
    #[inline]
    #[must_use]
    pub fn tangents(&self) -> &[I8Vec4] {
        &self.tangents
    }

    /// Density of one voxel.
    #[inline]
    #[must_use]
    pub fn density_at(&self, x: usize, y: usize, z: usize) -> u8 {
        self.densities[self.resolution.voxel_index(x, y, z)]
    }

    /// The tangent grid as raw bytes, ready for GPU upload.
    #[inline]
    #[must_use]
    pub fn tangent_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tangents)
    }

    /// Rescales densities so the observed range spans `[0, 255]`.
    ///
    /// A volume with uniform density (observed min equals max) is left
    /// untouched; there is no contrast to stretch.
    pub fn normalize(&mut self) {
        let Some(&max) = self.densities.iter().max() else {
            return;
        };
        let min = *self.densities.iter().min().unwrap_or(&0);

        if max == min {
            return;
        }

        let scaling = 255.0 / f32::from(max - min);
        for density in &mut self.densities {
            *density = ((f32::from(*density - min)) * scaling) as u8;
        }
    }

    /// Writes the raw density bytes in grid order - x fastest, then y,
    /// then z - with no header. Readers must know the resolution
    /// out-of-band.
    ///
    /// # Errors
    ///
    /// Any I/O failure while creating or writing the file.
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(&self.densities)?;

        debug!(voxels = self.densities.len(), "saved volume densities");

        Ok(())
    }
}
