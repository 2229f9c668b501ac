//! # Strand Rasterization
//!
//! Two passes turn a hair asset into a [`Volume`]:
//!
//! - **Vertex voxelization** splats every vertex into the voxel containing
//!   it. Cheap, and adequate when the strand sampling is denser than the
//!   grid.
//! - **Segment voxelization** walks every line segment through the grid
//!   with a fixed-step DDA (step count = the largest absolute component of
//!   the voxel-space direction), so coarse strands still leave a connected
//!   trail.
//!
//! Both accumulate a per-voxel saturating density and the running sum of
//! contributing tangents. A voxel that reaches density 255 is frozen: its
//! counter stops and its tangent accumulator takes no further
//! contributions. The final pass divides each accumulator by its density
//! and quantizes by 127 into signed bytes; zero-density voxels keep a zero
//! tangent. That pass is per-voxel independent and runs as a rayon
//! parallel map.
//!
//! ## Preconditions
//!
//! The asset must carry tangents and a generated bounding box; violations
//! panic (see each constructor). Rasterization itself is sequential - the
//! saturation rule makes voxel updates order-sensitive.

use rayon::prelude::*;
use tracing::debug;

use tress_core::math::{I8Vec4, Vec3};
use tress_hair::HairStyle;

use crate::volume::{GridResolution, Volume};

/// Running accumulation state shared by both rasterization passes.
struct Accumulator {
    densities: Vec<u8>,
    tangent_sums: Vec<Vec3>,
}

impl Accumulator {
    fn new(voxel_count: usize) -> Self {
        Self {
            densities: vec![0; voxel_count],
            tangent_sums: vec![Vec3::ZERO; voxel_count],
        }
    }

    /// Adds one contribution unless the voxel has saturated.
    #[inline]
    fn splat(&mut self, index: usize, tangent: Vec3) {
        if self.densities[index] != 255 {
            self.tangent_sums[index] += tangent;
            self.densities[index] += 1;
        }
    }

    /// Mean-and-quantize pass: per-voxel independent, parallel.
    fn quantize(self) -> (Vec<u8>, Vec<I8Vec4>) {
        let tangents = self
            .densities
            .par_iter()
            .zip(self.tangent_sums.par_iter())
            .map(|(&density, &sum)| {
                if density == 0 {
                    // Nothing passed through; the mean is undefined, the
                    // stored tangent stays zero.
                    I8Vec4::ZERO
                } else {
                    let mean = sum / f32::from(density) * 127.0;
                    I8Vec4::new(mean.x as i8, mean.y as i8, mean.z as i8, 0)
                }
            })
            .collect();
        (self.densities, tangents)
    }
}

/// Floors a continuous voxel-space coordinate and clamps it into the grid
/// on both ends, then returns the linear voxel index.
#[inline]
fn clamped_index(voxel: Vec3, resolution: GridResolution) -> usize {
    let limit = resolution.as_vec3() - Vec3::new(1.0, 1.0, 1.0);
    let clamped = voxel.floor().max(Vec3::ZERO).min(limit);
    resolution.voxel_index(clamped.x as usize, clamped.y as usize, clamped.z as usize)
}

fn check_preconditions(style: &HairStyle, resolution: GridResolution) {
    assert!(resolution.voxel_count() > 0, "volume resolution must be non-zero");
    assert!(
        style.has_bounding_box(),
        "generate_bounding_box() must run before voxelization"
    );
    assert!(
        style.has_tangents(),
        "tangents must be loaded or generated before voxelization"
    );
}

impl Volume {
    /// Rasterizes every vertex of the asset into its containing voxel,
    /// accumulating the vertex's tangent there.
    ///
    /// Vertices outside the bounding box are clamped into the boundary
    /// voxels.
    ///
    /// # Panics
    ///
    /// Panics if the resolution is zero, the asset has no generated
    /// bounding box, or tangents are absent or shorter than the vertex
    /// array.
    #[must_use]
    pub fn from_vertices(style: &HairStyle, resolution: GridResolution) -> Self {
        check_preconditions(style, resolution);

        let bounds = style.bounding_box();
        let voxel_size = bounds.size / resolution.as_vec3();

        let mut accumulator = Accumulator::new(resolution.voxel_count());

        let vertices = style.vertices();
        let tangents = style.tangents();

        for (i, vertex) in vertices.iter().enumerate() {
            let voxel = (*vertex - bounds.origin) / voxel_size;
            accumulator.splat(clamped_index(voxel, resolution), tangents[i]);
        }

        debug!(
            vertices = vertices.len(),
            voxels = resolution.voxel_count(),
            "voxelized vertices"
        );

        let (densities, tangents) = accumulator.quantize();
        Self { resolution, bounds, densities, tangents }
    }

    /// Rasterizes every line segment of the asset with a fixed-step DDA,
    /// accumulating the segment's root tangent into each traversed voxel.
    ///
    /// The walk starts at the root vertex's voxel-space position and takes
    /// `max(|direction|)` unit steps toward the tip, so neighbouring
    /// voxels along the dominant axis are each visited once. Zero-length
    /// segments rasterize nothing.
    ///
    /// # Panics
    ///
    /// As [`Volume::from_vertices`]; additionally requires the index array
    /// (generate it first) and panics on indices past the vertex array.
    #[must_use]
    pub fn from_segments(style: &HairStyle, resolution: GridResolution) -> Self {
        check_preconditions(style, resolution);

        let bounds = style.bounding_box();
        let voxel_size = bounds.size / resolution.as_vec3();

        let mut accumulator = Accumulator::new(resolution.voxel_count());

        let vertices = style.vertices();
        let tangents = style.tangents();

        for pair in style.indices().chunks_exact(2) {
            let root_index = pair[0] as usize;
            let tip_index = pair[1] as usize;

            let mut root = (vertices[root_index] - bounds.origin) / voxel_size;
            let tip = (vertices[tip_index] - bounds.origin) / voxel_size;

            let mut direction = tip - root;
            let mut steps = direction.abs().max_component();
            if steps > 0.0 {
                direction = direction / steps;
            }

            while steps > 0.0 {
                accumulator.splat(clamped_index(root, resolution), tangents[root_index]);
                root += direction; // Move to the next voxel to rasterize.
                steps -= 1.0;
            }
        }

        debug!(
            segments = style.indices().len() / 2,
            voxels = resolution.voxel_count(),
            "voxelized segments"
        );

        let (densities, tangents) = accumulator.quantize();
        Self { resolution, bounds, densities, tangents }
    }
}
