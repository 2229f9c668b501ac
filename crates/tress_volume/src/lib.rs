//! # TRESS Volume
//!
//! Voxelizes hair-strand geometry into a dense 3D grid for volumetric
//! shading and fast approximate self-shadowing.
//!
//! A [`Volume`] covers the asset's bounding box with a regular grid; each
//! voxel holds a saturating 8-bit density counter and the quantized mean
//! tangent of the strands passing through it. Two rasterization passes are
//! available:
//!
//! - [`Volume::from_vertices`]: splats every vertex into its voxel
//! - [`Volume::from_segments`]: walks every line segment through the grid
//!   with a fixed-step DDA
//!
//! Once built, a `Volume` is an immutable value, independent of the asset
//! it came from - upload it, save it, or drop it freely.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod volume;
pub mod voxelize;

pub use volume::{GridResolution, Volume};
