//! # TRESS Core
//!
//! Shared foundations for the hair-asset pipeline.
//!
//! ## Core Components
//!
//! - [`math`]: `Vec3`/`Vec4`/`I8Vec4`/`Aabb` value types. All of them are
//!   `#[repr(C)]` Pod so attribute arrays and voxel grids can be moved to
//!   and from disk (or a GPU) as raw byte blocks.
//! - [`sampler`]: the xorshift64 strand sampler. Level-of-detail reduction
//!   draws every random strand index through this generator, never through
//!   a platform RNG, so a reduction is reproducible from its seed alone.
//!
//! ## Determinism Guarantee
//!
//! Given the same seed, [`StrandSampler`] produces **exactly** the same
//! draw sequence on any platform, any time.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod math;
pub mod sampler;

pub use math::{Aabb, I8Vec4, Vec3, Vec4};
pub use sampler::StrandSampler;
