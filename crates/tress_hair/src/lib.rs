//! # TRESS Hair
//!
//! The hair-strand asset at the center of the pipeline.
//!
//! A [`HairStyle`] owns parallel, strand-major attribute arrays: per-strand
//! segment counts and per-vertex positions, thickness, transparency, color
//! and tangents, plus flat pair-wise line indices. Assets are loaded from
//! and saved to the binary `.hair` format, enriched by procedural
//! derivation where the file left gaps, down-sampled deterministically for
//! level of detail, and finally handed to renderer collaborators as
//! interleaved GPU buffers or curve connectivity.
//!
//! ## Core Components
//!
//! - [`format`]: the fixed 152-byte file header and its presence bitfield
//! - [`HairStyle`]: the asset, its accessors and structural validation
//! - codec: [`HairStyle::load`] / [`HairStyle::save`]
//! - derivation: `generate_*` methods filling absent attributes
//! - reduction: [`HairStyle::reduce`] / [`HairStyle::shuffle`]
//! - interop: `*_buffer` builders and line-curve control points
//!
//! ## Example
//!
//! ```rust,ignore
//! use tress_hair::HairStyle;
//!
//! let mut style = HairStyle::open("ponytail.hair")?;
//! if !style.has_tangents() {
//!     style.generate_tangents();
//! }
//! style.reduce(0.5); // keep half of the strands
//! let vertices = style.position_thickness_buffer();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod codec;
pub mod derive;
pub mod error;
pub mod format;
pub mod interop;
pub mod reduce;
pub mod style;

pub use error::{HairError, HairField};
pub use format::{AttributeFlags, FileHeader, HAIR_SIGNATURE, INFO_FIELD_SIZE};
pub use interop::CurveTopology;
pub use style::HairStyle;
