//! # Renderer Interop
//!
//! Interleaved, GPU-ready vertex buffers for the rasterizer and the curve
//! topology consumed by the ray tracer.
//!
//! Each builder is an independent per-vertex map with no shared mutable
//! state, so the loops run as rayon parallel iterators; iteration order is
//! irrelevant to the result. Missing optional attributes fall back to the
//! header's defaults per vertex, so consumers always receive fully
//! populated buffers.

use rayon::prelude::*;

use tress_core::math::Vec4;

use crate::style::HairStyle;

/// Curve topologies a ray tracer can request connectivity for.
///
/// Only line topology is currently defined; the segment index pairs map
/// directly onto flat linear curve primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveTopology {
    /// Straight segments between consecutive vertices.
    Line,
}

impl HairStyle {
    /// Builds the interleaved position + thickness buffer.
    ///
    /// Lane `w` carries the per-vertex thickness, or the header's default
    /// thickness when no thickness array is present.
    #[must_use]
    pub fn position_thickness_buffer(&self) -> Vec<Vec4> {
        (0..self.vertex_count() as usize)
            .into_par_iter()
            .map(|i| {
                let thickness = if self.has_thickness() {
                    self.thickness[i]
                } else {
                    self.default_thickness()
                };
                Vec4::from_vec3(self.vertices[i], thickness)
            })
            .collect()
    }

    /// Builds the interleaved tangent + transparency buffer.
    ///
    /// Lane `w` carries the per-vertex transparency, or the header's
    /// default when no transparency array is present.
    ///
    /// # Panics
    ///
    /// Panics if tangents have not been loaded or generated.
    #[must_use]
    pub fn tangent_transparency_buffer(&self) -> Vec<Vec4> {
        (0..self.vertex_count() as usize)
            .into_par_iter()
            .map(|i| {
                let transparency = if self.has_transparency() {
                    self.transparency[i]
                } else {
                    self.default_transparency()
                };
                Vec4::from_vec3(self.tangents[i], transparency)
            })
            .collect()
    }

    /// Builds the interleaved color + transparency buffer.
    ///
    /// Both attributes fall back to the header defaults when absent.
    #[must_use]
    pub fn color_transparency_buffer(&self) -> Vec<Vec4> {
        (0..self.vertex_count() as usize)
            .into_par_iter()
            .map(|i| {
                let transparency = if self.has_transparency() {
                    self.transparency[i]
                } else {
                    self.default_transparency()
                };
                let color = if self.has_color() {
                    self.color[i]
                } else {
                    self.default_color()
                };
                Vec4::from_vec3(color, transparency)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tress_core::math::Vec3;

    fn style_with_defaults() -> HairStyle {
        let mut style = HairStyle::with_seed(8);
        style.set_segments(vec![1]);
        style.set_vertices(vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)]);
        style.set_default_thickness(0.042);
        style.set_default_transparency(0.8);
        style.set_default_color(Vec3::new(0.3, 0.2, 0.1));
        style
    }

    #[test]
    fn test_position_thickness_defaults() {
        let style = style_with_defaults();
        let buffer = style.position_thickness_buffer();

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer[1].to_array(), [0.0, 1.0, 0.0, 0.042]);
    }

    #[test]
    fn test_position_thickness_prefers_array() {
        let mut style = style_with_defaults();
        style.set_thickness(vec![0.5, 0.0]);
        let buffer = style.position_thickness_buffer();

        assert_eq!(buffer[0].w, 0.5);
        assert_eq!(buffer[1].w, 0.0);
    }

    #[test]
    fn test_tangent_transparency_defaults() {
        let mut style = style_with_defaults();
        style.generate_tangents();
        let buffer = style.tangent_transparency_buffer();

        assert_eq!(buffer[0].to_array(), [0.0, 1.0, 0.0, 0.8]);
        assert_eq!(buffer[1].to_array(), [0.0, 1.0, 0.0, 0.8]);
    }

    #[test]
    fn test_color_transparency_defaults_and_overrides() {
        let mut style = style_with_defaults();
        let defaulted = style.color_transparency_buffer();
        assert_eq!(defaulted[0].to_array(), [0.3, 0.2, 0.1, 0.8]);

        style.set_color(vec![Vec3::new(1.0, 0.0, 0.0); 2]);
        style.set_transparency(vec![0.1, 0.2]);
        let explicit = style.color_transparency_buffer();
        assert_eq!(explicit[0].to_array(), [1.0, 0.0, 0.0, 0.1]);
        assert_eq!(explicit[1].to_array(), [1.0, 0.0, 0.0, 0.2]);
    }
}
