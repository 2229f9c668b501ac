//! # Strand-Level LOD Reduction
//!
//! Down-samples a hair style by whole strands - never partial ones - so
//! every surviving strand keeps a consistent slice of every per-vertex
//! attribute.
//!
//! ## Determinism
//!
//! Draws come exclusively from the asset's [`StrandSampler`]: same seed +
//! same starting state = bit-identical reduction, ALWAYS. The candidate
//! pool is an index arena shrunk by swap-with-last-and-pop; the swap order
//! decides which strand occupies which slot for later draws, so it is part
//! of the deterministic contract and must not be "cleaned up".
//!
//! [`StrandSampler`]: tress_core::sampler::StrandSampler

use tracing::debug;

use crate::style::HairStyle;

impl HairStyle {
    /// Down-samples the asset, removing `ceil(count * ratio)` of it.
    ///
    /// `ratio` is the fraction to *remove*: `reduce(0.0)` keeps every
    /// strand and `reduce(1.0)` empties the asset. Whole strands are drawn
    /// uniformly without replacement until the keep target is met; every
    /// present per-vertex attribute is rebuilt from the survivors and the
    /// line indices are regenerated from the new segment layout.
    ///
    /// Reducing an asset without an explicit segment array materializes
    /// one: each kept strand records the default segment count.
    pub fn reduce(&mut self, ratio: f32) {
        let strand_count = self.strand_count() as usize;
        let vertex_count = self.vertex_count() as usize;

        let mut strands_left =
            strand_count.saturating_sub((strand_count as f32 * ratio).ceil() as usize);
        let vertex_target =
            vertex_count.saturating_sub((vertex_count as f32 * ratio).ceil() as usize);

        let mut reduced_segments: Vec<u16> = Vec::with_capacity(strands_left);
        let mut reduced_vertices = Vec::with_capacity(vertex_target);
        let mut reduced_thickness =
            Vec::with_capacity(if self.has_thickness() { vertex_target } else { 0 });
        let mut reduced_tangents =
            Vec::with_capacity(if self.has_tangents() { vertex_target } else { 0 });
        let mut reduced_transparency =
            Vec::with_capacity(if self.has_transparency() { vertex_target } else { 0 });
        let mut reduced_color = Vec::with_capacity(if self.has_color() { vertex_target } else { 0 });

        // Starting vertex of every strand: a prefix sum over the segment
        // counts (+1 for the tip), or a uniform stride without segments.
        let mut strand_offset: Vec<usize> = Vec::with_capacity(strand_count);
        if self.has_segments() {
            let mut next = 0;
            for &segments in &self.segments {
                strand_offset.push(next);
                next += segments as usize + 1;
            }
        } else {
            let stride = self.default_segment_count() as usize + 1;
            strand_offset.extend((0..strand_count).map(|strand| strand * stride));
        }

        debug!(
            strands = strand_count,
            keeping = strands_left,
            ratio, "reducing hair style"
        );

        while strands_left > 0 && !strand_offset.is_empty() {
            strands_left -= 1;

            let chosen = self.sampler.pick_index(strand_offset.len());

            let segment_count = if self.has_segments() {
                let count = self.segments[chosen];
                self.segments.swap_remove(chosen);
                count
            } else {
                self.default_segment_count() as u16
            };

            reduced_segments.push(segment_count);

            let attribute_start = strand_offset[chosen];
            let attribute_end = attribute_start + segment_count as usize + 1;

            if self.has_vertices() {
                reduced_vertices.extend_from_slice(&self.vertices[attribute_start..attribute_end]);
            }
            if self.has_thickness() {
                reduced_thickness.extend_from_slice(&self.thickness[attribute_start..attribute_end]);
            }
            if self.has_tangents() {
                reduced_tangents.extend_from_slice(&self.tangents[attribute_start..attribute_end]);
            }
            if self.has_transparency() {
                reduced_transparency
                    .extend_from_slice(&self.transparency[attribute_start..attribute_end]);
            }
            if self.has_color() {
                reduced_color.extend_from_slice(&self.color[attribute_start..attribute_end]);
            }

            // Swap-then-truncate, in lock-step with the segment array.
            strand_offset.swap_remove(chosen);
        }

        self.segments = reduced_segments;
        self.vertices = reduced_vertices;

        self.generate_indices();

        self.thickness = reduced_thickness;
        self.tangents = reduced_tangents;
        self.transparency = reduced_transparency;
        self.color = reduced_color;
    }

    /// Alias for `reduce(1.0)`.
    ///
    /// The name is historical: a removal ratio of 1.0 empties the asset
    /// rather than shuffling strand order. Kept verbatim for compatibility
    /// with existing tooling; prefer calling [`HairStyle::reduce`] with an
    /// explicit ratio.
    pub fn shuffle(&mut self) {
        self.reduce(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tress_core::math::Vec3;

    /// Builds a style with `strands` strands of 2 segments (3 vertices)
    /// each, with distinguishable positions and full attributes.
    fn full_style(strands: u16, seed: u64) -> HairStyle {
        let mut style = HairStyle::with_seed(seed);
        let mut vertices = Vec::new();
        let mut color = Vec::new();
        for strand in 0..strands {
            for vertex in 0..3u16 {
                let x = f32::from(strand);
                let y = f32::from(vertex);
                vertices.push(Vec3::new(x, y, 0.0));
                color.push(Vec3::new(x / 10.0, 0.5, 0.5));
            }
        }
        style.set_segments(vec![2; strands as usize]);
        style.set_vertices(vertices);
        style.set_color(color);
        style.generate_thickness(0.1);
        style.generate_tangents();
        style.generate_indices();
        style
    }

    #[test]
    fn test_ratio_zero_keeps_everything() {
        // Two strands, segments [2, 1]: removal target ceil(2 * 0.0) = 0.
        let mut style = HairStyle::with_seed(123);
        style.set_segments(vec![2, 1]);
        style.set_vertices(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ]);
        let original_vertices = style.vertices().to_vec();

        style.reduce(0.0);

        assert_eq!(style.strand_count(), 2);
        assert_eq!(style.vertex_count(), 5);
        let mut survived: Vec<_> = style.vertices().to_vec();
        survived.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        let mut expected = original_vertices;
        expected.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        assert_eq!(survived, expected, "Every vertex survives, possibly reordered");
    }

    #[test]
    fn test_ratio_one_empties_the_asset() {
        let mut style = full_style(8, 7);
        style.shuffle();

        assert_eq!(style.strand_count(), 0);
        assert_eq!(style.vertex_count(), 0);
        assert!(style.indices().is_empty());
    }

    #[test]
    fn test_reduction_is_deterministic_per_seed() {
        let mut a = full_style(32, 0xFEED);
        let mut b = a.clone();

        a.reduce(0.5);
        b.reduce(0.5);

        assert_eq!(a.segments(), b.segments());
        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.thickness(), b.thickness());
        assert_eq!(a.tangents(), b.tangents());
        assert_eq!(a.color(), b.color());
        assert_eq!(a.indices(), b.indices());
    }

    #[test]
    fn test_different_seeds_pick_different_subsets() {
        let mut a = full_style(32, 1);
        let mut b = full_style(32, 2);

        a.reduce(0.5);
        b.reduce(0.5);

        assert_eq!(a.strand_count(), b.strand_count(), "Same target size");
        assert_ne!(a.vertices(), b.vertices(), "Different strand subsets");
    }

    #[test]
    fn test_reduction_keeps_attribute_slices_aligned() {
        let mut style = full_style(16, 99);
        style.reduce(0.25);

        let vertex_count = style.vertex_count() as usize;
        assert_eq!(style.thickness().len(), vertex_count);
        assert_eq!(style.tangents().len(), vertex_count);
        assert_eq!(style.color().len(), vertex_count);
        assert_eq!(style.indices().len(), style.segment_count() as usize * 2);
        assert!(style.format_is_valid());

        // Each surviving strand's vertices still share one x coordinate
        // (their strand id), proving whole-strand copies.
        for strand in style.vertices().chunks_exact(3) {
            assert_eq!(strand[0].x, strand[1].x);
            assert_eq!(strand[1].x, strand[2].x);
        }
    }

    #[test]
    fn test_reduction_materializes_segments_from_default() {
        let mut style = HairStyle::with_seed(5);
        style.set_strand_count(4);
        style.set_default_segment_count(2);
        style.set_vertices(vec![Vec3::ZERO; 12]);

        style.reduce(0.5);

        assert!(style.has_segments(), "Reduction materializes a segment array");
        assert_eq!(style.segments(), &[2, 2]);
        assert_eq!(style.vertex_count(), 6);
    }

    #[test]
    fn test_reduction_target_arithmetic() {
        // 10 strands at ratio 0.34: remove ceil(3.4) = 4, keep 6.
        let mut style = full_style(10, 77);
        style.reduce(0.34);
        assert_eq!(style.strand_count(), 6);
    }
}
