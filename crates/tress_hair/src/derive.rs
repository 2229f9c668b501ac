//! # Procedural Attribute Derivation
//!
//! Fills the gaps a `.hair` file leaves: tangents, line indices, tapered
//! thickness, the bounding box, and ray-tracer curve connectivity.
//!
//! These are derivations over already-loaded data. They assume consistent
//! array lengths and do not re-validate; violating a precondition panics on
//! an out-of-range index rather than corrupting silently. There is no
//! error channel here by design - run [`HairStyle::format_is_valid`] first
//! if the asset's provenance is doubtful.

use tress_core::math::Vec3;

use crate::format::AttributeFlags;
use crate::interop::CurveTopology;
use crate::style::HairStyle;

impl HairStyle {
    /// Overwrites the thickness array with a uniform radius that tapers to
    /// a point: every vertex gets `radius`, each strand's tip gets zero.
    pub fn generate_thickness(&mut self, radius: f32) {
        self.thickness.clear();
        self.thickness.reserve(self.vertex_count() as usize);

        for strand in 0..self.strand_count() as usize {
            let segment_count = self.strand_segment_count(strand);

            for _ in 0..segment_count {
                self.thickness.push(radius);
            }

            self.thickness.push(0.0);
        }
    }

    /// Overwrites the tangent array with normalized forward differences.
    ///
    /// For every vertex but a strand's last, `tangent[i]` points from
    /// `vertex[i]` to `vertex[i + 1]`. The tip has no forward neighbor, so
    /// its tangent duplicates the previous vertex's.
    ///
    /// # Panics
    ///
    /// Panics if the vertex array is shorter than the segment layout
    /// implies, or if a strand has zero segments (no tangent to duplicate).
    pub fn generate_tangents(&mut self) {
        self.tangents.clear();
        self.tangents.reserve(self.vertex_count() as usize);

        let mut vertex = 0;

        for strand in 0..self.strand_count() as usize {
            let segment_count = self.strand_segment_count(strand);

            for _ in 0..segment_count {
                let tangent = self.vertices[vertex + 1] - self.vertices[vertex];
                self.tangents.push(tangent.normalized());
                vertex += 1;
            }

            // The tip derives its tangent from the previous vertex.
            let duplicate = self.tangents[self.tangents.len() - 1];
            self.tangents.push(duplicate);
            vertex += 1;
        }
    }

    /// Overwrites the index array with one `(start, start + 1)` pair per
    /// segment, advancing a running vertex cursor.
    ///
    /// A strand's tip vertex is consumed as a pair's endpoint but never
    /// starts a new pair; the cursor skips past it between strands.
    pub fn generate_indices(&mut self) {
        self.indices.clear();
        self.indices.reserve(self.segment_count() as usize * 2);

        let mut vertex: u32 = 0;

        for strand in 0..self.strand_count() as usize {
            let segment_count = self.strand_segment_count(strand);

            for _ in 0..segment_count {
                self.indices.push(vertex);
                self.indices.push(vertex + 1);
                vertex += 1;
            }

            vertex += 1; // Skips the tip.
        }
    }

    /// Scans the vertices and stores their component-wise min/max in the
    /// header, then sets the bounding-box trust bit.
    ///
    /// The scan starts from the origin as both initial corners, so a cloud
    /// living entirely in one octant keeps the box anchored at `(0,0,0)`.
    /// This matches the established asset convention; consumers that need
    /// a tight box around off-origin geometry should re-center first.
    pub fn generate_bounding_box(&mut self) {
        let mut min_aabb = Vec3::ZERO;
        let mut max_aabb = Vec3::ZERO;

        for &position in &self.vertices {
            min_aabb = min_aabb.min(position);
            max_aabb = max_aabb.max(position);
        }

        self.header.bounding_box_min = min_aabb.to_array();
        self.header.bounding_box_max = max_aabb.to_array();

        self.header.flags.set(AttributeFlags::BOUNDING_BOX, true);
    }

    /// Rebuilds the flat control-point list for the given curve topology.
    ///
    /// For [`CurveTopology::Line`] this is one `u32` per segment - the
    /// segment's root vertex index - which a ray tracer consumes directly
    /// as flat-linear-curve connectivity against the position+thickness
    /// buffer.
    pub fn generate_control_points(&mut self, topology: CurveTopology) {
        match topology {
            CurveTopology::Line => {
                self.control_points.clear();
                self.control_points.reserve(self.segment_count() as usize);

                let mut vertex: u32 = 0;

                for strand in 0..self.strand_count() as usize {
                    let segment_count = self.strand_segment_count(strand);

                    for _ in 0..segment_count {
                        self.control_points.push(vertex);
                        vertex += 1;
                    }

                    vertex += 1; // The tip never roots a curve primitive.
                }
            }
        }
    }

    /// The control points generated by the last
    /// [`HairStyle::generate_control_points`] call.
    #[inline]
    #[must_use]
    pub fn control_points(&self) -> &[u32] {
        &self.control_points
    }
}
