//! # The Hair Asset
//!
//! [`HairStyle`] owns the strand-major attribute arrays and the file
//! header. The arrays are authoritative: counts and presence bits in the
//! header are regenerated from them before every save, and every accessor
//! answers from the live arrays first.
//!
//! ## Ownership
//!
//! A `HairStyle` is exclusively owned by its caller; every mutating
//! operation takes `&mut self`, so reduction and derivation can never race.
//! Derived artifacts (volumes, GPU buffers) are produced from `&self` and
//! live independently of the asset.

use tress_core::math::{Aabb, Vec3};
use tress_core::sampler::StrandSampler;

use rand::Rng;

use crate::error::HairError;
use crate::format::{AttributeFlags, FileHeader, INFO_FIELD_SIZE};

/// A hair-strand geometry asset.
///
/// Attribute arrays are parallel and strand-major: all vertices of strand 0
/// come first, then strand 1, and so on. Any present per-vertex array has
/// exactly one element per vertex; the segment array has one element per
/// strand; the index array has one `(root, tip)` pair per segment.
#[derive(Clone, Debug)]
pub struct HairStyle {
    pub(crate) header: FileHeader,
    pub(crate) segments: Vec<u16>,
    pub(crate) vertices: Vec<Vec3>,
    pub(crate) thickness: Vec<f32>,
    pub(crate) transparency: Vec<f32>,
    pub(crate) color: Vec<Vec3>,
    pub(crate) tangents: Vec<Vec3>,
    pub(crate) indices: Vec<u32>,
    pub(crate) control_points: Vec<u32>,
    /// Outcome of the most recent codec operation. Diagnostic only, never
    /// persisted.
    pub(crate) last_error: Option<HairError>,
    /// Drives every reduction draw; see [`HairStyle::set_seed`].
    pub(crate) sampler: StrandSampler,
}

impl HairStyle {
    /// Creates an empty asset with a freshly drawn sampler seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().gen())
    }

    /// Creates an empty asset with the given sampler seed.
    ///
    /// Reductions of equal assets with equal seeds are bit-identical, so
    /// this is the constructor deterministic tooling and tests want.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            header: FileHeader::new(),
            segments: Vec::new(),
            vertices: Vec::new(),
            thickness: Vec::new(),
            transparency: Vec::new(),
            color: Vec::new(),
            tangents: Vec::new(),
            indices: Vec::new(),
            control_points: Vec::new(),
            last_error: None,
            sampler: StrandSampler::new(seed),
        }
    }

    /// Loads an asset from a `.hair` file.
    ///
    /// The asset receives a freshly drawn sampler seed.
    ///
    /// # Errors
    ///
    /// Returns the first codec error encountered; see [`HairStyle::load`].
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, HairError> {
        let mut style = Self::new();
        style.load(path)?;
        Ok(style)
    }

    // ------------------------------------------------------------------
    // Counts and presence
    // ------------------------------------------------------------------

    /// Number of strands.
    ///
    /// The segment array is authoritative when present; otherwise the
    /// header's strand count is used (every strand then has
    /// [`HairStyle::default_segment_count`] segments).
    #[inline]
    #[must_use]
    pub fn strand_count(&self) -> u32 {
        if self.segments.is_empty() {
            self.header.strand_count
        } else {
            self.segments.len() as u32
        }
    }

    /// Number of vertices across all strands.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Total number of segments: one less than the vertex count per strand.
    ///
    /// Saturates at zero instead of wrapping when the asset is in a
    /// half-built state (e.g. a header strand count without vertices).
    #[inline]
    #[must_use]
    pub fn segment_count(&self) -> u32 {
        self.vertex_count().saturating_sub(self.strand_count())
    }

    /// True if an explicit per-strand segment array is present.
    #[inline]
    #[must_use]
    pub fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    /// True if vertex positions are present.
    #[inline]
    #[must_use]
    pub fn has_vertices(&self) -> bool {
        !self.vertices.is_empty()
    }

    /// True if per-vertex thickness is present.
    #[inline]
    #[must_use]
    pub fn has_thickness(&self) -> bool {
        !self.thickness.is_empty()
    }

    /// True if per-vertex transparency is present.
    #[inline]
    #[must_use]
    pub fn has_transparency(&self) -> bool {
        !self.transparency.is_empty()
    }

    /// True if per-vertex color is present.
    #[inline]
    #[must_use]
    pub fn has_color(&self) -> bool {
        !self.color.is_empty()
    }

    /// True if per-vertex tangents are present.
    #[inline]
    #[must_use]
    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty()
    }

    /// True if line indices are present.
    #[inline]
    #[must_use]
    pub fn has_indices(&self) -> bool {
        !self.indices.is_empty()
    }

    /// True if the header carries a generated (trustworthy) bounding box.
    #[inline]
    #[must_use]
    pub fn has_bounding_box(&self) -> bool {
        self.header.flags.contains(AttributeFlags::BOUNDING_BOX)
    }

    // ------------------------------------------------------------------
    // Array accessors and setters
    // ------------------------------------------------------------------

    /// Per-strand segment counts.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[u16] {
        &self.segments
    }

    /// Per-vertex positions, strand-major.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Per-vertex thickness.
    #[inline]
    #[must_use]
    pub fn thickness(&self) -> &[f32] {
        &self.thickness
    }

    /// Per-vertex transparency.
    #[inline]
    #[must_use]
    pub fn transparency(&self) -> &[f32] {
        &self.transparency
    }

    /// Per-vertex RGB color.
    #[inline]
    #[must_use]
    pub fn color(&self) -> &[Vec3] {
        &self.color
    }

    /// Per-vertex unit tangents.
    #[inline]
    #[must_use]
    pub fn tangents(&self) -> &[Vec3] {
        &self.tangents
    }

    /// Flat pair-wise line indices, one `(root, tip)` pair per segment.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Replaces the segment array.
    pub fn set_segments(&mut self, segments: Vec<u16>) {
        self.segments = segments;
    }

    /// Replaces the vertex array.
    pub fn set_vertices(&mut self, vertices: Vec<Vec3>) {
        self.vertices = vertices;
    }

    /// Replaces the thickness array.
    pub fn set_thickness(&mut self, thickness: Vec<f32>) {
        self.thickness = thickness;
    }

    /// Replaces the transparency array.
    pub fn set_transparency(&mut self, transparency: Vec<f32>) {
        self.transparency = transparency;
    }

    /// Replaces the color array.
    pub fn set_color(&mut self, color: Vec<Vec3>) {
        self.color = color;
    }

    /// Replaces the tangent array.
    pub fn set_tangents(&mut self, tangents: Vec<Vec3>) {
        self.tangents = tangents;
    }

    // ------------------------------------------------------------------
    // Header fields
    // ------------------------------------------------------------------

    /// Overrides the header strand count.
    ///
    /// Only meaningful for assets without an explicit segment array.
    pub fn set_strand_count(&mut self, strand_count: u32) {
        self.header.strand_count = strand_count;
    }

    /// Segment count used by every strand when no segment array exists.
    #[inline]
    #[must_use]
    pub fn default_segment_count(&self) -> u32 {
        self.header.default_segment_count
    }

    /// Sets the default per-strand segment count.
    pub fn set_default_segment_count(&mut self, default_segment_count: u32) {
        self.header.default_segment_count = default_segment_count;
    }

    /// Thickness used for vertices when no thickness array exists.
    #[inline]
    #[must_use]
    pub fn default_thickness(&self) -> f32 {
        self.header.default_thickness
    }

    /// Sets the default thickness.
    pub fn set_default_thickness(&mut self, default_thickness: f32) {
        self.header.default_thickness = default_thickness;
    }

    /// Transparency used for vertices when no transparency array exists.
    #[inline]
    #[must_use]
    pub fn default_transparency(&self) -> f32 {
        self.header.default_transparency
    }

    /// Sets the default transparency.
    pub fn set_default_transparency(&mut self, default_transparency: f32) {
        self.header.default_transparency = default_transparency;
    }

    /// Color used for vertices when no color array exists.
    #[inline]
    #[must_use]
    pub fn default_color(&self) -> Vec3 {
        Vec3::from_array(self.header.default_color)
    }

    /// Sets the default color.
    pub fn set_default_color(&mut self, default_color: Vec3) {
        self.header.default_color = default_color.to_array();
    }

    /// The header's free-text information field, up to the first NUL.
    #[must_use]
    pub fn information(&self) -> String {
        let text = &self.header.information;
        let len = text.iter().position(|&b| b == 0).unwrap_or(text.len());
        String::from_utf8_lossy(&text[..len]).into_owned()
    }

    /// Replaces the information field, truncating to its fixed byte length
    /// and NUL-padding the remainder.
    pub fn set_information(&mut self, information: &str) {
        self.header.information = [0; INFO_FIELD_SIZE];
        let bytes = information.as_bytes();
        let copy_len = bytes.len().min(INFO_FIELD_SIZE);
        self.header.information[..copy_len].copy_from_slice(&bytes[..copy_len]);
    }

    /// Overwrites the stored bounding-box corners and sets the trust bit.
    ///
    /// For boxes computed from the vertex data prefer
    /// [`HairStyle::generate_bounding_box`]; this setter exists for callers
    /// that already know the bounds (e.g. an authoring tool).
    pub fn set_bounding_box(&mut self, min: Vec3, max: Vec3) {
        self.header.bounding_box_min = min.to_array();
        self.header.bounding_box_max = max.to_array();
        self.header.flags.set(AttributeFlags::BOUNDING_BOX, true);
    }

    /// The generated bounding box as origin + size.
    ///
    /// Only meaningful after [`HairStyle::generate_bounding_box`] has run
    /// (or a loaded file carried a generated box); check
    /// [`HairStyle::has_bounding_box`] before trusting the result.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_min_max(
            Vec3::from_array(self.header.bounding_box_min),
            Vec3::from_array(self.header.bounding_box_max),
        )
    }

    // ------------------------------------------------------------------
    // Sampler seed
    // ------------------------------------------------------------------

    /// The current sampler state driving reduction draws.
    #[inline]
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.sampler.state()
    }

    /// Reseeds the reduction sampler.
    pub fn set_seed(&mut self, seed: u64) {
        self.sampler = StrandSampler::new(seed);
    }

    // ------------------------------------------------------------------
    // Diagnostics and validation
    // ------------------------------------------------------------------

    /// Outcome of the most recent load or save: `None` after success.
    #[inline]
    #[must_use]
    pub fn last_error(&self) -> Option<&HairError> {
        self.last_error.as_ref()
    }

    /// Structural validity of the in-memory asset.
    ///
    /// Requires vertices, a valid header signature, every present
    /// per-vertex array matching the vertex count, and a present index
    /// array matching two entries per segment.
    #[must_use]
    pub fn format_is_valid(&self) -> bool {
        if !self.has_vertices() {
            return false;
        }
        if !self.header.has_valid_signature() {
            return false;
        }
        let vertex_count = self.vertices.len();
        if self.has_thickness() && self.thickness.len() != vertex_count {
            return false;
        }
        if self.has_transparency() && self.transparency.len() != vertex_count {
            return false;
        }
        if self.has_color() && self.color.len() != vertex_count {
            return false;
        }
        if self.has_tangents() && self.tangents.len() != vertex_count {
            return false;
        }
        if self.has_indices() && self.indices.len() != self.segment_count() as usize * 2 {
            return false;
        }
        true
    }

    /// Total in-memory payload size in bytes, header included.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        std::mem::size_of::<FileHeader>()
            + std::mem::size_of_val(self.segments.as_slice())
            + std::mem::size_of_val(self.vertices.as_slice())
            + std::mem::size_of_val(self.thickness.as_slice())
            + std::mem::size_of_val(self.transparency.as_slice())
            + std::mem::size_of_val(self.color.as_slice())
            + std::mem::size_of_val(self.tangents.as_slice())
            + std::mem::size_of_val(self.indices.as_slice())
    }

    /// Rewrites the header's derived fields from the live arrays.
    ///
    /// Sets the signature, resynchronizes the presence bits (preserving the
    /// bounding-box bit, zeroing reserved bits) and refreshes both counts.
    /// [`HairStyle::save`] calls this before trusting the header.
    pub fn complete_header(&mut self) {
        self.header.signature = crate::format::HAIR_SIGNATURE;

        self.header.flags.set(AttributeFlags::SEGMENTS, self.has_segments());
        self.header.flags.set(AttributeFlags::VERTICES, self.has_vertices());
        self.header.flags.set(AttributeFlags::THICKNESS, self.has_thickness());
        self.header.flags.set(AttributeFlags::TRANSPARENCY, self.has_transparency());
        self.header.flags.set(AttributeFlags::COLOR, self.has_color());
        self.header.flags.set(AttributeFlags::TANGENTS, self.has_tangents());
        self.header.flags.set(AttributeFlags::INDICES, self.has_indices());
        self.header.flags.clear_reserved();

        self.header.strand_count = self.strand_count();
        self.header.vertex_count = self.vertex_count();
    }

    /// Segment count of one strand, from the segment array or the default.
    #[inline]
    pub(crate) fn strand_segment_count(&self, strand: usize) -> u32 {
        if self.has_segments() {
            u32::from(self.segments[strand])
        } else {
            self.default_segment_count()
        }
    }
}

impl Default for HairStyle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_strand_style() -> HairStyle {
        // Strand 0: segments [2] -> 3 vertices; strand 1: [1] -> 2 vertices.
        let mut style = HairStyle::with_seed(99);
        style.set_segments(vec![2, 1]);
        style.set_vertices(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ]);
        style
    }

    #[test]
    fn test_counts_follow_live_arrays() {
        let style = two_strand_style();
        assert_eq!(style.strand_count(), 2);
        assert_eq!(style.vertex_count(), 5);
        assert_eq!(style.segment_count(), 3);
    }

    #[test]
    fn test_counts_fall_back_to_header() {
        let mut style = HairStyle::with_seed(1);
        style.set_strand_count(7);
        style.set_default_segment_count(4);
        assert_eq!(style.strand_count(), 7, "Header count used without segments");
        assert_eq!(style.segment_count(), 0, "Saturates without vertices");
    }

    #[test]
    fn test_format_validation_catches_length_mismatch() {
        let mut style = two_strand_style();
        assert!(style.format_is_valid());

        style.set_thickness(vec![0.1; 4]); // 5 vertices, 4 thickness entries
        assert!(!style.format_is_valid());

        style.set_thickness(vec![0.1; 5]);
        assert!(style.format_is_valid());
    }

    #[test]
    fn test_format_validation_requires_vertices() {
        let style = HairStyle::with_seed(5);
        assert!(!style.format_is_valid());
    }

    #[test]
    fn test_complete_header_resyncs_presence_and_counts() {
        let mut style = two_strand_style();
        style.set_thickness(vec![0.05; 5]);
        style.complete_header();

        assert!(style.header.flags.contains(AttributeFlags::SEGMENTS));
        assert!(style.header.flags.contains(AttributeFlags::VERTICES));
        assert!(style.header.flags.contains(AttributeFlags::THICKNESS));
        assert!(!style.header.flags.contains(AttributeFlags::COLOR));
        assert_eq!(style.header.strand_count, 2);
        assert_eq!(style.header.vertex_count, 5);
    }

    #[test]
    fn test_complete_header_preserves_bounding_box_bit() {
        let mut style = two_strand_style();
        style.generate_bounding_box();
        style.complete_header();
        assert!(style.has_bounding_box());
    }

    #[test]
    fn test_information_truncation_and_padding() {
        let mut style = HairStyle::with_seed(3);
        style.set_information("a ponytail scanned from life");
        assert_eq!(style.information(), "a ponytail scanned from life");

        let long = "x".repeat(INFO_FIELD_SIZE + 40);
        style.set_information(&long);
        assert_eq!(style.information().len(), INFO_FIELD_SIZE);

        style.set_information("short");
        assert_eq!(style.information(), "short", "Old bytes are NUL-padded away");
    }

    #[test]
    fn test_byte_size_counts_all_arrays() {
        let mut style = two_strand_style();
        let base = std::mem::size_of::<FileHeader>();
        assert_eq!(style.byte_size(), base + 2 * 2 + 5 * 12);

        style.set_thickness(vec![0.1; 5]);
        assert_eq!(style.byte_size(), base + 2 * 2 + 5 * 12 + 5 * 4);
    }

    #[test]
    fn test_seed_roundtrip() {
        let mut style = HairStyle::with_seed(0xABCD);
        assert_eq!(style.seed(), 0xABCD);
        style.set_seed(42);
        assert_eq!(style.seed(), 42);
    }
}
