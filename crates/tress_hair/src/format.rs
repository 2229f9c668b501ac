//! # The `.hair` Binary Format
//!
//! Fixed-layout header for hair-strand geometry files.
//!
//! ## File Structure
//!
//! ```text
//! .hair File Structure:
//! ├── "HAIR" (4 bytes)            - Signature
//! ├── strand_count (u32)
//! ├── vertex_count (u32)
//! ├── flags (u32)                 - Presence bitfield, see AttributeFlags
//! ├── default_segment_count (u32)
//! ├── default_thickness (f32)
//! ├── default_transparency (f32)
//! ├── default_color (f32 x 3)
//! ├── information ([u8; 88])      - Free text, NUL-padded
//! ├── bounding_box_min (f32 x 3)
//! ├── bounding_box_max (f32 x 3)
//! └── conditionally, in this order:
//!     segments     [u16      x strand_count]
//!     vertices     [f32 x 3  x vertex_count]
//!     thickness    [f32      x vertex_count]
//!     transparency [f32      x vertex_count]
//!     color        [f32 x 3  x vertex_count]
//!     tangents     [f32 x 3  x vertex_count]
//!     indices      [u32 x 2  x segment_count]
//! ```
//!
//! Each array is stored as one contiguous block with no per-element
//! framing. The header is 152 bytes with no interior padding, so it moves
//! to and from disk as a single Pod block.

use bytemuck::{Pod, Zeroable};

/// The four signature bytes every `.hair` file starts with.
pub const HAIR_SIGNATURE: [u8; 4] = *b"HAIR";

/// Byte length of the free-text information field.
pub const INFO_FIELD_SIZE: usize = 88;

/// Presence bitfield of the file header.
///
/// The low seven bits mark which attribute arrays are physically stored in
/// the file. Bit 7 is different in kind: it records that the stored
/// bounding-box corners were actually generated and can be trusted. The
/// remaining bits are reserved for future extension and are forced to zero
/// whenever the bitfield is resynchronized from the live arrays.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct AttributeFlags(u32);

impl AttributeFlags {
    /// Per-strand segment counts are stored.
    pub const SEGMENTS: u32 = 1 << 0;
    /// Per-vertex positions are stored.
    pub const VERTICES: u32 = 1 << 1;
    /// Per-vertex thickness is stored.
    pub const THICKNESS: u32 = 1 << 2;
    /// Per-vertex transparency is stored.
    pub const TRANSPARENCY: u32 = 1 << 3;
    /// Per-vertex color is stored.
    pub const COLOR: u32 = 1 << 4;
    /// Per-vertex tangents are stored.
    pub const TANGENTS: u32 = 1 << 5;
    /// Pair-wise line indices are stored.
    pub const INDICES: u32 = 1 << 6;
    /// The stored bounding box was generated and is trustworthy.
    pub const BOUNDING_BOX: u32 = 1 << 7;

    /// Mask of every defined bit; everything above is future extension.
    const DEFINED: u32 = 0xFF;

    /// Creates an empty bitfield.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns true if the given bit is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, bit: u32) -> bool {
        self.0 & bit != 0
    }

    /// Sets or clears the given bit.
    #[inline]
    pub fn set(&mut self, bit: u32, on: bool) {
        if on {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }

    /// Clears every reserved (future-extension) bit.
    #[inline]
    pub fn clear_reserved(&mut self) {
        self.0 &= Self::DEFINED;
    }

    /// Returns the raw bitfield value.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// The fixed-layout `.hair` file header.
///
/// The header's derived fields (signature, counts, presence bits) are
/// regenerated from the live arrays immediately before serialization; only
/// the defaults, the information text and a generated bounding box carry
/// authored state.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FileHeader {
    /// Must equal [`HAIR_SIGNATURE`] before any other field is trusted.
    pub signature: [u8; 4],
    /// Number of strands; authoritative only when no segment array exists.
    pub strand_count: u32,
    /// Number of vertices across all strands.
    pub vertex_count: u32,
    /// Presence bitfield, see [`AttributeFlags`].
    pub flags: AttributeFlags,
    /// Segment count used by every strand when no segment array exists.
    pub default_segment_count: u32,
    /// Thickness used when no thickness array exists.
    pub default_thickness: f32,
    /// Transparency used when no transparency array exists.
    pub default_transparency: f32,
    /// RGB color used when no color array exists.
    pub default_color: [f32; 3],
    /// Free-text description, NUL-padded.
    pub information: [u8; INFO_FIELD_SIZE],
    /// Minimum corner of the generated bounding box.
    pub bounding_box_min: [f32; 3],
    /// Maximum corner of the generated bounding box.
    pub bounding_box_max: [f32; 3],
}

impl FileHeader {
    /// Creates a zeroed header carrying a valid signature.
    #[must_use]
    pub fn new() -> Self {
        Self {
            signature: HAIR_SIGNATURE,
            ..Zeroable::zeroed()
        }
    }

    /// Returns true if the signature bytes spell "HAIR".
    #[inline]
    #[must_use]
    pub fn has_valid_signature(&self) -> bool {
        self.signature == HAIR_SIGNATURE
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_152_bytes() {
        // 40 bytes of counts/defaults + 88 info + 24 bounding box.
        assert_eq!(std::mem::size_of::<FileHeader>(), 152);
    }

    #[test]
    fn test_header_roundtrips_as_pod_block() {
        let mut header = FileHeader::new();
        header.strand_count = 3;
        header.vertex_count = 12;
        header.default_thickness = 0.1;
        header.flags.set(AttributeFlags::VERTICES, true);

        let bytes = bytemuck::bytes_of(&header).to_vec();
        let restored: FileHeader = bytemuck::pod_read_unaligned(&bytes);

        assert_eq!(restored.strand_count, 3);
        assert_eq!(restored.vertex_count, 12);
        assert_eq!(restored.default_thickness, 0.1);
        assert!(restored.flags.contains(AttributeFlags::VERTICES));
        assert!(restored.has_valid_signature());
    }

    #[test]
    fn test_signature_validation() {
        let mut header = FileHeader::new();
        assert!(header.has_valid_signature());

        header.signature = *b"HALR";
        assert!(!header.has_valid_signature());
    }

    #[test]
    fn test_flag_operations() {
        let mut flags = AttributeFlags::empty();
        assert!(!flags.contains(AttributeFlags::TANGENTS));

        flags.set(AttributeFlags::TANGENTS, true);
        flags.set(AttributeFlags::BOUNDING_BOX, true);
        assert!(flags.contains(AttributeFlags::TANGENTS));
        assert!(flags.contains(AttributeFlags::BOUNDING_BOX));

        flags.set(AttributeFlags::TANGENTS, false);
        assert!(!flags.contains(AttributeFlags::TANGENTS));
        assert!(flags.contains(AttributeFlags::BOUNDING_BOX));
    }

    #[test]
    fn test_reserved_bits_are_cleared() {
        let mut flags = AttributeFlags(0xDEAD_BE00 | AttributeFlags::COLOR);
        flags.clear_reserved();
        assert_eq!(flags.bits(), AttributeFlags::COLOR);
    }
}
