//! # The `.hair` Codec
//!
//! Loads and saves [`HairStyle`] assets in the binary `.hair` format.
//!
//! The header travels as a single Pod block; each attribute array follows
//! conditionally (per its presence bit) as one contiguous block sized
//! `element_count * element_size` with no per-element framing. Reads and
//! writes are strictly sequential - the layout is order-sensitive.
//!
//! Both operations record their outcome in the asset's last-error state
//! (cleared to `None` on success) in addition to returning it, so callers
//! can branch on the `Result` while diagnostics query the asset later.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use tracing::info;

use crate::error::{HairError, HairField};
use crate::format::{AttributeFlags, FileHeader};
use crate::style::HairStyle;

impl HairStyle {
    /// Reads the asset from a `.hair` file, replacing the current contents.
    ///
    /// Arrays populated before a mid-file failure are kept as-is; callers
    /// must treat the asset as unusable unless `Ok` is returned.
    ///
    /// # Errors
    ///
    /// [`HairError::OpeningFile`] if the file cannot be opened,
    /// [`HairError::ReadingHeader`] on a short header,
    /// [`HairError::InvalidSignature`] if the magic bytes are wrong,
    /// [`HairError::ReadingField`] on a short attribute array, and
    /// [`HairError::InvalidFormat`] if the loaded arrays are structurally
    /// inconsistent.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), HairError> {
        let outcome = self.load_from(path.as_ref());
        self.last_error = outcome.as_ref().err().cloned();
        outcome
    }

    /// Writes the asset to a `.hair` file.
    ///
    /// The header's derived fields are regenerated from the live arrays
    /// first, so a stale header can never reach disk.
    ///
    /// # Errors
    ///
    /// [`HairError::InvalidFormat`] if the arrays fail the pre-save
    /// structural check, [`HairError::OpeningFile`] if the file cannot be
    /// created, [`HairError::WritingHeader`] / [`HairError::WritingField`]
    /// on short writes.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), HairError> {
        self.complete_header();
        let outcome = self.save_to(path.as_ref());
        self.last_error = outcome.as_ref().err().cloned();
        outcome
    }

    fn load_from(&mut self, path: &Path) -> Result<(), HairError> {
        let file = File::open(path).map_err(|e| HairError::OpeningFile(e.kind()))?;
        let mut reader = BufReader::new(file);

        let mut header = FileHeader::zeroed();
        reader
            .read_exact(bytemuck::bytes_of_mut(&mut header))
            .map_err(|_| HairError::ReadingHeader)?;

        if !header.has_valid_signature() {
            return Err(HairError::InvalidSignature);
        }

        self.header = header;

        let strand_count = self.header.strand_count as usize;
        let vertex_count = self.header.vertex_count as usize;

        self.segments =
            self.read_array(&mut reader, AttributeFlags::SEGMENTS, strand_count, HairField::Segments)?;
        self.vertices =
            self.read_array(&mut reader, AttributeFlags::VERTICES, vertex_count, HairField::Vertices)?;
        self.thickness =
            self.read_array(&mut reader, AttributeFlags::THICKNESS, vertex_count, HairField::Thickness)?;
        self.transparency = self.read_array(
            &mut reader,
            AttributeFlags::TRANSPARENCY,
            vertex_count,
            HairField::Transparency,
        )?;
        self.color =
            self.read_array(&mut reader, AttributeFlags::COLOR, vertex_count, HairField::Color)?;
        self.tangents =
            self.read_array(&mut reader, AttributeFlags::TANGENTS, vertex_count, HairField::Tangents)?;

        // Indices are sized from the segment count the arrays above imply.
        let index_count = self.segment_count() as usize * 2;
        self.indices =
            self.read_array(&mut reader, AttributeFlags::INDICES, index_count, HairField::Indices)?;

        if !self.format_is_valid() {
            return Err(HairError::InvalidFormat);
        }

        info!(
            strands = self.strand_count(),
            vertices = self.vertex_count(),
            "loaded hair style"
        );

        Ok(())
    }

    fn save_to(&self, path: &Path) -> Result<(), HairError> {
        if !self.format_is_valid() {
            return Err(HairError::InvalidFormat);
        }

        let mut file = File::create(path).map_err(|e| HairError::OpeningFile(e.kind()))?;

        file.write_all(bytemuck::bytes_of(&self.header))
            .map_err(|_| HairError::WritingHeader)?;

        write_array(&mut file, &self.segments, HairField::Segments)?;
        write_array(&mut file, &self.vertices, HairField::Vertices)?;
        write_array(&mut file, &self.thickness, HairField::Thickness)?;
        write_array(&mut file, &self.transparency, HairField::Transparency)?;
        write_array(&mut file, &self.color, HairField::Color)?;
        write_array(&mut file, &self.tangents, HairField::Tangents)?;
        write_array(&mut file, &self.indices, HairField::Indices)?;

        info!(
            strands = self.strand_count(),
            vertices = self.vertex_count(),
            "saved hair style"
        );

        Ok(())
    }

    /// Reads one attribute array as a single contiguous block, or returns
    /// an empty array if its presence bit is unset.
    fn read_array<T: Pod>(
        &self,
        reader: &mut impl Read,
        presence_bit: u32,
        count: usize,
        field: HairField,
    ) -> Result<Vec<T>, HairError> {
        if !self.header.flags.contains(presence_bit) {
            return Ok(Vec::new());
        }

        let mut data = vec![T::zeroed(); count];
        reader
            .read_exact(bytemuck::cast_slice_mut(&mut data))
            .map_err(|_| HairError::ReadingField(field))?;
        Ok(data)
    }
}

/// Writes one attribute array as a single contiguous block; absent arrays
/// (empty, presence bit unset) write nothing.
fn write_array<T: Pod>(
    writer: &mut impl Write,
    data: &[T],
    field: HairField,
) -> Result<(), HairError> {
    if data.is_empty() {
        return Ok(());
    }

    writer
        .write_all(bytemuck::cast_slice(data))
        .map_err(|_| HairError::WritingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tress_core::math::Vec3;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(name)
    }

    fn small_style() -> HairStyle {
        let mut style = HairStyle::with_seed(11);
        style.set_segments(vec![3]);
        style.set_vertices(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.5, 2.0, 0.0),
            Vec3::new(1.0, 3.0, 0.5),
        ]);
        style.set_thickness(vec![0.1, 0.1, 0.1, 0.0]);
        style
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let path = temp_path("tress_codec_roundtrip.hair");
        let mut original = small_style();
        original.set_default_transparency(0.25);
        original.set_information("roundtrip fixture");
        original.generate_tangents();
        original.generate_indices();
        original.save(&path).expect("save should succeed");
        assert!(original.last_error().is_none());

        let loaded = HairStyle::open(&path).expect("load should succeed");
        assert_eq!(loaded.segments(), original.segments());
        assert_eq!(loaded.vertices(), original.vertices());
        assert_eq!(loaded.thickness(), original.thickness());
        assert_eq!(loaded.tangents(), original.tangents());
        assert_eq!(loaded.indices(), original.indices());
        assert_eq!(loaded.strand_count(), original.strand_count());
        assert_eq!(loaded.vertex_count(), original.vertex_count());
        assert_eq!(loaded.default_transparency(), 0.25);
        assert_eq!(loaded.information(), "roundtrip fixture");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_corrupted_signature_is_rejected() {
        let path = temp_path("tress_codec_bad_signature.hair");
        small_style().save(&path).expect("save should succeed");

        let mut bytes = std::fs::read(&path).expect("fixture readable");
        bytes[..4].copy_from_slice(b"MANE");
        std::fs::write(&path, bytes).expect("fixture writable");

        let mut style = HairStyle::with_seed(1);
        let outcome = style.load(&path);
        assert_eq!(outcome, Err(HairError::InvalidSignature));
        assert_eq!(style.last_error(), Some(&HairError::InvalidSignature));
        assert!(!style.has_vertices(), "Arrays stay empty after rejection");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_truncated_array_is_a_field_error() {
        let path = temp_path("tress_codec_truncated.hair");
        small_style().save(&path).expect("save should succeed");

        let bytes = std::fs::read(&path).expect("fixture readable");
        std::fs::write(&path, &bytes[..bytes.len() - 8]).expect("fixture writable");

        let outcome = HairStyle::open(&path);
        assert_eq!(outcome.err(), Some(HairError::ReadingField(HairField::Thickness)));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_save_rejects_inconsistent_arrays() {
        let path = temp_path("tress_codec_invalid.hair");
        std::fs::remove_file(&path).ok();
        let mut style = small_style();
        style.set_thickness(vec![0.1; 3]); // 4 vertices, 3 entries

        let outcome = style.save(&path);
        assert_eq!(outcome, Err(HairError::InvalidFormat));
        assert_eq!(style.last_error(), Some(&HairError::InvalidFormat));
        assert!(!path.exists(), "Nothing is written for an invalid asset");
    }

    #[test]
    fn test_load_post_check_rejects_vertexless_file() {
        // A file whose header admits thickness but no vertices fails the
        // structural post-check even though every read succeeds.
        let path = temp_path("tress_codec_vertexless.hair");
        let mut header = FileHeader::new();
        header.strand_count = 0;
        header.vertex_count = 0;
        std::fs::write(&path, bytemuck::bytes_of(&header)).expect("fixture writable");

        let outcome = HairStyle::open(&path);
        assert_eq!(outcome.err(), Some(HairError::InvalidFormat));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_an_open_error() {
        let outcome = HairStyle::open(temp_path("tress_codec_does_not_exist.hair"));
        assert!(matches!(outcome, Err(HairError::OpeningFile(_))));
    }

    #[test]
    fn test_success_clears_previous_error() {
        let path = temp_path("tress_codec_clears_error.hair");
        let mut style = small_style();

        let missing = temp_path("tress_codec_never_there.hair");
        assert!(style.load(&missing).is_err());
        assert!(style.last_error().is_some());

        // The failed load wiped nothing (open failed first); rebuild and save.
        let mut style = small_style();
        style.save(&path).expect("save should succeed");
        assert!(style.last_error().is_none(), "Success clears the error state");

        std::fs::remove_file(&path).ok();
    }
}
