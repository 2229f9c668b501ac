//! # Hair Codec Error Types
//!
//! Every failure the codec can signal. Variants are `Clone + PartialEq` so
//! the most recent outcome can be cached on the asset as a queryable
//! last-error state in addition to being returned.

use thiserror::Error;

/// The optional attribute arrays of the `.hair` format.
///
/// Used to pinpoint which array a read or write failed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HairField {
    /// Per-strand segment counts.
    Segments,
    /// Per-vertex positions.
    Vertices,
    /// Per-vertex thickness.
    Thickness,
    /// Per-vertex transparency.
    Transparency,
    /// Per-vertex RGB color.
    Color,
    /// Per-vertex unit tangents.
    Tangents,
    /// Pair-wise line indices, one pair per segment.
    Indices,
}

impl std::fmt::Display for HairField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Segments => "segments",
            Self::Vertices => "vertices",
            Self::Thickness => "thickness",
            Self::Transparency => "transparency",
            Self::Color => "color",
            Self::Tangents => "tangents",
            Self::Indices => "indices",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while loading or saving a hair asset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HairError {
    /// The file could not be opened or created.
    #[error("could not open hair file: {0}")]
    OpeningFile(std::io::ErrorKind),

    /// The fixed-size header could not be read in full.
    #[error("failed to read the file header")]
    ReadingHeader,

    /// The fixed-size header could not be written in full.
    #[error("failed to write the file header")]
    WritingHeader,

    /// The first four bytes were not the ASCII signature "HAIR".
    #[error("invalid signature, expected \"HAIR\"")]
    InvalidSignature,

    /// An attribute array marked present could not be read in full.
    #[error("failed to read the {0} array")]
    ReadingField(HairField),

    /// A present attribute array could not be written in full.
    #[error("failed to write the {0} array")]
    WritingField(HairField),

    /// The arrays are structurally inconsistent (length mismatches or no
    /// vertices). Raised by the post-load check and the pre-save check.
    #[error("attribute arrays are inconsistent with the vertex layout")]
    InvalidFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_field() {
        let error = HairError::ReadingField(HairField::Transparency);
        assert_eq!(error.to_string(), "failed to read the transparency array");

        let error = HairError::WritingField(HairField::Segments);
        assert_eq!(error.to_string(), "failed to write the segments array");
    }

    #[test]
    fn test_errors_are_cacheable() {
        // The last-error state stores a clone and compares on queries.
        let error = HairError::OpeningFile(std::io::ErrorKind::NotFound);
        assert_eq!(error.clone(), error);
    }
}
