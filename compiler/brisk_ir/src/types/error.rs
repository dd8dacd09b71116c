use thiserror::Error;

/// Invalid descriptor construction.
///
/// Raised when a record or bit-view descriptor is built, never at use time.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("duplicate field `{name}` (field names are case-insensitive)")]
    DuplicateField { name: String },

    #[error("field name cannot be empty")]
    EmptyName,

    #[error("field `{name}` must be at least one bit wide")]
    ZeroWidth { name: String },

    #[error("field `{name}` (bits {offset}..{end}) exceeds the {backing}-bit backing integer")]
    FieldOutOfRange {
        name: String,
        offset: u32,
        end: u32,
        backing: u32,
    },

    #[error("field `{second}` overlaps field `{first}`")]
    OverlappingFields { first: String, second: String },

    #[error("unsupported backing width {bits}; expected 8, 16, 32 or 64")]
    UnsupportedWidth { bits: u32 },
}
