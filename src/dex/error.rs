use std::fmt;

use thiserror::Error;

/// Return early with a [`DexError`] variant, optionally wrapped in a context.
macro_rules! fail {
    ($variant:ident { $($field:tt)* }) => {
        return Err($crate::dex::error::DexError::$variant { $($field)* })
    };
    ($variant:ident) => {
        return Err($crate::dex::error::DexError::$variant)
    };
    (($variant:ident { $($field:tt)* }), ($contextfmt:literal $(, $contextargs:expr)*)) => {
        return Err($crate::dex::error::DexError::with_context(
            $crate::dex::error::DexError::$variant { $($field)* },
            format!($contextfmt $(, $contextargs)*),
        ))
    };
}

pub type DexResult<T> = Result<T, DexError>;

/// The fixed-stride identifier tables of a dex file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind
{
    StringIds,
    TypeIds,
    ProtoIds,
    FieldIds,
    MethodIds,
    ClassDefs,
}

impl TableKind
{
    pub const ALL: [TableKind; 6] = [
        TableKind::StringIds,
        TableKind::TypeIds,
        TableKind::ProtoIds,
        TableKind::FieldIds,
        TableKind::MethodIds,
        TableKind::ClassDefs,
    ];

    pub fn name(&self) -> &'static str
    {
        match self
        {
            TableKind::StringIds => "string_ids",
            TableKind::TypeIds => "type_ids",
            TableKind::ProtoIds => "proto_ids",
            TableKind::FieldIds => "field_ids",
            TableKind::MethodIds => "method_ids",
            TableKind::ClassDefs => "class_defs",
        }
    }
}

impl fmt::Display for TableKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.name())
    }
}

/// Everything that can go wrong while decoding a dex buffer.
///
/// Lookup errors are local to the call that produced them; the container
/// stays usable afterwards. Use [`DexError::kind`] to match on the
/// underlying failure when a context has been attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DexError
{
    #[error("buffer truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("bad magic or unsupported version {magic:02x?}")]
    BadMagicOrVersion { magic: [u8; 8] },

    #[error("unsupported endian tag {tag:#010x}")]
    BadEndianness { tag: u32 },

    #[error("header_size {header_size:#x} does not match the 0x70 byte header")]
    BadHeaderSize { header_size: u32 },

    #[error("checksum {expected:#010x} does not match computed {actual:#010x}")]
    BadChecksum { expected: u32, actual: u32 },

    #[error("SHA-1 signature does not match file contents")]
    BadSignature,

    #[error("read of {width} bytes at offset {offset:#x} exceeds buffer of {len} bytes")]
    OutOfBounds { offset: usize, width: usize, len: usize },

    #[error("{table} index {index} out of range (count {count})")]
    IndexOutOfRange { table: TableKind, index: u32, count: u32 },

    #[error("malformed uleb128 at offset {offset:#x}")]
    MalformedVarint { offset: usize },

    #[error("malformed modified UTF-8 string data at offset {offset:#x}")]
    MalformedEncoding { offset: usize },

    #[error("malformed type descriptor {0:?}")]
    MalformedDescriptor(String),

    #[error("{source} for {context}")]
    Context { source: Box<DexError>, context: String },
}

impl DexError
{
    pub(crate) fn with_context(base: DexError, context: String) -> Self
    {
        DexError::Context { source: Box::new(base), context }
    }

    /// The underlying error with every context layer peeled off.
    pub fn kind(&self) -> &DexError
    {
        match self
        {
            DexError::Context { source, .. } => source.kind(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_keeps_kind_and_chains_display()
    {
        let base = DexError::OutOfBounds { offset: 0x70, width: 48, len: 0x80 };
        let inner = DexError::with_context(base.clone(), "proto_ids section".to_string());
        let outer = DexError::with_context(inner, "header".to_string());

        assert_eq!(outer.kind(), &base);
        assert_eq!(
            outer.to_string(),
            "read of 48 bytes at offset 0x70 exceeds buffer of 128 bytes for proto_ids section for header"
        );
    }

    #[test]
    fn index_error_names_table()
    {
        let e = DexError::IndexOutOfRange { table: TableKind::MethodIds, index: 9, count: 3 };
        assert_eq!(e.to_string(), "method_ids index 9 out of range (count 3)");
    }
}
