//! Read-only decoding of Dalvik executable files.
//!
//! Start from [`DexFile`]: it validates the header up front and decodes
//! everything else lazily, one lookup at a time.

#[macro_use]
pub mod error;

pub mod access;
pub mod class_data;
pub mod cursor;
pub(crate) mod dex_file;
pub mod header;
pub mod leb;
pub mod map;
pub mod mutf8;
pub mod options;
pub(crate) mod resolve;
pub mod tables;

pub use access::{AccessFlags, MemberKind};
pub use class_data::{ClassDataItem, EncodedField, EncodedMethod};
pub use dex_file::DexFile;
pub use error::{DexError, DexResult, TableKind};
pub use header::{Header, NO_INDEX};
pub use map::{ItemType, MapItem};
pub use options::LoadOptions;
pub use resolve::{ClassField, ClassMethod, ClassSummary, FieldDescriptor, MethodSignature};
pub use tables::{ClassDefItem, FieldIdItem, MethodIdItem, ProtoIdItem, StringIdItem, Table, TypeIdItem, TypeList};
