/* The dex container: an owned buffer plus its validated header */

use log::debug;

use crate::dex::class_data::ClassDataItem;
use crate::dex::error::DexResult;
use crate::dex::header::Header;
use crate::dex::map::{read_map_list, MapItem};
use crate::dex::options::LoadOptions;
use crate::dex::tables::{
    ClassDefItem, FieldIdItem, MethodIdItem, ProtoIdItem, StringIdItem, StringIdx, Table, TableEntry, TypeIdItem,
    TypeList,
};

/// A loaded dex file.
///
/// Owns its bytes for its whole lifetime and never mutates them, so a
/// `DexFile` can be shared between threads (for example behind an `Arc`)
/// and read concurrently. Every table view and decoded record borrows from
/// or copies out of this buffer.
///
/// # Examples
///
/// ```no_run
/// use dexview::dex::DexFile;
///
/// let bytes = std::fs::read("classes.dex").unwrap();
/// let dex = DexFile::from_vec(bytes).unwrap();
/// for summary in dex.class_summaries() {
///     println!("{}", summary.unwrap().descriptor);
/// }
/// ```
#[derive(Debug)]
pub struct DexFile
{
    header: Header,
    data: Vec<u8>,
}

impl DexFile
{
    pub fn from_vec(data: Vec<u8>) -> DexResult<DexFile>
    {
        DexFile::with_options(data, &LoadOptions::default())
    }

    pub fn from_bytes(bytes: &[u8]) -> DexResult<DexFile>
    {
        DexFile::from_vec(bytes.to_vec())
    }

    /// Validate the header and take ownership of `data`. Nothing else is
    /// decoded up front.
    ///
    /// Bounds failures found while validating the header come back wrapped
    /// in [`crate::dex::DexError::Context`] naming the offending field or
    /// section, so match on [`crate::dex::DexError::kind`] rather than on the
    /// returned value:
    ///
    /// ```
    /// use dexview::dex::{DexError, DexFile};
    ///
    /// let mut bytes = vec![0u8; 0x70];
    /// bytes[..8].copy_from_slice(b"dex\n035\0");
    /// bytes[32..36].copy_from_slice(&0x1000u32.to_le_bytes()); // file_size
    /// bytes[36..40].copy_from_slice(&0x70u32.to_le_bytes());
    /// bytes[40..44].copy_from_slice(&0x12345678u32.to_le_bytes());
    ///
    /// let e = DexFile::from_vec(bytes).unwrap_err();
    /// assert!(matches!(e.kind(), DexError::OutOfBounds { .. }));
    /// assert!(!matches!(e, DexError::OutOfBounds { .. }));
    /// ```
    pub fn with_options(data: Vec<u8>, options: &LoadOptions) -> DexResult<DexFile>
    {
        let header = Header::parse_with(&data, options)?;
        debug!(
            "loaded dex v{:03}: {} bytes, {} strings, {} types, {} protos, {} fields, {} methods, {} classes",
            header.version(),
            header.file_size,
            header.string_ids_size,
            header.type_ids_size,
            header.proto_ids_size,
            header.field_ids_size,
            header.method_ids_size,
            header.class_defs_size
        );
        Ok(DexFile { header, data })
    }

    pub fn header(&self) -> &Header
    {
        &self.header
    }

    pub fn version(&self) -> u32
    {
        self.header.version()
    }

    /// The file's bytes, cut at the header's `file_size`.
    pub fn bytes(&self) -> &[u8]
    {
        // file_size <= data.len() was checked by Header::parse_with
        &self.data[..self.header.file_size as usize]
    }

    fn table<T: TableEntry>(&self) -> Table<'_, T>
    {
        let section = self.header.section(T::KIND);
        Table::new(self.bytes(), section.offset, section.count)
    }

    pub fn strings(&self) -> Table<'_, StringIdItem>
    {
        self.table()
    }

    pub fn types(&self) -> Table<'_, TypeIdItem>
    {
        self.table()
    }

    pub fn protos(&self) -> Table<'_, ProtoIdItem>
    {
        self.table()
    }

    pub fn fields(&self) -> Table<'_, FieldIdItem>
    {
        self.table()
    }

    pub fn methods(&self) -> Table<'_, MethodIdItem>
    {
        self.table()
    }

    pub fn class_defs(&self) -> Table<'_, ClassDefItem>
    {
        self.table()
    }

    pub fn string(&self, idx: StringIdx) -> DexResult<String>
    {
        self.strings().text(idx)
    }

    pub fn type_list(&self, offset: u32) -> DexResult<TypeList>
    {
        TypeList::read(self.bytes(), offset)
    }

    pub fn class_data(&self, class_def: &ClassDefItem) -> DexResult<ClassDataItem>
    {
        ClassDataItem::read(self.bytes(), class_def.class_data_off)
    }

    pub fn map_list(&self) -> DexResult<Vec<MapItem>>
    {
        read_map_list(self.bytes(), self.header.map_off)
    }
}
