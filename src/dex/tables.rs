/* Fixed-stride identifier tables */

use std::marker::PhantomData;

use serde::Serialize;

use crate::dex::access::AccessFlags;
use crate::dex::cursor::Cursor;
use crate::dex::error::{DexResult, TableKind};
use crate::dex::header::NO_INDEX;
use crate::dex::mutf8::decode_string_data;

pub type StringIdx = u32;
pub type TypeIdx = u32;
pub type ProtoIdx = u32;
pub type FieldIdx = u32;
pub type MethodIdx = u32;

pub const STRING_ID_STRIDE: usize = 4;
pub const TYPE_ID_STRIDE: usize = 4;
pub const PROTO_ID_STRIDE: usize = 12;
pub const FIELD_ID_STRIDE: usize = 8;
pub const METHOD_ID_STRIDE: usize = 8;
pub const CLASS_DEF_STRIDE: usize = 32;

impl TableKind
{
    /// Size in bytes of one entry. Every table offset computation goes through here.
    pub const fn stride(&self) -> usize
    {
        match self
        {
            TableKind::StringIds => STRING_ID_STRIDE,
            TableKind::TypeIds => TYPE_ID_STRIDE,
            TableKind::ProtoIds => PROTO_ID_STRIDE,
            TableKind::FieldIds => FIELD_ID_STRIDE,
            TableKind::MethodIds => METHOD_ID_STRIDE,
            TableKind::ClassDefs => CLASS_DEF_STRIDE,
        }
    }
}

/// One fixed-width record of an identifier table.
pub trait TableEntry: Sized + Copy + 'static
{
    const KIND: TableKind;

    fn read(cursor: &mut Cursor<'_>) -> DexResult<Self>;
}

/// `string_id_item`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringIdItem
{
    pub string_data_off: u32,
}

impl TableEntry for StringIdItem
{
    const KIND: TableKind = TableKind::StringIds;

    fn read(cursor: &mut Cursor<'_>) -> DexResult<Self>
    {
        Ok(StringIdItem { string_data_off: cursor.read_u32_le()? })
    }
}

/// `type_id_item`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeIdItem
{
    pub descriptor_idx: StringIdx,
}

impl TableEntry for TypeIdItem
{
    const KIND: TableKind = TableKind::TypeIds;

    fn read(cursor: &mut Cursor<'_>) -> DexResult<Self>
    {
        Ok(TypeIdItem { descriptor_idx: cursor.read_u32_le()? })
    }
}

/// `proto_id_item`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtoIdItem
{
    pub shorty_idx: StringIdx,
    pub return_type_idx: TypeIdx,
    /// Offset of a `type_list`, 0 when the prototype takes no parameters.
    pub parameters_off: u32,
}

impl TableEntry for ProtoIdItem
{
    const KIND: TableKind = TableKind::ProtoIds;

    fn read(cursor: &mut Cursor<'_>) -> DexResult<Self>
    {
        Ok(ProtoIdItem {
            shorty_idx: cursor.read_u32_le()?,
            return_type_idx: cursor.read_u32_le()?,
            parameters_off: cursor.read_u32_le()?,
        })
    }
}

/// `field_id_item`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIdItem
{
    pub class_idx: u16,
    pub type_idx: u16,
    pub name_idx: StringIdx,
}

impl TableEntry for FieldIdItem
{
    const KIND: TableKind = TableKind::FieldIds;

    fn read(cursor: &mut Cursor<'_>) -> DexResult<Self>
    {
        Ok(FieldIdItem {
            class_idx: cursor.read_u16_le()?,
            type_idx: cursor.read_u16_le()?,
            name_idx: cursor.read_u32_le()?,
        })
    }
}

/// `method_id_item`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodIdItem
{
    pub class_idx: u16,
    pub proto_idx: u16,
    pub name_idx: StringIdx,
}

impl TableEntry for MethodIdItem
{
    const KIND: TableKind = TableKind::MethodIds;

    fn read(cursor: &mut Cursor<'_>) -> DexResult<Self>
    {
        Ok(MethodIdItem {
            class_idx: cursor.read_u16_le()?,
            proto_idx: cursor.read_u16_le()?,
            name_idx: cursor.read_u32_le()?,
        })
    }
}

/// `class_def_item`. Offsets are kept raw; 0 means absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassDefItem
{
    pub class_idx: TypeIdx,
    pub access_flags: AccessFlags,
    pub superclass_idx: TypeIdx,
    pub interfaces_off: u32,
    pub source_file_idx: StringIdx,
    pub annotations_off: u32,
    pub class_data_off: u32,
    pub static_values_off: u32,
}

impl ClassDefItem
{
    /// `None` for `java.lang.Object` and other roots.
    pub fn superclass(&self) -> Option<TypeIdx>
    {
        (self.superclass_idx != NO_INDEX).then_some(self.superclass_idx)
    }

    pub fn source_file(&self) -> Option<StringIdx>
    {
        (self.source_file_idx != NO_INDEX).then_some(self.source_file_idx)
    }
}

impl TableEntry for ClassDefItem
{
    const KIND: TableKind = TableKind::ClassDefs;

    fn read(cursor: &mut Cursor<'_>) -> DexResult<Self>
    {
        Ok(ClassDefItem {
            class_idx: cursor.read_u32_le()?,
            access_flags: AccessFlags::from_raw(cursor.read_u32_le()?),
            superclass_idx: cursor.read_u32_le()?,
            interfaces_off: cursor.read_u32_le()?,
            source_file_idx: cursor.read_u32_le()?,
            annotations_off: cursor.read_u32_le()?,
            class_data_off: cursor.read_u32_le()?,
            static_values_off: cursor.read_u32_le()?,
        })
    }
}

/// A read-only view of one identifier table.
///
/// Entries are decoded on every [`Table::get`]; nothing is cached.
#[derive(Debug, Clone, Copy)]
pub struct Table<'a, T>
{
    bytes: &'a [u8],
    base: usize,
    count: u32,
    _entry: PhantomData<T>,
}

impl<'a, T: TableEntry> Table<'a, T>
{
    pub(crate) fn new(bytes: &'a [u8], base: u32, count: u32) -> Self
    {
        Table { bytes, base: base as usize, count, _entry: PhantomData }
    }

    pub fn len(&self) -> u32
    {
        self.count
    }

    pub fn is_empty(&self) -> bool
    {
        self.count == 0
    }

    pub fn get(&self, index: u32) -> DexResult<T>
    {
        if index >= self.count
        {
            fail!(IndexOutOfRange { table: T::KIND, index, count: self.count });
        }
        let offset = self.base + index as usize * T::KIND.stride();
        let mut cursor = Cursor::at(self.bytes, offset)?;
        T::read(&mut cursor)
    }

    pub fn iter(&self) -> impl Iterator<Item = DexResult<T>> + 'a
    {
        let table = *self;
        (0..self.count).map(move |i| table.get(i))
    }
}

impl Table<'_, StringIdItem>
{
    /// Resolve a string index all the way to its decoded text.
    pub fn text(&self, index: StringIdx) -> DexResult<String>
    {
        let id = self.get(index)?;
        let mut cursor = Cursor::at(self.bytes, id.string_data_off as usize)?;
        decode_string_data(&mut cursor)
    }
}

/// `type_list`: a `u32` size followed by that many `u16` type indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeList(pub Vec<u16>);

impl TypeList
{
    /// Offset 0 is the format's "no list" and reads as empty.
    pub fn read(bytes: &[u8], offset: u32) -> DexResult<TypeList>
    {
        if offset == 0
        {
            return Ok(TypeList::default());
        }
        let mut cursor = Cursor::at(bytes, offset as usize)?;
        let size = cursor.read_u32_le()? as usize;
        if size > cursor.remaining() / 2
        {
            fail!(OutOfBounds { offset: cursor.position(), width: size.saturating_mul(2), len: bytes.len() });
        }
        let mut v = Vec::with_capacity(size);
        for _ in 0..size
        {
            v.push(cursor.read_u16_le()?);
        }
        Ok(TypeList(v))
    }

    pub fn iter(&self) -> impl Iterator<Item = TypeIdx> + '_
    {
        self.0.iter().map(|&t| t as TypeIdx)
    }

    pub fn len(&self) -> usize
    {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::error::DexError;

    #[test]
    fn strides_match_entry_widths()
    {
        let bytes = [0u8; 64];
        for table in TableKind::ALL
        {
            let mut cursor = Cursor::new(&bytes);
            match table
            {
                TableKind::StringIds =>
                {
                    StringIdItem::read(&mut cursor).unwrap();
                }
                TableKind::TypeIds =>
                {
                    TypeIdItem::read(&mut cursor).unwrap();
                }
                TableKind::ProtoIds =>
                {
                    ProtoIdItem::read(&mut cursor).unwrap();
                }
                TableKind::FieldIds =>
                {
                    FieldIdItem::read(&mut cursor).unwrap();
                }
                TableKind::MethodIds =>
                {
                    MethodIdItem::read(&mut cursor).unwrap();
                }
                TableKind::ClassDefs =>
                {
                    ClassDefItem::read(&mut cursor).unwrap();
                }
            }
            assert_eq!(cursor.position(), table.stride(), "{}", table);
        }
    }

    #[test]
    fn proto_entries_use_twelve_byte_stride()
    {
        let mut bytes = vec![0u8; 8];
        for i in 0..3u32
        {
            bytes.extend_from_slice(&(i * 10).to_le_bytes());
            bytes.extend_from_slice(&(i * 10 + 1).to_le_bytes());
            bytes.extend_from_slice(&(i * 10 + 2).to_le_bytes());
        }
        let table: Table<'_, ProtoIdItem> = Table::new(&bytes, 8, 3);
        let p = table.get(2).unwrap();
        assert_eq!(p, ProtoIdItem { shorty_idx: 20, return_type_idx: 21, parameters_off: 22 });
        assert_eq!(table.iter().count(), 3);
    }

    #[test]
    fn out_of_range_index_checked_before_reading()
    {
        // base far past the buffer: only the index check can stop this
        let bytes = [0u8; 4];
        let table: Table<'_, FieldIdItem> = Table::new(&bytes, 0x1000, 2);
        assert_eq!(
            table.get(2).unwrap_err(),
            DexError::IndexOutOfRange { table: TableKind::FieldIds, index: 2, count: 2 }
        );
        assert_eq!(
            table.get(u32::MAX).unwrap_err(),
            DexError::IndexOutOfRange { table: TableKind::FieldIds, index: u32::MAX, count: 2 }
        );
        assert!(matches!(table.get(0), Err(DexError::OutOfBounds { .. })));
    }

    #[test]
    fn class_def_sentinels()
    {
        let mut bytes = vec![];
        for v in [5u32, 0x11, NO_INDEX, 0, NO_INDEX, 0, 0, 0]
        {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let table: Table<'_, ClassDefItem> = Table::new(&bytes, 0, 1);
        let def = table.get(0).unwrap();
        assert_eq!(def.class_idx, 5);
        assert_eq!(def.access_flags, AccessFlags::PUBLIC | AccessFlags::FINAL);
        assert_eq!(def.superclass(), None);
        assert_eq!(def.source_file(), None);
    }

    #[test]
    fn type_list_reads_u16_indices()
    {
        let bytes = [0xAA, 0xAA, 0xAA, 0xAA, 0x02, 0x00, 0x00, 0x00, 0x03, 0x00, 0x07, 0x01];
        assert_eq!(TypeList::read(&bytes, 4).unwrap(), TypeList(vec![3, 0x107]));
        assert!(TypeList::read(&bytes, 0).unwrap().is_empty());

        let truncated = [0xAA, 0xAA, 0xAA, 0xAA, 0x03, 0x00, 0x00, 0x00, 0x03, 0x00];
        assert!(matches!(TypeList::read(&truncated, 4), Err(DexError::OutOfBounds { .. })));
    }
}
