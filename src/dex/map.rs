//! `map_list` decoding.
//!
//! The map list sits in the data section and names every item section of the
//! file with its type code, size and offset. It is optional for this reader:
//! nothing else depends on it, but it is handy for inspecting a file.

use serde::Serialize;

use crate::dex::cursor::Cursor;
use crate::dex::error::DexResult;

pub const MAP_ITEM_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItemType
{
    Header,
    StringId,
    TypeId,
    ProtoId,
    FieldId,
    MethodId,
    ClassDef,
    CallSiteId,
    MethodHandle,
    MapList,
    TypeList,
    AnnotationSetRefList,
    AnnotationSet,
    ClassData,
    Code,
    StringData,
    DebugInfo,
    Annotation,
    EncodedArray,
    AnnotationsDirectory,
    HiddenapiClassData,
    Unknown(u16),
}

impl From<u16> for ItemType
{
    fn from(code: u16) -> Self
    {
        match code
        {
            0x0000 => ItemType::Header,
            0x0001 => ItemType::StringId,
            0x0002 => ItemType::TypeId,
            0x0003 => ItemType::ProtoId,
            0x0004 => ItemType::FieldId,
            0x0005 => ItemType::MethodId,
            0x0006 => ItemType::ClassDef,
            0x0007 => ItemType::CallSiteId,
            0x0008 => ItemType::MethodHandle,
            0x1000 => ItemType::MapList,
            0x1001 => ItemType::TypeList,
            0x1002 => ItemType::AnnotationSetRefList,
            0x1003 => ItemType::AnnotationSet,
            0x2000 => ItemType::ClassData,
            0x2001 => ItemType::Code,
            0x2002 => ItemType::StringData,
            0x2003 => ItemType::DebugInfo,
            0x2004 => ItemType::Annotation,
            0x2005 => ItemType::EncodedArray,
            0x2006 => ItemType::AnnotationsDirectory,
            0xF000 => ItemType::HiddenapiClassData,
            other => ItemType::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapItem
{
    pub item_type: ItemType,
    pub size: u32,
    pub offset: u32,
}

/// Read the map list at `map_off`; 0 means the file carries none.
pub fn read_map_list(bytes: &[u8], map_off: u32) -> DexResult<Vec<MapItem>>
{
    if map_off == 0
    {
        return Ok(vec![]);
    }
    let mut cursor = Cursor::at(bytes, map_off as usize)?;
    let size = cursor.read_u32_le()?;
    let mut items = Vec::with_capacity((size as usize).min(cursor.remaining() / MAP_ITEM_SIZE));
    for _ in 0..size
    {
        let item_type = ItemType::from(cursor.read_u16_le()?);
        let _unused = cursor.read_u16_le()?;
        let size = cursor.read_u32_le()?;
        let offset = cursor.read_u32_le()?;
        items.push(MapItem { item_type, size, offset });
    }
    Ok(items)
}
