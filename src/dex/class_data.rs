/* class_data_item decoding */

use log::trace;
use serde::Serialize;

use crate::dex::access::AccessFlags;
use crate::dex::cursor::Cursor;
use crate::dex::error::{DexError, DexResult};
use crate::dex::leb::read_uleb128;
use crate::dex::tables::{FieldIdx, MethodIdx};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodedField
{
    pub field_idx: FieldIdx,
    pub access_flags: AccessFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodedMethod
{
    pub method_idx: MethodIdx,
    pub access_flags: AccessFlags,
    /// 0 for abstract and native methods.
    pub code_off: u32,
}

impl EncodedMethod
{
    pub fn code_off(&self) -> Option<u32>
    {
        (self.code_off != 0).then_some(self.code_off)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassDataItem
{
    pub static_fields: Vec<EncodedField>,
    pub instance_fields: Vec<EncodedField>,
    pub direct_methods: Vec<EncodedMethod>,
    pub virtual_methods: Vec<EncodedMethod>,
}

/// Running absolute index of one delta-encoded list.
struct DeltaIndex(u32);

impl DeltaIndex
{
    fn advance(&mut self, cursor: &mut Cursor<'_>) -> DexResult<u32>
    {
        let at = cursor.position();
        let delta = read_uleb128(cursor)?;
        self.0 = self.0.checked_add(delta).ok_or(DexError::MalformedVarint { offset: at })?;
        Ok(self.0)
    }
}

/// Every entry takes at least one byte per uleb128, so a count larger than
/// what is left in the buffer cannot be honest. Caps the preallocation only.
fn capacity_for(count: u32, cursor: &Cursor<'_>, min_width: usize) -> usize
{
    (count as usize).min(cursor.remaining() / min_width)
}

fn read_fields(cursor: &mut Cursor<'_>, count: u32) -> DexResult<Vec<EncodedField>>
{
    let mut fields = Vec::with_capacity(capacity_for(count, cursor, 2));
    let mut index = DeltaIndex(0);
    for _ in 0..count
    {
        let field_idx = index.advance(cursor)?;
        let access_flags = AccessFlags::from_raw(read_uleb128(cursor)?);
        fields.push(EncodedField { field_idx, access_flags });
    }
    Ok(fields)
}

fn read_methods(cursor: &mut Cursor<'_>, count: u32) -> DexResult<Vec<EncodedMethod>>
{
    let mut methods = Vec::with_capacity(capacity_for(count, cursor, 3));
    let mut index = DeltaIndex(0);
    for _ in 0..count
    {
        let method_idx = index.advance(cursor)?;
        let access_flags = AccessFlags::from_raw(read_uleb128(cursor)?);
        let code_off = read_uleb128(cursor)?;
        methods.push(EncodedMethod { method_idx, access_flags, code_off });
    }
    Ok(methods)
}

impl ClassDataItem
{
    /// Decode the class data at `offset`; offset 0 means the class has none.
    ///
    /// Each of the four lists restarts its delta chain at zero.
    pub fn read(bytes: &[u8], offset: u32) -> DexResult<ClassDataItem>
    {
        if offset == 0
        {
            return Ok(ClassDataItem::default());
        }

        let mut cursor = Cursor::at(bytes, offset as usize)?;
        let static_fields_size = read_uleb128(&mut cursor)?;
        let instance_fields_size = read_uleb128(&mut cursor)?;
        let direct_methods_size = read_uleb128(&mut cursor)?;
        let virtual_methods_size = read_uleb128(&mut cursor)?;

        trace!(
            "class_data at {:#x}: {} static, {} instance, {} direct, {} virtual",
            offset,
            static_fields_size,
            instance_fields_size,
            direct_methods_size,
            virtual_methods_size
        );

        Ok(ClassDataItem {
            static_fields: read_fields(&mut cursor, static_fields_size)?,
            instance_fields: read_fields(&mut cursor, instance_fields_size)?,
            direct_methods: read_methods(&mut cursor, direct_methods_size)?,
            virtual_methods: read_methods(&mut cursor, virtual_methods_size)?,
        })
    }

    pub fn is_empty(&self) -> bool
    {
        self.static_fields.is_empty()
            && self.instance_fields.is_empty()
            && self.direct_methods.is_empty()
            && self.virtual_methods.is_empty()
    }
}
