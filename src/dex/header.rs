/* header_item parsing and validation */

use adler::adler32_slice;
use log::warn;
use sha1::{Digest, Sha1};

use crate::dex::cursor::Cursor;
use crate::dex::error::{DexError, DexResult, TableKind};
use crate::dex::options::LoadOptions;

pub const DEX_MAGIC_PREFIX: [u8; 4] = [0x64, 0x65, 0x78, 0x0a];
pub const HEADER_SIZE: usize = 0x70;
pub const ENDIAN_CONSTANT: u32 = 0x12345678;
pub const REVERSE_ENDIAN_CONSTANT: u32 = 0x78563412;
pub const NO_INDEX: u32 = 0xffffffff;

/// The checksum covers everything from here on.
const CHECKSUM_START: usize = 12;
/// The signature covers everything from here on.
const SIGNATURE_START: usize = 32;

/// A `(count, offset)` pair locating one section of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section
{
    pub count: u32,
    pub offset: u32,
}

/// The validated file header.
///
/// A `Header` only exists once every check in [`Header::parse`] has passed:
/// each identifier table fits inside `file_size`, and `file_size` fits inside
/// the buffer it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header
{
    pub magic: [u8; 8],
    pub checksum: u32,
    pub signature: [u8; 20],
    pub file_size: u32,
    pub header_size: u32,
    pub endian_tag: u32,
    pub link_size: u32,
    pub link_off: u32,
    pub map_off: u32,
    pub string_ids_size: u32,
    pub string_ids_off: u32,
    pub type_ids_size: u32,
    pub type_ids_off: u32,
    pub proto_ids_size: u32,
    pub proto_ids_off: u32,
    pub field_ids_size: u32,
    pub field_ids_off: u32,
    pub method_ids_size: u32,
    pub method_ids_off: u32,
    pub class_defs_size: u32,
    pub class_defs_off: u32,
    pub data_size: u32,
    pub data_off: u32,
}

/// Parse the three ASCII digits of `dex\nNNN\0`, e.g. 35 for `035`.
pub(crate) fn magic_version(magic: &[u8; 8]) -> Option<u32>
{
    if magic[..4] != DEX_MAGIC_PREFIX || magic[7] != 0
    {
        return None;
    }
    magic[4..7].iter().try_fold(0u32, |acc, &d| {
        d.is_ascii_digit().then(|| acc * 10 + (d - b'0') as u32)
    })
}

impl Header
{
    pub fn parse(bytes: &[u8]) -> DexResult<Header>
    {
        Header::parse_with(bytes, &LoadOptions::default())
    }

    pub fn parse_with(bytes: &[u8], options: &LoadOptions) -> DexResult<Header>
    {
        if bytes.len() < HEADER_SIZE
        {
            fail!(Truncated { needed: HEADER_SIZE, available: bytes.len() });
        }

        let mut c = Cursor::new(bytes);
        let magic: [u8; 8] = c.read_array()?;
        match magic_version(&magic)
        {
            Some(version) if options.allows_version(version) => {}
            _ => fail!(BadMagicOrVersion { magic }),
        }

        let checksum = c.read_u32_le()?;
        let signature: [u8; 20] = c.read_array()?;
        let file_size = c.read_u32_le()?;
        let header_size = c.read_u32_le()?;
        let endian_tag = c.read_u32_le()?;
        if endian_tag != ENDIAN_CONSTANT
        {
            // REVERSE_ENDIAN_CONSTANT lands here too; byte-swapped files are not supported
            fail!(BadEndianness { tag: endian_tag });
        }

        if header_size as usize != HEADER_SIZE
        {
            if options.strict_header_size
            {
                fail!(BadHeaderSize { header_size });
            }
            warn!("header_size is {:#x}, expected {:#x}", header_size, HEADER_SIZE);
        }

        let header = Header {
            magic,
            checksum,
            signature,
            file_size,
            header_size,
            endian_tag,
            link_size: c.read_u32_le()?,
            link_off: c.read_u32_le()?,
            map_off: c.read_u32_le()?,
            string_ids_size: c.read_u32_le()?,
            string_ids_off: c.read_u32_le()?,
            type_ids_size: c.read_u32_le()?,
            type_ids_off: c.read_u32_le()?,
            proto_ids_size: c.read_u32_le()?,
            proto_ids_off: c.read_u32_le()?,
            field_ids_size: c.read_u32_le()?,
            field_ids_off: c.read_u32_le()?,
            method_ids_size: c.read_u32_le()?,
            method_ids_off: c.read_u32_le()?,
            class_defs_size: c.read_u32_le()?,
            class_defs_off: c.read_u32_le()?,
            data_size: c.read_u32_le()?,
            data_off: c.read_u32_le()?,
        };

        header.check_bounds(bytes.len())?;
        header.check_integrity(&bytes[..file_size as usize], options)?;
        Ok(header)
    }

    fn check_integrity(&self, file: &[u8], options: &LoadOptions) -> DexResult<()>
    {
        if options.verify_checksum
        {
            let actual = adler32_slice(&file[CHECKSUM_START..]);
            if actual != self.checksum
            {
                fail!(BadChecksum { expected: self.checksum, actual });
            }
        }
        if options.verify_signature && compute_sha1(&file[SIGNATURE_START..]) != self.signature
        {
            fail!(BadSignature);
        }
        Ok(())
    }

    fn check_bounds(&self, buffer_len: usize) -> DexResult<()>
    {
        let file_size = self.file_size as usize;
        if file_size > buffer_len
        {
            fail!((OutOfBounds { offset: 0, width: file_size, len: buffer_len }), ("file_size"));
        }
        if file_size < HEADER_SIZE
        {
            fail!((OutOfBounds { offset: 0, width: HEADER_SIZE, len: file_size }), ("file_size"));
        }
        if file_size < buffer_len
        {
            warn!("{} trailing bytes after file_size {:#x}", buffer_len - file_size, file_size);
        }

        for table in TableKind::ALL
        {
            let section = self.section(table);
            check_section(section, table.stride(), self.file_size)
                .map_err(|e| DexError::with_context(e, format!("{} section", table)))?;
        }

        let data = Section { count: self.data_size, offset: self.data_off };
        check_section(data, 1, self.file_size).map_err(|e| DexError::with_context(e, "data section".to_string()))?;
        let link = Section { count: self.link_size, offset: self.link_off };
        check_section(link, 1, self.file_size).map_err(|e| DexError::with_context(e, "link section".to_string()))?;

        if self.map_off > self.file_size
        {
            fail!((OutOfBounds { offset: self.map_off as usize, width: 0, len: file_size }), ("map_off"));
        }
        Ok(())
    }

    pub fn section(&self, table: TableKind) -> Section
    {
        let (count, offset) = match table
        {
            TableKind::StringIds => (self.string_ids_size, self.string_ids_off),
            TableKind::TypeIds => (self.type_ids_size, self.type_ids_off),
            TableKind::ProtoIds => (self.proto_ids_size, self.proto_ids_off),
            TableKind::FieldIds => (self.field_ids_size, self.field_ids_off),
            TableKind::MethodIds => (self.method_ids_size, self.method_ids_off),
            TableKind::ClassDefs => (self.class_defs_size, self.class_defs_off),
        };
        Section { count, offset }
    }

    /// Numeric format version from the magic, e.g. 35 or 39.
    pub fn version(&self) -> u32
    {
        // the magic was validated during parsing
        magic_version(&self.magic).unwrap_or(0)
    }
}

pub(crate) fn compute_sha1(data: &[u8]) -> [u8; 20]
{
    let mut hasher = Sha1::new();
    hasher.update(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// `offset + count * stride <= file_size`, computed without overflow.
fn check_section(section: Section, stride: usize, file_size: u32) -> DexResult<()>
{
    let width = section.count as u64 * stride as u64;
    if section.offset as u64 + width > file_size as u64
    {
        fail!(OutOfBounds {
            offset: section.offset as usize,
            width: usize::try_from(width).unwrap_or(usize::MAX),
            len: file_size as usize,
        });
    }
    Ok(())
}
