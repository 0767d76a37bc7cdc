/* string_data_item decoding */

use log::trace;

use crate::dex::cursor::Cursor;
use crate::dex::error::{DexError, DexResult};
use crate::dex::leb::read_uleb128;

/// Decode a `string_data_item`: a uleb128 UTF-16 length followed by a
/// NUL-terminated modified UTF-8 payload.
///
/// The declared length is only informational. Multi-byte sequences make the
/// byte length larger than the code unit count, so the payload is bounded by
/// the terminator alone. A payload without a terminator inside the span is
/// [`DexError::OutOfBounds`].
///
/// Unpaired surrogates are legal in the format but have no `char`; they are
/// replaced with U+FFFD.
pub fn decode_string_data(cursor: &mut Cursor<'_>) -> DexResult<String>
{
    let utf16_size = read_uleb128(cursor)?;
    let start = cursor.position();
    let raw = cursor.peek_cstring()?;
    cursor.read_bytes(raw.len() + 1)?;

    let decoded = match cesu8::from_java_cesu8(raw)
    {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf16_lossy(&decode_utf16_units(raw, start)?),
    };

    if decoded.encode_utf16().count() != utf16_size as usize
    {
        trace!(
            "string data at {:#x} declares {} code units but decodes to {}",
            start,
            utf16_size,
            decoded.encode_utf16().count()
        );
    }

    Ok(decoded)
}

/// Split a modified UTF-8 payload into UTF-16 code units without pairing
/// surrogates.
fn decode_utf16_units(raw: &[u8], start: usize) -> DexResult<Vec<u16>>
{
    let malformed = || DexError::MalformedEncoding { offset: start };
    let continuation = |b: Option<&u8>| match b
    {
        Some(&b) if b & 0xC0 == 0x80 => Ok((b & 0x3F) as u16),
        _ => Err(malformed()),
    };

    let mut units = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter();
    while let Some(&lead) = bytes.next()
    {
        let unit = match lead
        {
            0x01..=0x7F => lead as u16,
            0xC0..=0xDF => ((lead & 0x1F) as u16) << 6 | continuation(bytes.next())?,
            0xE0..=0xEF =>
            {
                let hi = continuation(bytes.next())?;
                let lo = continuation(bytes.next())?;
                ((lead & 0x0F) as u16) << 12 | hi << 6 | lo
            }
            _ => return Err(malformed()),
        };
        units.push(unit);
    }
    Ok(units)
}
