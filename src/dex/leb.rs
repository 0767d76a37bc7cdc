use crate::dex::cursor::Cursor;
use crate::dex::error::{DexError, DexResult};

/// A dex uleb128 never needs more than five bytes for a 32-bit value.
pub const MAX_ULEB128_LEN: usize = 5;

pub fn encode_uleb128(value: u32) -> Vec<u8> {
    let mut result = Vec::new();
    let mut remaining = value;

    loop {
        let mut byte = (remaining & 0x7F) as u8;
        remaining >>= 7;

        if remaining != 0 {
            byte |= 0x80;
        }

        result.push(byte);

        if remaining == 0 {
            break;
        }
    }

    result
}

/// Decode one uleb128 value, returning it with the number of bytes consumed.
///
/// Running out of input after the first byte, or a fifth byte that still has
/// its continuation bit set, is a [`DexError::MalformedVarint`]. A missing
/// first byte is a plain [`DexError::OutOfBounds`].
pub fn decode_uleb128(cursor: &mut Cursor<'_>) -> DexResult<(u32, usize)> {
    let start = cursor.position();
    let mut value: u32 = 0;

    for count in 0..MAX_ULEB128_LEN {
        let byte = if count == 0 {
            cursor.read_u8()?
        } else {
            cursor
                .read_u8()
                .map_err(|_| DexError::MalformedVarint { offset: start })?
        };

        // bits shifted past 32 on the fifth byte are dropped
        value |= ((byte & 0x7F) as u32) << (7 * count as u32);

        if byte & 0x80 == 0 {
            return Ok((value, count + 1));
        }
    }

    Err(DexError::MalformedVarint { offset: start })
}

pub(crate) fn read_uleb128(cursor: &mut Cursor<'_>) -> DexResult<u32> {
    decode_uleb128(cursor).map(|(value, _)| value)
}
