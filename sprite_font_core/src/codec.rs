//! UTF-8 ⇄ codepoint conversion.
//!
//! Decoding is permissive: a byte that cannot start a sequence is skipped
//! with a warning and replaced by U+FFFD, and continuation bytes are taken
//! as-is without checking their `10xxxxxx` prefix. Legacy or slightly
//! malformed strings still lay out, one replacement glyph per bad byte.
//!
//! Encoding covers the original 31-bit UTF-8 scheme (up to six bytes), and
//! the decoder accepts the same 5- and 6-byte forms so that every value the
//! encoder produces decodes back to itself.

/// Substituted for a byte that cannot start a UTF-8 sequence.
pub const REPLACEMENT: u32 = 0xFFFD;

/// Largest value `encode_one` can represent.
pub const MAX_ENCODABLE: u32 = 0x7FFF_FFFF;

/// Decode one codepoint starting at `*cursor`, advancing the cursor past
/// every byte consumed.
///
/// Returns 0 without moving the cursor when it is already at the end of
/// `bytes`. A sequence cut short by the end of input yields the bits read
/// so far.
pub fn decode_one(bytes: &[u8], cursor: &mut usize) -> u32 {
    let Some(&lead) = bytes.get(*cursor) else {
        return 0;
    };

    let (len, bits) = match lead {
        b if b & 0x80 == 0x00 => (1, u32::from(b)),
        b if b & 0xE0 == 0xC0 => (2, u32::from(b & 0x1F)),
        b if b & 0xF0 == 0xE0 => (3, u32::from(b & 0x0F)),
        b if b & 0xF8 == 0xF0 => (4, u32::from(b & 0x07)),
        b if b & 0xFC == 0xF8 => (5, u32::from(b & 0x03)),
        b if b & 0xFE == 0xFC => (6, u32::from(b & 0x01)),
        b => {
            log::warn!("codec: not UTF-8: byte {b:#04x} at offset {}", *cursor);
            *cursor += 1;
            return REPLACEMENT;
        }
    };
    *cursor += 1;

    let mut codepoint = bits;
    for _ in 1..len {
        let Some(&cont) = bytes.get(*cursor) else {
            log::warn!("codec: truncated {len}-byte sequence at end of input");
            break;
        };
        codepoint = (codepoint << 6) | u32::from(cont & 0x3F);
        *cursor += 1;
    }
    codepoint
}

/// Decode a UTF-8 byte string up to the first NUL byte (or the end).
pub fn decode_string(bytes: &[u8]) -> Vec<u32> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut cursor = 0;
    while bytes.get(cursor).is_some_and(|&b| b != 0) {
        out.push(decode_one(bytes, &mut cursor));
    }
    out
}

/// Append the UTF-8 form of `codepoint` to `out`.
///
/// Returns the number of bytes written: 1–6, or 0 if the value is above
/// [`MAX_ENCODABLE`] (nothing is written in that case).
pub fn encode_one(codepoint: u32, out: &mut Vec<u8>) -> usize {
    let cont = |shift: u32| ((codepoint >> shift) & 0x3F) as u8 | 0x80;

    match codepoint {
        0x0000_0000..=0x0000_007F => {
            out.push(codepoint as u8);
            1
        }
        0x0000_0080..=0x0000_07FF => {
            out.extend_from_slice(&[((codepoint >> 6) & 0x1F) as u8 | 0xC0, cont(0)]);
            2
        }
        0x0000_0800..=0x0000_FFFF => {
            out.extend_from_slice(&[((codepoint >> 12) & 0x0F) as u8 | 0xE0, cont(6), cont(0)]);
            3
        }
        0x0001_0000..=0x001F_FFFF => {
            out.extend_from_slice(&[
                ((codepoint >> 18) & 0x07) as u8 | 0xF0,
                cont(12),
                cont(6),
                cont(0),
            ]);
            4
        }
        0x0020_0000..=0x03FF_FFFF => {
            out.extend_from_slice(&[
                ((codepoint >> 24) & 0x03) as u8 | 0xF8,
                cont(18),
                cont(12),
                cont(6),
                cont(0),
            ]);
            5
        }
        0x0400_0000..=MAX_ENCODABLE => {
            out.extend_from_slice(&[
                ((codepoint >> 30) & 0x01) as u8 | 0xFC,
                cont(24),
                cont(18),
                cont(12),
                cont(6),
                cont(0),
            ]);
            6
        }
        _ => 0,
    }
}

/// Encode a codepoint sequence, stopping at the first zero codepoint.
pub fn encode_string(codepoints: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(codepoints.len());
    for &cp in codepoints.iter().take_while(|&&cp| cp != 0) {
        encode_one(cp, &mut out);
    }
    out
}
