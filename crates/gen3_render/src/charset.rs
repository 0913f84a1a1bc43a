//! The western 8-bit character set used for trainer names, nicknames and
//! wonder card text.

pub const TERMINATOR: u8 = 0xFF;

/// Decodes up to the first terminator. Bytes with no printable mapping come
/// out as `*`.
pub fn decode_text(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        if byte == TERMINATOR {
            break;
        }
        out.push(decode_char(byte));
    }
    out
}

pub fn decode_char(byte: u8) -> char {
    match byte {
        0x00 => ' ',
        0xA1..=0xAA => (b'0' + (byte - 0xA1)) as char,
        0xAB => '!',
        0xAC => '?',
        0xAD => '.',
        0xAE => '-',
        0xB0 => '…',
        0xB1 => '“',
        0xB2 => '”',
        0xB3 => '‘',
        0xB4 => '’',
        0xB5 => '♂',
        0xB6 => '♀',
        0xB8 => ',',
        0xBA => '/',
        0xBB..=0xD4 => (b'A' + (byte - 0xBB)) as char,
        0xD5..=0xEE => (b'a' + (byte - 0xD5)) as char,
        0xF0 => ':',
        _ => '*',
    }
}
