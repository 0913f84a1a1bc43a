use byteorder::{ByteOrder, LittleEndian};

pub const CRC16_SEED: u16 = 0x1121;

const CRC16_POLY_REFLECTED: u16 = 0x8408;

const fn build_crc16_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u16;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ CRC16_POLY_REFLECTED
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Reflected CCITT table, identical to the one shipped in the game ROMs.
pub const CRC16_TABLE: [u16; 256] = build_crc16_table();

/// Section checksum: little-endian u32 words summed with wraparound, then the
/// two halves of the sum folded into 16 bits.
///
/// Covered ranges are always word aligned; a trailing partial word is ignored.
pub fn block_checksum(bytes: &[u8]) -> u16 {
    debug_assert!(bytes.len() % 4 == 0, "block checksum over unaligned length");
    let sum = bytes
        .chunks_exact(4)
        .map(LittleEndian::read_u32)
        .fold(0u32, u32::wrapping_add);
    ((sum & 0xFFFF) + ((sum >> 16) & 0xFFFF)) as u16
}

/// CRC16 protecting the wonder card and event script records.
pub fn crc16(bytes: &[u8]) -> u16 {
    let crc = bytes.iter().fold(CRC16_SEED, |crc, &b| {
        CRC16_TABLE[((crc ^ b as u16) & 0xFF) as usize] ^ (crc >> 8)
    });
    !crc
}
