//! CRC-32 as used by PNG chunks (ISO 3309, polynomial 0xedb88320).

const CRC_TABLE: [u32; 256] = {
    let mut table = [0; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut i = 0;
        while i < 8 {
            if c & 1 != 0 {
                c = 0xedb88320 ^ (c >> 1);
            } else {
                c >>= 1;
            }
            i += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
};

/// Checksum of a chunk: covers the four tag bytes and the payload, not the
/// length field.
pub fn chunk_crc(tag: &[u8; 4], data: &[u8]) -> u32 {
    let crc = update(0xffffffff, tag);
    update(crc, data) ^ 0xffffffff
}

fn update(crc: u32, data: &[u8]) -> u32 {
    data.iter().fold(crc, |crc, &b| {
        CRC_TABLE[((crc ^ b as u32) & 0xff) as usize] ^ (crc >> 8)
    })
}
