use crc::{Algorithm, Crc, CRC_8_OPENSAFETY};

// poly 0x2F with the 0xFF start value fed in as a leading message byte
const CRC_FRAME48: Crc<u8> = Crc::<u8>::new(&CRC_8_OPENSAFETY);

const CRC_3_SCH1: Algorithm<u8> = Algorithm {
    width: 3,
    poly: 0x3,
    init: 0x0,
    refin: false,
    refout: false,
    xorout: 0x0,
    check: 0x3,
    residue: 0x0,
};
const CRC_FRAME32: Crc<u8> = Crc::<u8>::new(&CRC_3_SCH1);

/// start value of the 48 bit frame CRC
const CRC8_INIT: u8 = 0xFF;
/// start value of the 32 bit frame CRC
const CRC3_INIT: u32 = 0b101;

/// CRC-8 (poly 0x2F, init 0xFF, MSB first, no final xor) of the upper 40 bits of a 48 bit frame.
///
/// The low byte (CRC field) is treated as zero, so the result is the value to place there.
pub fn crc8(frame: u64) -> u8 {
    let payload = (frame >> 8) & 0xFF_FFFF_FFFF;
    let bytes = payload.to_be_bytes();

    let mut digest = CRC_FRAME48.digest();
    digest.update(&[CRC8_INIT]);
    digest.update(&bytes[3..]);
    digest.finalize()
}

/// CRC-3 (poly 0x3, init 0x5) of the upper 29 bits of a 32 bit frame.
pub fn crc3(frame: u32) -> u8 {
    // the start value occupies the three bits in front of the payload, which
    // makes the whole message exactly four bytes long
    let message = (CRC3_INIT << 29) | (frame >> 3);
    CRC_FRAME32.checksum(&message.to_be_bytes())
}

pub fn verify_crc8(frame: u64) -> bool {
    (frame & 0xFF) as u8 == crc8(frame)
}

pub fn verify_crc3(frame: u32) -> bool {
    (frame & 0x07) as u8 == crc3(frame)
}
