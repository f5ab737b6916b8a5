use super::crc::{crc8, verify_crc8};

/// target address field of a request (TA[9:0])
pub const TA_FIELD_MASK: u64 = 0xFFC0_0000_0000;
/// source address field of a response (SA[9:0])
pub const SA_FIELD_MASK: u64 = 0x7FE0_0000_0000;
pub const DATA_FIELD_MASK: u64 = 0x0000_0FFF_FF00;
pub const CRC_FIELD_MASK: u64 = 0x0000_0000_00FF;
/// error flags of a response
pub const ERROR_FIELD_MASK: u64 = 0x001E_0000_0000;

const TA_SHIFT: u32 = 38;
const SA_SHIFT: u32 = 37;
const DATA_SHIFT: u32 = 8;
const RW_BIT: u64 = 1 << 37;
/// frame type bit, always set for 48 bit frames
const FT_BIT: u64 = 1 << 35;

const FRAME_MASK: u64 = 0xFFFF_FFFF_FFFF;

/// A 48 bit SPI frame, stored in the low bits of a `u64`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame(pub u64);

impl Frame {
    /// request reading the register at `address`
    pub fn read_request(address: u8) -> Self {
        Self::request(address, false, 0)
    }

    /// request writing the 20 bit `data` into the register at `address`
    pub fn write_request(address: u8, data: u32) -> Self {
        Self::request(address, true, data)
    }

    fn request(address: u8, write: bool, data: u32) -> Self {
        let mut frame = ((address as u64) << TA_SHIFT) | FT_BIT;
        if write {
            frame |= RW_BIT;
        }
        frame |= ((data as u64) << DATA_SHIFT) & DATA_FIELD_MASK;
        Self(frame).with_crc()
    }

    /// replaces the CRC field with the CRC-8 of the upper 40 bits
    pub fn with_crc(self) -> Self {
        let frame = self.0 & FRAME_MASK & !CRC_FIELD_MASK;
        Self(frame | crc8(frame) as u64)
    }

    pub fn target_address(&self) -> u16 {
        ((self.0 & TA_FIELD_MASK) >> TA_SHIFT) as u16
    }

    pub fn source_address(&self) -> u16 {
        ((self.0 & SA_FIELD_MASK) >> SA_SHIFT) as u16
    }

    /// raw 20 bit data field
    pub fn data(&self) -> u32 {
        ((self.0 & DATA_FIELD_MASK) >> DATA_SHIFT) as u32
    }

    /// data field sign-extended from 20 bits
    pub fn data_i32(&self) -> i32 {
        (((self.0 << 4) as u32 & 0xFFFF_F000) as i32) >> 12
    }

    pub fn data_u16(&self) -> u16 {
        (self.0 >> DATA_SHIFT) as u16
    }

    pub fn error_bits(&self) -> u8 {
        ((self.0 & ERROR_FIELD_MASK) >> 33) as u8
    }

    pub fn has_error(&self) -> bool {
        self.0 & ERROR_FIELD_MASK != 0
    }

    pub fn crc(&self) -> u8 {
        (self.0 & CRC_FIELD_MASK) as u8
    }

    pub fn crc_ok(&self) -> bool {
        verify_crc8(self.0)
    }

    /// all ones or all zeros, what a floating or stuck MISO line reads
    pub fn is_blank(&self) -> bool {
        let frame = self.0 & FRAME_MASK;
        frame == FRAME_MASK || frame == 0
    }

    /// response that can not be trusted: error flag, blank or CRC mismatch
    pub fn is_corrupt(&self) -> bool {
        self.has_error() || self.is_blank() || !self.crc_ok()
    }

    /// split into the three 16 bit words sent on the bus, most significant first
    pub fn to_words(&self) -> [u16; 3] {
        [(self.0 >> 32) as u16, (self.0 >> 16) as u16, self.0 as u16]
    }

    pub fn from_words(words: [u16; 3]) -> Self {
        Self(((words[0] as u64) << 32) | ((words[1] as u64) << 16) | words[2] as u64)
    }
}

/// true if any of the response words carries an error flag, reads blank or fails its CRC
pub fn any_frame_error(frames: &[Frame]) -> bool {
    frames.iter().any(Frame::is_corrupt)
}
