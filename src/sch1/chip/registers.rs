use crate::sch1::frame::Frame;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(non_camel_case_types, unused)]
pub enum Reg {
    /// interpolated rate outputs
    RATE_X1 = 0x01,
    RATE_Y1 = 0x02,
    RATE_Z1 = 0x03,
    /// interpolated acceleration outputs
    ACC_X1 = 0x04,
    ACC_Y1 = 0x05,
    ACC_Z1 = 0x06,
    /// acceleration outputs with the ACC3 filter
    ACC_X3 = 0x07,
    ACC_Y3 = 0x08,
    ACC_Z3 = 0x09,
    /// decimated rate outputs
    RATE_X2 = 0x0A,
    RATE_Y2 = 0x0B,
    RATE_Z2 = 0x0C,
    /// decimated acceleration outputs
    ACC_X2 = 0x0D,
    ACC_Y2 = 0x0E,
    ACC_Z2 = 0x0F,
    TEMP = 0x10,

    // status
    STAT_SUM = 0x14,
    STAT_SUM_SAT = 0x15,
    STAT_COM = 0x16,
    STAT_RATE_COM = 0x17,
    STAT_RATE_X = 0x18,
    STAT_RATE_Y = 0x19,
    STAT_RATE_Z = 0x1A,
    STAT_ACC_X = 0x1B,
    STAT_ACC_Y = 0x1C,
    STAT_ACC_Z = 0x1D,

    // user controls
    CTRL_FILT_RATE = 0x25,
    CTRL_FILT_ACC12 = 0x26,
    CTRL_FILT_ACC3 = 0x27,
    CTRL_RATE = 0x28,
    CTRL_ACC12 = 0x29,
    CTRL_ACC3 = 0x2A,
    CTRL_USER_IF = 0x33,
    CTRL_MODE = 0x35,
    CTRL_RESET = 0x36,

    // traceability
    COMP_ID = 0x3C,
    SN_ID1 = 0x3D,
    SN_ID2 = 0x3E,
    SN_ID3 = 0x3F,
}

impl Reg {
    pub fn addr(&self) -> u8 {
        *self as u8
    }

    pub fn read_request(&self) -> Frame {
        Frame::read_request(self.addr())
    }

    pub fn write_request(&self, data: u32) -> Frame {
        Frame::write_request(self.addr(), data)
    }
}

/// status registers in the order they are read out
pub const STATUS_REGS: [Reg; 10] = [
    Reg::STAT_SUM,
    Reg::STAT_SUM_SAT,
    Reg::STAT_COM,
    Reg::STAT_RATE_COM,
    Reg::STAT_RATE_X,
    Reg::STAT_RATE_Y,
    Reg::STAT_RATE_Z,
    Reg::STAT_ACC_X,
    Reg::STAT_ACC_Y,
    Reg::STAT_ACC_Z,
];
