use serde::{Deserialize, Serialize};

/// marker for the filter bypass setting in Hz based configuration
pub const FILTER_BYPASS: u16 = 0;

/// Codes the sensor falls back to when a value has no mapping. The driver
/// never writes these; out of range values are rejected instead.
pub const FALLBACK_FILTER_CODE: u8 = 0b000;
pub const FALLBACK_RATE_SENS_CODE: u8 = 0b001;
pub const FALLBACK_ACC_SENS_CODE: u8 = 0b000;
pub const FALLBACK_DECIMATION_CODE: u8 = 0b000;

/// LPF1 nominal cut-off frequency (-3dB)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterCutoff {
    Hz68 = 0b000,
    Hz30 = 0b001,
    Hz13 = 0b010,
    Hz280 = 0b011,
    Hz370 = 0b100,
    Hz235 = 0b101,
    Bypass = 0b111,
}

impl FilterCutoff {
    pub fn from_hz(hz: u16) -> Option<Self> {
        match hz {
            13 => Some(Self::Hz13),
            30 => Some(Self::Hz30),
            68 => Some(Self::Hz68),
            235 => Some(Self::Hz235),
            280 => Some(Self::Hz280),
            370 => Some(Self::Hz370),
            FILTER_BYPASS => Some(Self::Bypass),
            _ => None,
        }
    }

    pub fn hz(self) -> u16 {
        match self {
            Self::Hz13 => 13,
            Self::Hz30 => 30,
            Self::Hz68 => 68,
            Self::Hz235 => 235,
            Self::Hz280 => 280,
            Self::Hz370 => 370,
            Self::Bypass => FILTER_BYPASS,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0b000 => Some(Self::Hz68),
            0b001 => Some(Self::Hz30),
            0b010 => Some(Self::Hz13),
            0b011 => Some(Self::Hz280),
            0b100 => Some(Self::Hz370),
            0b101 => Some(Self::Hz235),
            0b111 => Some(Self::Bypass),
            _ => None,
        }
    }
}

/// rate channel sensitivity in LSB / (deg/s)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSensitivity {
    Lsb1600 = 0b010,
    Lsb3200 = 0b011,
    Lsb6400 = 0b100,
}

impl RateSensitivity {
    pub fn from_lsb(sens: u16) -> Option<Self> {
        match sens {
            1600 => Some(Self::Lsb1600),
            3200 => Some(Self::Lsb3200),
            6400 => Some(Self::Lsb6400),
            _ => None,
        }
    }

    pub fn lsb(self) -> u16 {
        match self {
            Self::Lsb1600 => 1600,
            Self::Lsb3200 => 3200,
            Self::Lsb6400 => 6400,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0b010 => Some(Self::Lsb1600),
            0b011 => Some(Self::Lsb3200),
            0b100 => Some(Self::Lsb6400),
            _ => None,
        }
    }
}

/// acceleration channel sensitivity in LSB / (m/s²)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccSensitivity {
    Lsb3200 = 0b001,
    Lsb6400 = 0b010,
    Lsb12800 = 0b011,
    Lsb25600 = 0b100,
}

impl AccSensitivity {
    pub fn from_lsb(sens: u16) -> Option<Self> {
        match sens {
            3200 => Some(Self::Lsb3200),
            6400 => Some(Self::Lsb6400),
            12800 => Some(Self::Lsb12800),
            25600 => Some(Self::Lsb25600),
            _ => None,
        }
    }

    pub fn lsb(self) -> u16 {
        match self {
            Self::Lsb3200 => 3200,
            Self::Lsb6400 => 6400,
            Self::Lsb12800 => 12800,
            Self::Lsb25600 => 25600,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0b001 => Some(Self::Lsb3200),
            0b010 => Some(Self::Lsb6400),
            0b011 => Some(Self::Lsb12800),
            0b100 => Some(Self::Lsb25600),
            _ => None,
        }
    }
}

/// output sample rate decimation of the XYZ2 channels
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decimation {
    X2 = 0b000,
    X4 = 0b001,
    X8 = 0b010,
    X16 = 0b011,
    X32 = 0b100,
}

impl Decimation {
    pub fn from_factor(decimation: u16) -> Option<Self> {
        match decimation {
            2 => Some(Self::X2),
            4 => Some(Self::X4),
            8 => Some(Self::X8),
            16 => Some(Self::X16),
            32 => Some(Self::X32),
            _ => None,
        }
    }

    pub fn factor(self) -> u16 {
        match self {
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
            Self::X16 => 16,
            Self::X32 => 32,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0b000 => Some(Self::X2),
            0b001 => Some(Self::X4),
            0b010 => Some(Self::X8),
            0b011 => Some(Self::X16),
            0b100 => Some(Self::X32),
            _ => None,
        }
    }
}

pub fn is_valid_filter_freq(hz: u16) -> bool {
    FilterCutoff::from_hz(hz).is_some()
}

pub fn is_valid_rate_sens(sens: u16) -> bool {
    RateSensitivity::from_lsb(sens).is_some()
}

pub fn is_valid_acc_sens(sens: u16) -> bool {
    AccSensitivity::from_lsb(sens).is_some()
}

pub fn is_valid_decimation(decimation: u16) -> bool {
    Decimation::from_factor(decimation).is_some()
}

/// inverse mappings used when reading registers back, 0 for unknown codes
pub fn rate_sens_from_code(code: u8) -> u16 {
    RateSensitivity::from_code(code).map_or(0, RateSensitivity::lsb)
}

pub fn acc_sens_from_code(code: u8) -> u16 {
    AccSensitivity::from_code(code).map_or(0, AccSensitivity::lsb)
}

pub fn decimation_from_code(code: u8) -> u16 {
    Decimation::from_code(code).map_or(0, Decimation::factor)
}

/// FILT_RATE / FILT_ACC12 / FILT_ACC3 register layout: one 3 bit code per axis
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FilterCtrl {
    pub z: u8,
    pub y: u8,
    pub x: u8,
}

impl FilterCtrl {
    /// the same cut-off on all three axes
    pub fn uniform(cutoff: FilterCutoff) -> Self {
        let code = cutoff.code();
        Self { z: code, y: code, x: code }
    }

    pub fn pack(&self) -> u32 {
        let mut reg = 0;
        reg |= self.x as u32 & 0x7;
        reg |= (self.y as u32 & 0x7) << 3;
        reg |= (self.z as u32 & 0x7) << 6;
        reg
    }

    pub fn unpack(data: u32) -> Self {
        Self {
            x: (data & 0x7) as u8,
            y: ((data >> 3) & 0x7) as u8,
            z: ((data >> 6) & 0x7) as u8,
        }
    }
}

/// RATE_CTRL / ACC12_CTRL register layout
///
/// ```text
/// bits 14..12  XYZ1 sensitivity
/// bits 11..9   XYZ2 sensitivity
/// bits  8..6   Z2 decimation
/// bits  5..3   Y2 decimation
/// bits  2..0   X2 decimation
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SensDecCtrl {
    pub xyz1_sens: u8,
    pub xyz2_sens: u8,
    pub z2_dec: u8,
    pub y2_dec: u8,
    pub x2_dec: u8,
}

impl SensDecCtrl {
    /// the sensor expects the same decimation on every XYZ2 axis, so the one
    /// decimation code is copied into all three slots
    pub fn new(xyz1_sens: u8, xyz2_sens: u8, decimation: u8) -> Self {
        Self {
            xyz1_sens,
            xyz2_sens,
            z2_dec: decimation,
            y2_dec: decimation,
            x2_dec: decimation,
        }
    }

    pub fn pack(&self) -> u32 {
        let mut reg = 0;
        reg |= self.x2_dec as u32 & 0x7;
        reg |= (self.y2_dec as u32 & 0x7) << 3;
        reg |= (self.z2_dec as u32 & 0x7) << 6;
        reg |= (self.xyz2_sens as u32 & 0x7) << 9;
        reg |= (self.xyz1_sens as u32 & 0x7) << 12;
        reg
    }

    pub fn unpack(data: u32) -> Self {
        Self {
            xyz1_sens: ((data >> 12) & 0x7) as u8,
            xyz2_sens: ((data >> 9) & 0x7) as u8,
            z2_dec: ((data >> 6) & 0x7) as u8,
            y2_dec: ((data >> 3) & 0x7) as u8,
            x2_dec: (data & 0x7) as u8,
        }
    }
}

/// MODE_CTRL bits
pub const MODE_EN_SENSOR: u32 = 0x01;
pub const MODE_EOI_CTRL: u32 = 0x02;

/// USER_IF_CTRL bits
pub const USER_IF_DRY_ACTIVE_LOW: u32 = 0x40;
pub const USER_IF_DRY_ENABLE: u32 = 0x20;

/// CTRL_RESET value requesting a soft reset
pub const SOFT_RESET_DATA: u32 = 0x0A;

/// DRY pin polarity as accepted by [`super::Sch1::set_dry`]
pub const DRY_POLARITY_KEEP: i8 = -1;
pub const DRY_POLARITY_ACTIVE_HIGH: i8 = 0;
pub const DRY_POLARITY_ACTIVE_LOW: i8 = 1;

/// Filter cut-off frequencies in Hz, 0 selects bypass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sch1Filter {
    /// Rate_XYZ1 and Rate_XYZ2
    pub rate12: u16,
    /// Acc_XYZ1 and Acc_XYZ2
    pub acc12: u16,
    /// Acc_XYZ3
    pub acc3: u16,
}

impl Default for Sch1Filter {
    fn default() -> Self {
        Self {
            rate12: 30,
            acc12: 30,
            acc3: 30,
        }
    }
}

impl Sch1Filter {
    pub fn is_valid(&self) -> bool {
        [self.rate12, self.acc12, self.acc3].into_iter().all(is_valid_filter_freq)
    }
}

/// Sensitivities in LSB per unit for 20 bit data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sch1Sensitivity {
    pub rate1: u16,
    pub rate2: u16,
    pub acc1: u16,
    pub acc2: u16,
    pub acc3: u16,
}

impl Default for Sch1Sensitivity {
    fn default() -> Self {
        Self {
            rate1: 1600,
            rate2: 1600,
            acc1: 3200,
            acc2: 3200,
            acc3: 3200,
        }
    }
}

impl Sch1Sensitivity {
    pub fn is_valid(&self) -> bool {
        [self.rate1, self.rate2].into_iter().all(is_valid_rate_sens)
            && [self.acc1, self.acc2, self.acc3].into_iter().all(is_valid_acc_sens)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sch1Decimation {
    pub rate2: u16,
    pub acc2: u16,
}

impl Default for Sch1Decimation {
    fn default() -> Self {
        Self { rate2: 32, acc2: 32 }
    }
}

impl Sch1Decimation {
    pub fn is_valid(&self) -> bool {
        is_valid_decimation(self.rate2) && is_valid_decimation(self.acc2)
    }
}

/// RATE_CTRL content in physical units
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RateSensDec {
    pub sens_rate1: u16,
    pub sens_rate2: u16,
    pub dec_rate2: u16,
}

/// ACC12_CTRL and ACC3_CTRL content in physical units
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AccSensDec {
    pub sens_acc1: u16,
    pub sens_acc2: u16,
    pub sens_acc3: u16,
    pub dec_acc2: u16,
}
