use crate::sch1::frame::Frame;

/// every status register reads all ones when its block is healthy
pub const STATUS_OK: u16 = 0xFFFF;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Sch1Status {
    pub summary: u16,
    pub summary_sat: u16,
    pub common: u16,
    pub rate_common: u16,
    pub rate_x: u16,
    pub rate_y: u16,
    pub rate_z: u16,
    pub acc_x: u16,
    pub acc_y: u16,
    pub acc_z: u16,
}

impl Sch1Status {
    /// `frames` in the order of [`super::registers::STATUS_REGS`]
    pub fn from_frames(frames: &[Frame; 10]) -> Self {
        let [summary, summary_sat, common, rate_common, rate_x, rate_y, rate_z, acc_x, acc_y, acc_z] =
            frames.map(|f| f.data_u16());
        Self {
            summary,
            summary_sat,
            common,
            rate_common,
            rate_x,
            rate_y,
            rate_z,
            acc_x,
            acc_y,
            acc_z,
        }
    }

    pub fn is_ok(&self) -> bool {
        [
            self.summary,
            self.summary_sat,
            self.common,
            self.rate_common,
            self.rate_x,
            self.rate_y,
            self.rate_z,
            self.acc_x,
            self.acc_y,
            self.acc_z,
        ]
        .iter()
        .all(|&s| s == STATUS_OK)
    }
}
