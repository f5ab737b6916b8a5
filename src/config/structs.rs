use embassy_time::Duration;
use fugit::{HertzU32, MicrosDurationU32};
use serde::{Deserialize, Serialize};

use crate::sch1::chip::{Sch1Decimation, Sch1Filter, Sch1Sensitivity};

/// highest supported acquisition rate, one cycle needs 16 transactions
pub const MAX_SAMPLE_RATE: u32 = 10_000;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Sch1Config {
    pub filter: Sch1Filter,
    pub sensitivity: Sch1Sensitivity,
    pub decimation: Sch1Decimation,
    /// route the data ready signal to the DRY pin
    pub enable_dry: bool,
    /// acquisition rate in Hz
    pub sample_rate: u32,
    // how many reads are summed into one result
    pub averaging_factor: u16,
}

impl Default for Sch1Config {
    fn default() -> Self {
        Self {
            filter: Default::default(),
            sensitivity: Default::default(),
            decimation: Default::default(),
            enable_dry: false,
            sample_rate: 1000,
            averaging_factor: 1,
        }
    }
}

impl Sch1Config {
    pub fn validate(&self) -> bool {
        if !(self.filter.is_valid() && self.sensitivity.is_valid() && self.decimation.is_valid()) {
            return false;
        }
        if !(1..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return false;
        }
        self.averaging_factor >= 1
    }

    /// time between two acquisition cycles
    pub fn sample_period(&self) -> Duration {
        let rate = HertzU32::from_raw(self.sample_rate.clamp(1, MAX_SAMPLE_RATE));
        let period: MicrosDurationU32 = rate.into_duration();
        Duration::from_micros(period.ticks() as u64)
    }
}
