use serde::{Deserialize, Serialize};

use super::{chip::Sch1Sensitivity, sample::RawSample};

/// temperature LSB per °C after dropping the four low bits
const TEMP_SENSITIVITY: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConversionParameters {
    /// LSB/(deg/s)
    pub sens_rate1: f32,
    pub sens_rate2: f32,
    /// LSB/(m/s²)
    pub sens_acc1: f32,
    pub sens_acc2: f32,
    /// number of raw samples summed into one
    pub averaging_factor: f32,
}

impl Default for ConversionParameters {
    fn default() -> Self {
        Self::from_config(&Sch1Sensitivity::default(), 1)
    }
}

impl ConversionParameters {
    pub fn from_config(sensitivity: &Sch1Sensitivity, averaging_factor: u16) -> Self {
        Self {
            sens_rate1: sensitivity.rate1 as f32,
            sens_rate2: sensitivity.rate2 as f32,
            sens_acc1: sensitivity.acc1 as f32,
            sens_acc2: sensitivity.acc2 as f32,
            averaging_factor: averaging_factor.max(1) as f32,
        }
    }

    pub fn convert(&self, raw: &RawSample) -> Sch1Result {
        let scale = |values: [i32; 3], sens: f32| values.map(|v| v as f32 / (sens * self.averaging_factor));

        Sch1Result {
            rate1: scale(raw.rate1, self.sens_rate1),
            acc1: scale(raw.acc1, self.sens_acc1),
            rate2: scale(raw.rate2, self.sens_rate2),
            acc2: scale(raw.acc2, self.sens_acc2),
            temp: raw.temp as f32 / (TEMP_SENSITIVITY * self.averaging_factor),
        }
    }
}

/// One sample in physical units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sch1Result {
    /// deg/s
    pub rate1: [f32; 3],
    /// m/s²
    pub acc1: [f32; 3],
    pub rate2: [f32; 3],
    pub acc2: [f32; 3],
    /// °C
    pub temp: f32,
}
