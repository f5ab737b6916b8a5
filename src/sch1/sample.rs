use super::{
    chip::{Reader, Reg, Sch1},
    driver::Sch1Driver,
    frame::{any_frame_error, Frame},
};

/// Channel values as read from the sensor, 20 bit sign extended.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RawSample {
    /// interpolated rate, Rate_XYZ1
    pub rate1: [i32; 3],
    /// interpolated acceleration, Acc_XYZ1
    pub acc1: [i32; 3],
    /// decimated rate, Rate_XYZ2
    pub rate2: [i32; 3],
    /// decimated acceleration, Acc_XYZ2
    pub acc2: [i32; 3],
    pub temp: i32,
    /// at least one response carried an error flag
    pub frame_error: bool,
}

impl RawSample {
    /// adds `other` channel by channel, for averaging over several reads
    pub fn accumulate(&mut self, other: &RawSample) {
        let add = |acc: &mut [i32; 3], v: &[i32; 3]| {
            for (a, v) in acc.iter_mut().zip(v) {
                *a = a.saturating_add(*v);
            }
        };
        add(&mut self.rate1, &other.rate1);
        add(&mut self.acc1, &other.acc1);
        add(&mut self.rate2, &other.rate2);
        add(&mut self.acc2, &other.acc2);
        self.temp = self.temp.saturating_add(other.temp);
        self.frame_error |= other.frame_error;
    }
}

const PRIMARY_REGS: [Reg; 7] = [
    Reg::RATE_X1,
    Reg::RATE_Y1,
    Reg::RATE_Z1,
    Reg::ACC_X1,
    Reg::ACC_Y1,
    Reg::ACC_Z1,
    Reg::TEMP,
];

const SECONDARY_REGS: [Reg; 7] = [
    Reg::RATE_X2,
    Reg::RATE_Y2,
    Reg::RATE_Z2,
    Reg::ACC_X2,
    Reg::ACC_Y2,
    Reg::ACC_Z2,
    Reg::TEMP,
];

async fn read_block<'a, D: Sch1Driver>(chip: &mut Sch1<'a, D>, regs: &[Reg; 7]) -> Result<[Frame; 7], D::Error> {
    let mut frames = [Frame::default(); 7];
    let mut reader = Reader::create(chip);
    for (reg, output) in regs.iter().zip(frames.iter_mut()) {
        reader = reader.read(*reg, output).await?;
    }
    reader.end().await?;
    Ok(frames)
}

fn split(frames: &[Frame; 7]) -> ([i32; 3], [i32; 3]) {
    let [rx, ry, rz, ax, ay, az, _] = frames.map(|f| f.data_i32());
    ([rx, ry, rz], [ax, ay, az])
}

/// Reads Rate_XYZ1, Acc_XYZ1 and the temperature.
pub async fn read_primary<'a, D: Sch1Driver>(chip: &mut Sch1<'a, D>) -> Result<RawSample, D::Error> {
    let frames = read_block(chip, &PRIMARY_REGS).await?;
    let (rate1, acc1) = split(&frames);

    Ok(RawSample {
        rate1,
        acc1,
        // temperature has 16 significant bits
        temp: frames[6].data_i32() >> 4,
        frame_error: any_frame_error(&frames),
        ..Default::default()
    })
}

/// Reads Rate_XYZ2 and Acc_XYZ2 into `sample`, keeping its temperature.
pub async fn read_secondary<'a, D: Sch1Driver>(chip: &mut Sch1<'a, D>, sample: &mut RawSample) -> Result<(), D::Error> {
    let frames = read_block(chip, &SECONDARY_REGS).await?;
    let (rate2, acc2) = split(&frames);

    sample.rate2 = rate2;
    sample.acc2 = acc2;
    sample.frame_error |= any_frame_error(&frames);
    Ok(())
}

pub async fn read_samples<'a, D: Sch1Driver>(chip: &mut Sch1<'a, D>) -> Result<RawSample, D::Error> {
    let mut sample = read_primary(chip).await?;
    read_secondary(chip, &mut sample).await?;
    Ok(sample)
}
