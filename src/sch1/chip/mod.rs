mod registers;
pub use registers::{Reg, STATUS_REGS};

mod reader;
pub use reader::Reader;

mod status;
pub use status::{Sch1Status, STATUS_OK};

pub mod configuration;
pub use configuration::*;

mod startup;

use core::fmt::Write;

use heapless::String;
use log::debug;

use super::{driver::Sch1Driver, frame::Frame};

/// What went wrong when a register did not read back as written.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProtocolFault {
    /// response was all ones or all zeros
    BlankFrame,
    /// response came from another register than the one addressed
    AddressMismatch { expected: u16, received: u16 },
    /// register content differs from what was written
    DataMismatch { written: u32, read: u32 },
}

#[derive(Debug, PartialEq)]
pub enum Sch1Error<E> {
    Bus(E),
    /// configuration value outside of the supported set, nothing was sent
    InvalidParameter,
    Other(ProtocolFault),
    /// startup failed twice, the sensor needs a full restart
    SensorInitFailed,
}

impl<E> From<E> for Sch1Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

/// Serial number string, 10 characters.
pub type SerialNumber = String<16>;

pub struct Sch1<'a, D: Sch1Driver> {
    pub driver: &'a mut D,
}

/// checks a register read back after `request` was sent
fn verify_response(request: Frame, response: Frame, check_data: bool) -> Result<(), ProtocolFault> {
    if response.is_blank() {
        return Err(ProtocolFault::BlankFrame);
    }
    if request.target_address() != response.source_address() {
        return Err(ProtocolFault::AddressMismatch {
            expected: request.target_address(),
            received: response.source_address(),
        });
    }
    if check_data && request.data() != response.data() {
        return Err(ProtocolFault::DataMismatch {
            written: request.data(),
            read: response.data(),
        });
    }
    Ok(())
}

fn valid<T, E>(value: Option<T>) -> Result<T, Sch1Error<E>> {
    value.ok_or(Sch1Error::InvalidParameter)
}

impl<'a, D: Sch1Driver> Sch1<'a, D> {
    pub fn new(driver: &'a mut D) -> Self {
        Self { driver }
    }

    pub async fn hardware_reset(&mut self) -> Result<(), Sch1Error<D::Error>> {
        self.driver.hardware_reset().await?;
        Ok(())
    }

    /// sends a write request, its response belongs to whatever was sent before
    async fn write(&mut self, request: Frame) -> Result<(), Sch1Error<D::Error>> {
        self.driver.transaction(request).await?;
        Ok(())
    }

    /// uses two driver transactions to read a register
    pub async fn read_register(&mut self, reg: Reg) -> Result<Frame, Sch1Error<D::Error>> {
        let mut response = Frame::default();
        Reader::create(self).read(reg, &mut response).await?.end().await?;
        Ok(response)
    }

    fn check(request: Frame, response: Frame, check_data: bool) -> Result<(), Sch1Error<D::Error>> {
        verify_response(request, response, check_data).map_err(|fault| {
            debug!("sch1 register {:#04x} verify failed: {fault:?}", request.target_address());
            Sch1Error::Other(fault)
        })
    }

    /// Sets the cut-off frequency (Hz, 0 = bypass) of the rate, acc12 and acc3 filters.
    pub async fn set_filters(
        &mut self,
        freq_rate12: u16,
        freq_acc12: u16,
        freq_acc3: u16,
    ) -> Result<(), Sch1Error<D::Error>> {
        let rate12 = valid(FilterCutoff::from_hz(freq_rate12))?;
        let acc12 = valid(FilterCutoff::from_hz(freq_acc12))?;
        let acc3 = valid(FilterCutoff::from_hz(freq_acc3))?;

        let requests = [
            Reg::CTRL_FILT_RATE.write_request(FilterCtrl::uniform(rate12).pack()),
            Reg::CTRL_FILT_ACC12.write_request(FilterCtrl::uniform(acc12).pack()),
            Reg::CTRL_FILT_ACC3.write_request(FilterCtrl::uniform(acc3).pack()),
        ];
        for request in requests {
            self.write(request).await?;
        }

        let mut responses = [Frame::default(); 3];
        let [rate12_out, acc12_out, acc3_out] = &mut responses;
        Reader::create(self)
            .read(Reg::CTRL_FILT_RATE, rate12_out).await?
            .read(Reg::CTRL_FILT_ACC12, acc12_out).await?
            .read(Reg::CTRL_FILT_ACC3, acc3_out).await?
            .end().await?;

        for (request, response) in requests.into_iter().zip(responses) {
            Self::check(request, response, true)?;
        }
        Ok(())
    }

    /// Sets Rate_XYZ1 and Rate_XYZ2 sensitivity (LSB/dps) and the Rate_XYZ2 decimation.
    pub async fn set_rate_sens_dec(
        &mut self,
        sens_rate1: u16,
        sens_rate2: u16,
        dec_rate2: u16,
    ) -> Result<(), Sch1Error<D::Error>> {
        let sens1 = valid(RateSensitivity::from_lsb(sens_rate1))?;
        let sens2 = valid(RateSensitivity::from_lsb(sens_rate2))?;
        let dec = valid(Decimation::from_factor(dec_rate2))?;

        let field = SensDecCtrl::new(sens1.code(), sens2.code(), dec.code());
        let request = Reg::CTRL_RATE.write_request(field.pack());
        self.write(request).await?;

        let response = self.read_register(Reg::CTRL_RATE).await?;
        Self::check(request, response, true)
    }

    pub async fn get_rate_sens_dec(&mut self) -> Result<RateSensDec, Sch1Error<D::Error>> {
        let response = self.read_register(Reg::CTRL_RATE).await?;
        Self::check(Reg::CTRL_RATE.read_request(), response, false)?;

        let field = SensDecCtrl::unpack(response.data());
        Ok(RateSensDec {
            sens_rate1: rate_sens_from_code(field.xyz1_sens),
            sens_rate2: rate_sens_from_code(field.xyz2_sens),
            dec_rate2: decimation_from_code(field.x2_dec),
        })
    }

    /// Sets Acc_XYZ1, Acc_XYZ2 and Acc_XYZ3 sensitivity (LSB/(m/s²)) and the Acc_XYZ2 decimation.
    pub async fn set_acc_sens_dec(
        &mut self,
        sens_acc1: u16,
        sens_acc2: u16,
        sens_acc3: u16,
        dec_acc2: u16,
    ) -> Result<(), Sch1Error<D::Error>> {
        let sens1 = valid(AccSensitivity::from_lsb(sens_acc1))?;
        let sens2 = valid(AccSensitivity::from_lsb(sens_acc2))?;
        let sens3 = valid(AccSensitivity::from_lsb(sens_acc3))?;
        let dec = valid(Decimation::from_factor(dec_acc2))?;

        let field = SensDecCtrl::new(sens1.code(), sens2.code(), dec.code());
        let requests = [
            Reg::CTRL_ACC12.write_request(field.pack()),
            Reg::CTRL_ACC3.write_request(sens3.code() as u32),
        ];
        for request in requests {
            self.write(request).await?;
        }

        let responses = self.read_acc_ctrl().await?;
        for (request, response) in requests.into_iter().zip(responses) {
            Self::check(request, response, true)?;
        }
        Ok(())
    }

    pub async fn get_acc_sens_dec(&mut self) -> Result<AccSensDec, Sch1Error<D::Error>> {
        let [acc12, acc3] = self.read_acc_ctrl().await?;
        Self::check(Reg::CTRL_ACC12.read_request(), acc12, false)?;
        Self::check(Reg::CTRL_ACC3.read_request(), acc3, false)?;

        let field = SensDecCtrl::unpack(acc12.data());
        Ok(AccSensDec {
            sens_acc1: acc_sens_from_code(field.xyz1_sens),
            sens_acc2: acc_sens_from_code(field.xyz2_sens),
            sens_acc3: acc_sens_from_code((acc3.data() & 0x7) as u8),
            dec_acc2: decimation_from_code(field.x2_dec),
        })
    }

    async fn read_acc_ctrl(&mut self) -> Result<[Frame; 2], Sch1Error<D::Error>> {
        let mut responses = [Frame::default(); 2];
        let [acc12_out, acc3_out] = &mut responses;
        Reader::create(self)
            .read(Reg::CTRL_ACC12, acc12_out).await?
            .read(Reg::CTRL_ACC3, acc3_out).await?
            .end().await?;
        Ok(responses)
    }

    /// Writes EN_SENSOR and EOI_CTRL.
    ///
    /// Only the address of the read back is checked, the other MODE_CTRL bits
    /// are managed by the sensor.
    pub async fn enable_measurement(
        &mut self,
        enable_sensor: bool,
        set_eoi: bool,
    ) -> Result<(), Sch1Error<D::Error>> {
        let mut data = 0;
        if enable_sensor {
            data |= MODE_EN_SENSOR;
        }
        if set_eoi {
            data |= MODE_EOI_CTRL;
        }
        let request = Reg::CTRL_MODE.write_request(data);
        self.write(request).await?;

        let response = self.read_register(Reg::CTRL_MODE).await?;
        Self::check(request, response, false)
    }

    /// Configures the DRY pin: `polarity` 0 = active high, 1 = active low,
    /// -1 = keep the current polarity.
    pub async fn set_dry(&mut self, polarity: i8, enable: bool) -> Result<(), Sch1Error<D::Error>> {
        if !(DRY_POLARITY_KEEP..=DRY_POLARITY_ACTIVE_LOW).contains(&polarity) {
            return Err(Sch1Error::InvalidParameter);
        }

        // patch only a verified copy of the register
        let current = self.read_register(Reg::CTRL_USER_IF).await?;
        Self::check(Reg::CTRL_USER_IF.read_request(), current, false)?;
        let mut data = current.data();

        match polarity {
            DRY_POLARITY_ACTIVE_HIGH => data &= !USER_IF_DRY_ACTIVE_LOW,
            DRY_POLARITY_ACTIVE_LOW => data |= USER_IF_DRY_ACTIVE_LOW,
            _ => (),
        }
        if enable {
            data |= USER_IF_DRY_ENABLE;
        } else {
            data &= !USER_IF_DRY_ENABLE;
        }

        let request = Reg::CTRL_USER_IF.write_request(data);
        self.write(request).await?;

        let response = self.read_register(Reg::CTRL_USER_IF).await?;
        Self::check(request, response, true)
    }

    pub async fn read_status(&mut self) -> Result<Sch1Status, Sch1Error<D::Error>> {
        let mut frames = [Frame::default(); 10];
        let mut reader = Reader::create(self);
        for (reg, output) in STATUS_REGS.iter().zip(frames.iter_mut()) {
            reader = reader.read(*reg, output).await?;
        }
        reader.end().await?;
        Ok(Sch1Status::from_frames(&frames))
    }

    /// Reads the traceability registers, formatted like the part label.
    pub async fn serial_number(&mut self) -> Result<SerialNumber, Sch1Error<D::Error>> {
        let mut ids = [Frame::default(); 3];
        let [id1, id2, id3] = &mut ids;
        Reader::create(self)
            .read(Reg::SN_ID1, id1).await?
            .read(Reg::SN_ID2, id2).await?
            .read(Reg::SN_ID3, id3).await?
            .end().await?;
        let [id1, id2, id3] = ids.map(|f| f.data_u16());

        let mut serial = String::new();
        let _ = write!(serial, "{:05}{:01X}{:04X}", id2, id1 & 0x000F, id3);
        Ok(serial)
    }

    pub async fn component_id(&mut self) -> Result<u16, Sch1Error<D::Error>> {
        Ok(self.read_register(Reg::COMP_ID).await?.data_u16())
    }

    /// SPI soft reset, equivalent to pulsing EXTRESN
    pub async fn soft_reset(&mut self) -> Result<(), Sch1Error<D::Error>> {
        self.write(Reg::CTRL_RESET.write_request(SOFT_RESET_DATA)).await
    }
}
