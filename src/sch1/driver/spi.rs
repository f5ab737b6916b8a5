use embassy_time::{with_timeout, Duration, Timer};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;
use log::warn;

use super::Sch1Driver;
use crate::sch1::frame::Frame;

/// upper bound for one 48 bit transfer
const TRANSFER_TIMEOUT: Duration = Duration::from_millis(10);
const RESET_PULSE_MS: u64 = 2;

#[derive(Debug)]
pub enum Sch1SpiError {
    Spi,
}

pub struct Sch1SpiDriver<SPI: SpiBus, CS: OutputPin, RST: OutputPin> {
    pub spi_device: SPI,
    pub pin_cs: CS,
    pub pin_extresn: RST,
}

impl<SPI: SpiBus, CS: OutputPin, RST: OutputPin> Sch1Driver for Sch1SpiDriver<SPI, CS, RST> {
    type Error = Sch1SpiError;

    async fn transaction(&mut self, request: Frame) -> Result<Frame, Sch1SpiError> {
        // three 16 bit words, MSB first
        let mut buf_tx = [0u8; 6];
        for (chunk, word) in buf_tx.chunks_exact_mut(2).zip(request.to_words()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        let mut buf_rx = [0u8; 6];

        let _ = self.pin_cs.set_low();
        let res = with_timeout(TRANSFER_TIMEOUT, async {
            self.spi_device.transfer(&mut buf_rx, &buf_tx).await?;
            self.spi_device.flush().await
        })
        .await;
        let _ = self.pin_cs.set_high();

        match res {
            Ok(Ok(())) => (),
            Ok(Err(_)) => return Err(Sch1SpiError::Spi),
            Err(_) => {
                // a timed out transfer reads as a blank frame, rejected by the
                // register checks and flagged as frame error by sample reads
                warn!("sch1 spi transfer timed out");
                return Ok(Frame(0));
            }
        }

        let mut words = [0u16; 3];
        for (word, chunk) in words.iter_mut().zip(buf_rx.chunks_exact(2)) {
            *word = u16::from_be_bytes([chunk[0], chunk[1]]);
        }
        Ok(Frame::from_words(words))
    }

    async fn hardware_reset(&mut self) -> Result<(), Self::Error> {
        let _ = self.pin_cs.set_high();
        let _ = self.pin_extresn.set_low();
        Timer::after_millis(RESET_PULSE_MS).await;
        let _ = self.pin_extresn.set_high();
        Ok(())
    }
}
