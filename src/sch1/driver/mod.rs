pub mod spi;

use super::frame::Frame;

/// Access to one SCH1 sensor on a dedicated bus.
///
/// Every transaction is full duplex: while `request` is shifted out, the
/// answer to the *previous* request is shifted in.
#[allow(async_fn_in_trait)]
pub trait Sch1Driver {
    type Error;

    async fn transaction(&mut self, request: Frame) -> Result<Frame, Self::Error>;

    // EXTRESN has to be held low for at least 2 ms, the sensor then reloads
    // its NVM which takes another 32 ms before it answers (handled by the caller).
    async fn hardware_reset(&mut self) -> Result<(), Self::Error>;
}
