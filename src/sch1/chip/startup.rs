use core::fmt::Debug;

use embassy_time::Timer;
use log::{info, warn};

use super::{configuration::DRY_POLARITY_ACTIVE_HIGH, Sch1, Sch1Error, Sch1Status};
use crate::{config::Sch1Config, sch1::driver::Sch1Driver};

/// NVM read after reset
const NVM_LOAD_MS: u64 = 32;
/// signal path settling after EN_SENSOR
const SETTLE_MS: u64 = 215;
/// end of initialization to first valid status
const EOI_MS: u64 = 3;

const INIT_ATTEMPTS: usize = 2;

impl<'a, D: Sch1Driver> Sch1<'a, D>
where
    D::Error: Debug,
{
    /// Resets the sensor, writes `config` and waits until every status register
    /// reports healthy. The whole sequence is retried once.
    pub async fn initialize(&mut self, config: &Sch1Config) -> Result<(), Sch1Error<D::Error>> {
        if !(config.filter.is_valid() && config.sensitivity.is_valid() && config.decimation.is_valid()) {
            warn!("sch1 configuration rejected: {config:?}");
            return Err(Sch1Error::InvalidParameter);
        }

        for attempt in 1..=INIT_ATTEMPTS {
            match self.startup_attempt(config).await {
                Ok(status) if status.is_ok() => {
                    info!("sch1 initialized after {attempt} attempt(s)");
                    return Ok(());
                }
                Ok(status) => warn!("sch1 init attempt {attempt}: status not ok {status:?}"),
                Err(e) => warn!("sch1 init attempt {attempt} failed: {e:?}"),
            }
        }

        Err(Sch1Error::SensorInitFailed)
    }

    /// one pass of the power-up sequence, returns the status read after EOI
    async fn startup_attempt(&mut self, config: &Sch1Config) -> Result<Sch1Status, Sch1Error<D::Error>> {
        self.hardware_reset().await?;
        Timer::after_millis(NVM_LOAD_MS).await;

        let filter = &config.filter;
        let sens = &config.sensitivity;
        let dec = &config.decimation;

        tolerate("filters", self.set_filters(filter.rate12, filter.acc12, filter.acc3).await)?;
        tolerate("rate sens/dec", self.set_rate_sens_dec(sens.rate1, sens.rate2, dec.rate2).await)?;
        tolerate(
            "acc sens/dec",
            self.set_acc_sens_dec(sens.acc1, sens.acc2, sens.acc3, dec.acc2).await,
        )?;
        tolerate("dry", self.set_dry(DRY_POLARITY_ACTIVE_HIGH, config.enable_dry).await)?;
        tolerate("enable", self.enable_measurement(true, false).await)?;

        Timer::after_millis(SETTLE_MS).await;

        // clears the latched flags of the startup phase
        self.read_status().await?;

        tolerate("eoi", self.enable_measurement(true, true).await)?;
        Timer::after_millis(EOI_MS).await;

        // status registers are cleared on read, only the second read is meaningful
        self.read_status().await?;
        self.read_status().await
    }
}

/// logs a configuration step that failed its read back, bus failures abort the attempt
fn tolerate<E: Debug>(step: &str, res: Result<(), Sch1Error<E>>) -> Result<(), Sch1Error<E>> {
    match res {
        Err(Sch1Error::Bus(e)) => Err(Sch1Error::Bus(e)),
        Err(e) => {
            warn!("sch1 setting {step} failed: {e:?}");
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}
