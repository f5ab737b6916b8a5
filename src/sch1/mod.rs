pub mod chip;
pub mod conversion;
pub mod crc;
pub mod driver;
pub mod frame;
pub mod sample;

use core::{
    fmt::Debug,
    sync::atomic::{AtomicBool, Ordering},
};

use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::{Ticker, Timer};
use log::{error, info, warn};

use crate::config::{Sch1Config, CONFIG_SCH1};
use chip::{Sch1, Sch1Error};
use conversion::{ConversionParameters, Sch1Result};
use driver::Sch1Driver;
use sample::{read_samples, RawSample};

/// latest converted sample, taken by the link task
pub static SAMPLES: Signal<CriticalSectionRawMutex, Sch1Result> = Signal::new();
/// the link task finished sending and can take the next sample
pub static LINK_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();
/// sensor initialized and the last status check passed
pub static SENSOR_OK: AtomicBool = AtomicBool::new(false);

const MAX_READ_ERRORS: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;

/// Runs the acquisition until the sensor fails to start twice in a row.
///
/// Waits for the first configuration on [`CONFIG_SCH1`], every later
/// configuration re-initializes the sensor.
pub async fn run_sch1<D: Sch1Driver>(driver: &mut D) -> Sch1Error<D::Error>
where
    D::Error: Debug,
{
    let mut config = CONFIG_SCH1.wait().await;

    loop {
        match once_sch1(driver, &mut config).await {
            Ok(()) => (),
            Err(Sch1Error::SensorInitFailed) => {
                SENSOR_OK.store(false, Ordering::SeqCst);
                error!("sch1 failed to start");
                return Sch1Error::SensorInitFailed;
            }
            Err(e) => {
                SENSOR_OK.store(false, Ordering::SeqCst);
                warn!("sch1 error, restarting: {e:?}");
                // error -> retry after 0.5 sec
                Timer::after_millis(RETRY_DELAY_MS).await;
            }
        }
    }
}

/// Initializes the sensor and samples it until a new configuration arrives.
async fn once_sch1<D: Sch1Driver>(driver: &mut D, config: &mut Sch1Config) -> Result<(), Sch1Error<D::Error>>
where
    D::Error: Debug,
{
    SENSOR_OK.store(false, Ordering::SeqCst);

    let mut chip = Sch1::new(driver);
    chip.initialize(config).await?;

    match chip.serial_number().await {
        Ok(serial) => info!("sch1 serial number {serial}"),
        Err(e) => warn!("sch1 could not read serial number: {e:?}"),
    }
    SENSOR_OK.store(true, Ordering::SeqCst);

    let params = ConversionParameters::from_config(&config.sensitivity, config.averaging_factor);
    let averaging = config.averaging_factor.max(1);

    let period = config.sample_period();
    let mut ticker = Ticker::every(period);
    let mut read_errors = 0u32;

    let mut acc_sample = RawSample::default();
    let mut sample_cnt = 0u16;

    // LINK_READY taken but no sample handed out for it yet
    let mut link_ready = false;

    loop {
        // check if there is a new configuration / wait for the link, then the ticker
        if !link_ready {
            match select(CONFIG_SCH1.wait(), LINK_READY.wait()).await {
                Either::First(new_config) => {
                    *config = new_config;
                    return Ok(());
                }
                Either::Second(()) => link_ready = true,
            }
        }
        match select(CONFIG_SCH1.wait(), ticker.next()).await {
            Either::First(new_config) => {
                *config = new_config;
                // hand the unused link back to the next session
                LINK_READY.signal(());
                return Ok(());
            }
            Either::Second(()) => (),
        }

        let sample = match read_samples(&mut chip).await {
            Ok(sample) => sample,
            Err(e) => {
                read_errors += 1;
                if read_errors >= MAX_READ_ERRORS {
                    warn!("sch1 too many errors reading samples, restarting: {e:?}");
                    LINK_READY.signal(());
                    return Err(Sch1Error::Bus(e));
                }
                warn!("sch1 error reading samples: {e:?}");
                continue;
            }
        };

        read_errors = read_errors.saturating_sub(1);

        if sample.frame_error {
            // drop the sample, check the sensor and resume on a fresh period
            match chip.read_status().await {
                Ok(status) => {
                    SENSOR_OK.store(status.is_ok(), Ordering::SeqCst);
                    warn!("sch1 frame error, status {status:?}");
                }
                Err(e) => warn!("sch1 frame error, status unavailable: {e:?}"),
            }
            acc_sample = RawSample::default();
            sample_cnt = 0;
            ticker = Ticker::every(period);
            continue;
        }

        SENSOR_OK.store(true, Ordering::SeqCst);
        acc_sample.accumulate(&sample);
        sample_cnt += 1;

        // enough samples summed, send to the link
        if sample_cnt >= averaging {
            SAMPLES.signal(params.convert(&acc_sample));
            link_ready = false;
            acc_sample = RawSample::default();
            sample_cnt = 0;
        }
    }
}
