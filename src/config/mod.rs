mod structs;

pub use structs::*;

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal};
use log::{info, warn};

type Signal<T> = signal::Signal<CriticalSectionRawMutex, T>;

/// new sensor configuration, the acquisition task re-initializes the sensor on every signal
pub static CONFIG_SCH1: Signal<Sch1Config> = Signal::new();

/// Hands `config` to the acquisition task, invalid configurations are dropped.
pub fn apply_config(config: Sch1Config) -> bool {
    if !config.validate() {
        warn!("ignoring invalid sch1 configuration {config:?}");
        return false;
    }
    info!("new sch1 configuration, {} Hz", config.sample_rate);
    CONFIG_SCH1.signal(config);
    true
}
