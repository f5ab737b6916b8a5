use core::sync::atomic::Ordering;
use embassy_time::Timer;
use embedded_hal::digital::{OutputPin, StatefulOutputPin};
use esp_hal::gpio::{GpioPin, Output, PushPull};
use sch1_streamer::{link::LINK_UP, sch1::SENSOR_OK};

/// on while the sensor reports healthy and results go out, blinking otherwise
#[embassy_executor::task]
pub async fn run_led_status(mut led: GpioPin<Output<PushPull>, 23>) {
    loop {
        Timer::after_millis(250).await;

        if SENSOR_OK.load(Ordering::SeqCst) && LINK_UP.load(Ordering::SeqCst) {
            let _ = led.set_high();
        } else {
            let _ = led.toggle();
        }
    }
}
