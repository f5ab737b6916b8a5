#![no_std]
#![no_main]
#![feature(type_alias_impl_trait)]

mod leds;

use embassy_executor::Spawner;
use embassy_time::Timer;
use esp_backtrace as _;
use esp_hal::clock::{ClockControl, Clocks};
use esp_hal::dma::{Dma, DmaPriority, Spi3DmaChannelCreator};
use esp_hal::gpio::{GpioPin, Input, Output, PullUp, PushPull};
use esp_hal::peripherals::{SPI3, UART1};
use esp_hal::spi::{
    master::{dma::WithDmaSpi3, Spi},
    SpiMode,
};
use esp_hal::uart::{config::Config as UartConfig, TxRxPins};
use esp_hal::peripherals::{Interrupt, Peripherals};
use esp_hal::{dma_descriptors, embassy, interrupt, prelude::*, timer::TimerGroup};
use esp_hal::{Uart, IO};
use esp_println::println;
use log::error;
use sch1_streamer::{
    config::{apply_config, Sch1Config},
    link,
    sch1::{self, driver::spi::Sch1SpiDriver},
};
use static_cell::make_static;

const LINK_BAUDRATE: u32 = 921_600;

#[main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger(log::LevelFilter::Info);

    // -------------------------------------------------------------------------
    // setup

    let peripherals = Peripherals::take();

    let io = IO::new(peripherals.GPIO, peripherals.IO_MUX);

    // clocks
    let system = peripherals.SYSTEM.split();
    let clocks = ClockControl::max(system.clock_control).freeze();
    let clocks = &*make_static!(clocks);

    println!("startup");

    // embassy
    embassy::init(&clocks, TimerGroup::new(peripherals.TIMG0, &clocks));

    // -------------------------------------------------------------------------
    // config

    apply_config(Sch1Config::default());

    // -------------------------------------------------------------------------
    // result link

    let uart_pins = TxRxPins::new_tx_rx(io.pins.gpio26.into_push_pull_output(), io.pins.gpio27.into_floating_input());
    let uart = Uart::new_with_config(
        peripherals.UART1,
        UartConfig::default().baudrate(LINK_BAUDRATE),
        Some(uart_pins),
        &clocks,
    );
    let _ = interrupt::enable(Interrupt::UART1, interrupt::Priority::Priority1);

    spawner.must_spawn(run_link(uart));

    spawner.must_spawn(leds::run_led_status(io.pins.gpio23.into_push_pull_output()));

    // -------------------------------------------------------------------------
    // sch1 measurement

    let dma = Dma::new(peripherals.DMA);

    spawner.must_spawn(run_sch1(
        peripherals.SPI3,
        &clocks,
        dma.spi3channel,
        io.pins.gpio18.into_push_pull_output(),
        io.pins.gpio21.into_push_pull_output(),
        io.pins.gpio19.into_pull_up_input(),
        io.pins.gpio5.into_push_pull_output(),
        io.pins.gpio4.into_push_pull_output(),
    ));

    loop {
        Timer::after_secs(107).await;
    }
}

#[embassy_executor::task]
async fn run_link(mut uart: Uart<'static, UART1>) {
    link::run_link(&mut uart).await;
}

#[embassy_executor::task]
async fn run_sch1(
    spi3: SPI3,
    clocks: &'static Clocks<'static>,
    dma_channel: Spi3DmaChannelCreator,
    sclk: GpioPin<Output<PushPull>, 18>,
    mosi: GpioPin<Output<PushPull>, 21>,
    miso: GpioPin<Input<PullUp>, 19>,
    cs: GpioPin<Output<PushPull>, 5>,
    extresn: GpioPin<Output<PushPull>, 4>,
) {
    let (mut descriptors, mut rx_descriptors) = dma_descriptors!(256);

    // SCH1 samples MOSI on the rising edge, CPOL = 0
    let spi = Spi::new(spi3, 10.MHz(), SpiMode::Mode0, &clocks)
        .with_sck(sclk)
        .with_mosi(mosi)
        .with_miso(miso)
        .with_dma(dma_channel.configure(
            false,
            &mut descriptors,
            &mut rx_descriptors,
            DmaPriority::Priority0,
        ));

    let mut driver = Sch1SpiDriver {
        spi_device: spi,
        pin_cs: cs,
        pin_extresn: extresn,
    };

    let e = sch1::run_sch1(&mut driver).await;
    error!("sch1 stopped: {e:?}, software reset");
    Timer::after_millis(100).await;
    esp_hal::reset::software_reset();
}
