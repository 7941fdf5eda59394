//! sc-remote - four-button BLE remote.
//!
//! Button edges are framed as 2-byte NUS notifications to the dongle.
//! The run LED blinks while the firmware is alive; the link LED is lit
//! while a dongle is connected.

#![no_std]
#![no_main]

use defmt::{error, info, unwrap};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive, Pin};
use embassy_nrf::interrupt::Priority;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use nrf_softdevice::Softdevice;
use panic_probe as _;
use static_cell::StaticCell;

use sc_remote::ble::peripheral::{self, ButtonChannel, Server};
use sc_remote::ble::{self, Role};
use sc_remote::config::RUN_LED_BLINK_MS;
use sc_remote::input::buttons::{self, Buttons};

/// Debounced button events waiting to be sent.
static BUTTON_EVENTS: ButtonChannel = Channel::new();

static SERVER: StaticCell<Server> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn button_task(buttons: Buttons) -> ! {
    buttons::button_task(buttons, BUTTON_EVENTS.sender()).await
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, server: &'static Server, mut link_led: Output<'static>) -> ! {
    peripheral::run(sd, server, &BUTTON_EVENTS, &mut link_led).await
}

/// Fatal bring-up error: both LEDs on, do nothing else.
async fn halt(mut run_led: Output<'static>, mut link_led: Output<'static>) -> ! {
    run_led.set_low();
    link_led.set_low();
    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("sc-remote starting");

    // The SoftDevice reserves priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);

    // LEDs are active-low.
    let mut run_led = Output::new(p.P0_13, Level::High, OutputDrive::Standard);
    let link_led = Output::new(p.P0_14, Level::High, OutputDrive::Standard);

    let sd = Softdevice::enable(&ble::softdevice_config(Role::Peripheral));
    let server = match peripheral::init_server(sd) {
        Ok(server) => SERVER.init(server),
        Err(e) => {
            error!("GATT server registration failed: {}", e);
            halt(run_led, link_led).await
        }
    };
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    let buttons = buttons::init([
        p.P0_11.degrade(),
        p.P0_12.degrade(),
        p.P0_24.degrade(),
        p.P0_25.degrade(),
    ]);
    unwrap!(spawner.spawn(button_task(buttons)));
    unwrap!(spawner.spawn(ble_task(sd, server, link_led)));

    info!("Remote initialised");

    loop {
        run_led.toggle();
        Timer::after(Duration::from_millis(RUN_LED_BLINK_MS)).await;
    }
}
