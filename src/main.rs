//! sc-remote dongle - BLE central → USB HID keyboard / consumer control.
//!
//! Tasks:
//!   - SoftDevice event loop (also feeds USB VBUS events)
//!   - USB device stack
//!   - HID IN endpoint writer
//!   - Report pump (queue → endpoint)
//!   - BLE link (remote → bridge → queue)

#![no_std]
#![no_main]

use defmt::{info, unwrap};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::usb::vbus_detect::SoftwareVbusDetect;
use embassy_usb::UsbDevice;
use nrf_softdevice::{raw, SocEvent, Softdevice};
use panic_probe as _;
use static_cell::StaticCell;

use sc_remote::ble::{self, central, Role};
use sc_remote::bridge::ReportBridge;
use sc_remote::config::REPORT_QUEUE_DEPTH;
use sc_remote::pump::{EndpointState, ReportPump};
use sc_remote::queue::ReportQueue;
use sc_remote::translate::Translator;
use sc_remote::usb::hid_device::{self, ReportWriter, UsbDriver, UsbReportEndpoint};

/// Reports waiting for the USB endpoint.
static REPORT_QUEUE: ReportQueue<REPORT_QUEUE_DEPTH> = ReportQueue::new();

/// Busy flag and configuration state of the HID IN endpoint.
static ENDPOINT: EndpointState = EndpointState::new();

static VBUS: StaticCell<SoftwareVbusDetect> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice, vbus: &'static SoftwareVbusDetect) -> ! {
    // SAFETY: plain SoftDevice calls, made after it has been enabled.
    unsafe {
        raw::sd_power_usbdetected_enable(1);
        raw::sd_power_usbpwrrdy_enable(1);
        raw::sd_power_usbremoved_enable(1);
    }

    sd.run_with_callback(|event| match event {
        SocEvent::PowerUsbDetected => vbus.detected(true),
        SocEvent::PowerUsbRemoved => vbus.detected(false),
        SocEvent::PowerUsbPowerReady => vbus.ready(),
        _ => {}
    })
    .await
}

#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, UsbDriver>) -> ! {
    hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn in_endpoint_task(writer: ReportWriter) -> ! {
    hid_device::in_endpoint_task(writer, &ENDPOINT).await
}

#[embassy_executor::task]
async fn pump_task() -> ! {
    let mut pump = ReportPump::new(&REPORT_QUEUE, &ENDPOINT, UsbReportEndpoint);
    pump.run().await
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice) -> ! {
    let bridge = ReportBridge::new(Translator::default(), &REPORT_QUEUE);
    central::run(sd, bridge).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("sc-remote dongle starting");

    // The SoftDevice reserves priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);
    interrupt::USBD.set_priority(Priority::P2);

    let sd: &'static Softdevice = Softdevice::enable(&ble::softdevice_config(Role::Central));
    let vbus = VBUS.init(SoftwareVbusDetect::new(true, true));
    unwrap!(spawner.spawn(softdevice_task(sd, vbus)));

    // USB comes up independently of BLE and keeps running if the link fails.
    let usb = hid_device::init(p.USBD, vbus, &ENDPOINT);
    unwrap!(spawner.spawn(usb_task(usb.device)));
    unwrap!(spawner.spawn(in_endpoint_task(usb.writer)));
    unwrap!(spawner.spawn(pump_task()));

    unwrap!(spawner.spawn(ble_task(sd)));

    info!("Dongle initialised - waiting for remote");
}
