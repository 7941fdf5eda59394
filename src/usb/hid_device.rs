//! USB HID device - keyboard + consumer control on one interface.
//!
//! Initialises the Embassy USB stack on the nRF52840 USB peripheral and
//! exposes a single interrupt-IN endpoint whose descriptor carries report
//! IDs 1 (keyboard) and 2 (consumer control).
//!
//! The report pump writes through [`UsbReportEndpoint`], which only hands
//! the bytes to [`in_endpoint_task`] and returns. That task performs the
//! actual transfer and signals completion back through [`EndpointState`].

use embassy_nrf::usb::vbus_detect::SoftwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::driver::EndpointError as UsbEndpointError;
use embassy_usb::{Builder, Config, UsbDevice};
use heapless::Vec;
use static_cell::StaticCell;

use crate::config;
use crate::hid::{MAX_REPORT_SIZE, REPORT_DESCRIPTOR};
use crate::pump::{EndpointError, EndpointState, ReportEndpoint};

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
});

/// USB driver; VBUS events come from the SoftDevice, which owns POWER.
pub type UsbDriver = Driver<'static, peripherals::USBD, &'static SoftwareVbusDetect>;

/// HID writer sized for the largest report.
pub type ReportWriter = HidWriter<'static, UsbDriver, { config::USB_HID_MAX_PACKET_SIZE as usize }>;

static HID_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_HANDLER: StaticCell<UsbStateHandler> = StaticCell::new();

/// Report bytes handed from the pump to the IN endpoint task.
static PENDING_REPORT: Signal<CriticalSectionRawMutex, Vec<u8, MAX_REPORT_SIZE>> = Signal::new();

/// Forwards bus reset and configuration changes to the endpoint state.
struct UsbStateHandler {
    endpoint: &'static EndpointState,
}

impl embassy_usb::Handler for UsbStateHandler {
    fn reset(&mut self) {
        info!("USB bus reset");
        self.endpoint.bus_reset();
    }

    fn configured(&mut self, configured: bool) {
        if configured {
            self.endpoint.configured();
        } else {
            self.endpoint.deconfigured();
        }
    }

    fn suspended(&mut self, suspended: bool) {
        if suspended {
            info!("USB suspended");
        } else {
            info!("USB resumed");
        }
    }
}

/// Build result containing the USB device runner and the HID writer.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub writer: ReportWriter,
}

/// Initialise the USB stack and create the HID device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(
    usbd: peripherals::USBD,
    vbus: &'static SoftwareVbusDetect,
    endpoint: &'static EndpointState,
) -> UsbHidDevice {
    let driver = Driver::new(usbd, Irqs, vbus);

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0u8; 256]),
        USB_BOS_DESC.init([0u8; 256]),
        USB_MSOS_DESC.init([0u8; 256]),
        USB_CTRL_BUF.init([0u8; 128]),
    );

    builder.handler(USB_HANDLER.init(UsbStateHandler { endpoint }));

    let hid_config = HidConfig {
        report_descriptor: &REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: config::USB_HID_MAX_PACKET_SIZE,
    };
    let writer = HidWriter::new(&mut builder, HID_STATE.init(State::new()), hid_config);

    let device = builder.build();

    info!("USB HID device initialised (keyboard + consumer control)");

    UsbHidDevice { device, writer }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Non-blocking [`ReportEndpoint`] backed by [`in_endpoint_task`].
pub struct UsbReportEndpoint;

impl ReportEndpoint for UsbReportEndpoint {
    fn submit(&mut self, report: &[u8]) -> Result<(), EndpointError> {
        if PENDING_REPORT.signaled() {
            return Err(EndpointError::Busy);
        }
        let bytes = Vec::from_slice(report).map_err(|_| EndpointError::Io)?;
        PENDING_REPORT.signal(bytes);
        Ok(())
    }
}

/// Owns the HID IN endpoint: writes each submitted report and reports
/// completion. A failed write leaves the busy flag for reset or
/// reconfiguration to clear.
pub async fn in_endpoint_task(mut writer: ReportWriter, endpoint: &'static EndpointState) -> ! {
    info!("HID IN endpoint task started");

    loop {
        let report = PENDING_REPORT.wait().await;
        match writer.write(&report).await {
            Ok(()) => endpoint.transfer_complete(),
            Err(UsbEndpointError::Disabled) => warn!("HID write aborted - endpoint disabled"),
            Err(UsbEndpointError::BufferOverflow) => error!("HID report larger than endpoint"),
        }
    }
}
