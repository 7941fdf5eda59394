//! Remote side of the link: NUS GATT server and advertising loop.

use embassy_futures::select::select;
use embassy_nrf::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use nrf_softdevice::ble::gatt_server::NotifyValueError;
use nrf_softdevice::ble::peripheral::AdvertiseError;
use nrf_softdevice::ble::{gatt_server, peripheral, Connection};
use nrf_softdevice::{RawError, Softdevice};

use crate::ble::adv::{advertising_data, scan_response};
use crate::config::{BLE_ADV_INTERVAL, BLE_DEVICE_NAME, BUTTON_EVENT_DEPTH, REMOTE_SERVICE_UUID_LE};
use crate::error::BleError;
use crate::input::ButtonEvent;
use crate::transport::{LinkError, RemoteLink, RemoteSender};

/// Debounced button events waiting for the link.
pub type ButtonChannel = Channel<CriticalSectionRawMutex, ButtonEvent, BUTTON_EVENT_DEPTH>;

/// Nordic UART Service.
#[nrf_softdevice::gatt_service(uuid = "6e400001-b5a3-f393-e0a9-e50e24dcca9e")]
pub struct NusService {
    /// RX - written by the central; ignored.
    #[characteristic(uuid = "6e400002-b5a3-f393-e0a9-e50e24dcca9e", write, write_without_response)]
    pub rx: Vec<u8, 20>,

    /// TX - button frames notified to the central.
    #[characteristic(uuid = "6e400003-b5a3-f393-e0a9-e50e24dcca9e", notify)]
    pub tx: Vec<u8, 20>,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub nus: NusService,
}

/// NUS TX notifications as a [`RemoteLink`].
pub struct NusLink<'a> {
    server: &'a Server,
    conn: &'a Connection,
}

impl<'a> NusLink<'a> {
    pub fn new(server: &'a Server, conn: &'a Connection) -> Self {
        Self { server, conn }
    }
}

impl RemoteLink for NusLink<'_> {
    fn send(&mut self, payload: &[u8]) -> Result<(), LinkError> {
        let value: Vec<u8, 20> = Vec::from_slice(payload).map_err(|_| LinkError::Io)?;
        self.server
            .nus
            .tx_notify(self.conn, &value)
            .map_err(|e| match e {
                NotifyValueError::Disconnected => LinkError::NotConnected,
                NotifyValueError::Raw(RawError::Resources) => LinkError::Busy,
                NotifyValueError::Raw(_) => LinkError::Io,
            })
    }
}

/// Register the GATT server. Must run before the SoftDevice is started.
pub fn init_server(sd: &mut Softdevice) -> Result<Server, BleError> {
    Server::new(sd).map_err(|_| BleError::ServerInit)
}

/// Advertise until a central connects.
pub async fn advertise(sd: &Softdevice) -> Result<Connection, BleError> {
    let adv_data = advertising_data(BLE_DEVICE_NAME);
    let scan_data = scan_response(&REMOTE_SERVICE_UUID_LE);

    let config = peripheral::Config {
        interval: BLE_ADV_INTERVAL,
        ..Default::default()
    };
    let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
        adv_data: &adv_data,
        scan_data: &scan_data,
    };

    peripheral::advertise_connectable(sd, adv, &config)
        .await
        .map_err(|e| match e {
            AdvertiseError::Raw(raw) => BleError::from(raw),
            _ => BleError::AdvertiseFailed,
        })
}

/// Remote BLE loop: advertise, relay button events while connected, repeat.
///
/// The link LED is lit while a central is connected.
pub async fn run(
    sd: &'static Softdevice,
    server: &'static Server,
    events: &'static ButtonChannel,
    link_led: &mut Output<'static>,
) -> ! {
    loop {
        info!("Advertising as {}", BLE_DEVICE_NAME);
        let conn = match advertise(sd).await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Advertising failed: {}", e);
                continue;
            }
        };

        info!("Central connected");
        link_led.set_low();
        // Presses made while nobody was listening are stale.
        events.clear();

        let gatt = gatt_server::run(&conn, server, |event| match event {
            ServerEvent::Nus(NusServiceEvent::RxWrite(data)) => {
                debug!("Ignoring {} bytes written to RX", data.len());
            }
            ServerEvent::Nus(NusServiceEvent::TxCccdWrite { notifications }) => {
                info!("TX notifications: {}", notifications);
            }
        });

        let relay = async {
            let mut sender = RemoteSender::new(NusLink::new(server, &conn));
            loop {
                let event = events.receive().await;
                sender.send_event(event);
            }
        };

        select(gatt, relay).await;

        link_led.set_high();
        info!("Central disconnected");
    }
}
