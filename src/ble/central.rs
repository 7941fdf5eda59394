//! Dongle side of the link: find the remote, subscribe, forward frames.
//!
//! 1. Scan for an advertiser whose scan response lists the remote UUID.
//! 2. Connect to that address.
//! 3. Discover NUS and enable TX notifications.
//! 4. Hand every notification to the [`ReportBridge`] until disconnect.
//!
//! Any failure backs off and starts over; USB keeps running meanwhile.

use embassy_time::{Duration, Timer};
use heapless::Vec;
use nrf_softdevice::ble::central::ConnectError;
use nrf_softdevice::ble::{central, gatt_client, Address, Connection};
use nrf_softdevice::{raw, Softdevice};

use crate::ble::adv::{contains_uuid128, extract_device_name};
use crate::bridge::ReportBridge;
use crate::config::{
    BLE_CONN_INTERVAL_MAX, BLE_CONN_INTERVAL_MIN, BLE_RECONNECT_BACKOFF_MS, BLE_SLAVE_LATENCY,
    BLE_SUP_TIMEOUT, REMOTE_SERVICE_UUID_LE,
};
use crate::error::{BleError, Error};

/// GATT client for the remote's Nordic UART Service.
#[nrf_softdevice::gatt_client(uuid = "6e400001-b5a3-f393-e0a9-e50e24dcca9e")]
pub struct NusClient {
    /// RX - dongle → remote (unused, kept for discovery).
    #[characteristic(uuid = "6e400002-b5a3-f393-e0a9-e50e24dcca9e", write, write_without_response)]
    pub rx: Vec<u8, 20>,

    /// TX - remote → dongle button frames.
    #[characteristic(uuid = "6e400003-b5a3-f393-e0a9-e50e24dcca9e", notify)]
    pub tx: Vec<u8, 20>,
}

/// Scan until a device advertising the remote service shows up.
pub async fn find_remote(sd: &Softdevice) -> Result<Address, BleError> {
    info!("Scanning for remote");

    let config = central::ScanConfig {
        // Active scan: the UUID is in the scan response.
        active: true,
        ..Default::default()
    };

    central::scan(sd, &config, |params| {
        // SAFETY: the SoftDevice guarantees `p_data` points at `len` bytes
        // for the duration of the callback.
        let data =
            unsafe { core::slice::from_raw_parts(params.data.p_data, params.data.len as usize) };

        if !contains_uuid128(data, &REMOTE_SERVICE_UUID_LE) {
            return None;
        }
        if let Some(name) = extract_device_name(data) {
            info!("Found remote {} (RSSI {})", name.as_str(), params.rssi);
        } else {
            info!("Found remote (RSSI {})", params.rssi);
        }
        Some(Address::from_raw(params.peer_addr))
    })
    .await
    .map_err(|_| BleError::ScanFailed)
}

/// Connect to the remote at `address` with low-latency parameters.
pub async fn connect(sd: &Softdevice, address: &Address) -> Result<Connection, BleError> {
    let whitelist = [address];
    let config = central::ConnectConfig {
        scan_config: central::ScanConfig {
            whitelist: Some(&whitelist),
            ..Default::default()
        },
        conn_params: raw::ble_gap_conn_params_t {
            min_conn_interval: BLE_CONN_INTERVAL_MIN,
            max_conn_interval: BLE_CONN_INTERVAL_MAX,
            slave_latency: BLE_SLAVE_LATENCY,
            conn_sup_timeout: BLE_SUP_TIMEOUT,
        },
        ..Default::default()
    };

    central::connect(sd, &config)
        .await
        .map_err(|e| match e {
            ConnectError::Raw(raw) => BleError::from(raw),
            _ => BleError::ConnectFailed,
        })
}

/// Discover NUS on `conn` and enable TX notifications.
pub async fn subscribe(conn: &Connection) -> Result<NusClient, BleError> {
    let client: NusClient = gatt_client::discover(conn)
        .await
        .map_err(|_| BleError::DiscoveryFailed)?;

    client
        .tx_cccd_write(true)
        .await
        .map_err(|_| BleError::NotifyFailed)?;

    info!("Subscribed to remote button frames");
    Ok(client)
}

/// One connection lifetime: find, connect, subscribe, forward until the
/// link drops.
pub async fn connect_and_forward<const N: usize>(
    sd: &Softdevice,
    bridge: &mut ReportBridge<'_, N>,
) -> Result<(), Error> {
    let address = find_remote(sd).await?;
    let conn = connect(sd, &address).await?;
    info!("Connected to remote");

    let client = subscribe(&conn).await?;

    let reason = gatt_client::run(&conn, &client, |event| match event {
        NusClientEvent::TxNotification(payload) => {
            bridge.handle_payload(&payload);
        }
    })
    .await;

    info!("Remote disconnected: {}", reason);
    Ok(())
}

/// Dongle BLE loop: reconnect forever.
pub async fn run<const N: usize>(sd: &'static Softdevice, mut bridge: ReportBridge<'static, N>) -> ! {
    loop {
        if let Err(e) = connect_and_forward(sd, &mut bridge).await {
            warn!("BLE link failed: {}", e);
        }
        Timer::after(Duration::from_millis(BLE_RECONNECT_BACKOFF_MS)).await;
    }
}
