//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, protocol constants
//! and the button/consumer mapping tables live here so they can be tuned
//! in one place.

use crate::hid::consumer::ConsumerAction;
use crate::hid::keyboard::{KEY_M, MOD_LEFT_CTRL, MOD_LEFT_SHIFT};
use crate::translate::Action;

// Report pipeline

/// Capacity of the report queue between translation and the USB pump.
pub const REPORT_QUEUE_DEPTH: usize = 10;

/// Number of buttons on the remote.
pub const BUTTON_COUNT: usize = 4;

/// Capacity of the button event channel on the remote.
pub const BUTTON_EVENT_DEPTH: usize = 8;

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u32 = 20;

/// Default button → action map.
///
///   Button 1 → Volume up (press only)
///   Button 2 → Volume down (press only)
///   Button 3 → Rotating letter A..Z
///   Button 4 → Ctrl+Shift+M
pub const BUTTON_ACTIONS: [Action; BUTTON_COUNT] = [
    Action::Consumer(ConsumerAction::VolumeUp),
    Action::Consumer(ConsumerAction::VolumeDown),
    Action::RotatingKey,
    Action::Chord {
        modifier: MOD_LEFT_CTRL | MOD_LEFT_SHIFT,
        keycode: KEY_M,
    },
];

/// Bit position of each consumer action in the consumer-control report.
///
/// Index = bit number. The USB report descriptor is generated from this
/// table, so the host always sees the same layout the firmware sends.
pub const CONSUMER_BIT_ORDER: [ConsumerAction; 8] = [
    ConsumerAction::VolumeUp,
    ConsumerAction::VolumeDown,
    ConsumerAction::PlayPause,
    ConsumerAction::Mute,
    ConsumerAction::NextTrack,
    ConsumerAction::PrevTrack,
    ConsumerAction::Power,
    ConsumerAction::Sleep,
];

// BLE

/// Advertised device name of the remote.
pub const BLE_DEVICE_NAME: &str = "SC Remote";

/// Custom 128-bit service UUID the remote puts in its scan response and
/// the dongle filters on: 988f9c8d-2b03-489f-a102-4d83463b90f3.
///
/// Stored little-endian, as it appears in advertisement data.
pub const REMOTE_SERVICE_UUID_LE: [u8; 16] = [
    0xf3, 0x90, 0x3b, 0x46, 0x83, 0x4d, 0x02, 0xa1, 0x9f, 0x48, 0x03, 0x2b, 0x8d, 0x9c, 0x8f, 0x98,
];

/// BLE connection interval range (in 1.25 ms units).
/// 6 = 7.5 ms (lowest latency for button relay).
pub const BLE_CONN_INTERVAL_MIN: u16 = 6;
pub const BLE_CONN_INTERVAL_MAX: u16 = 24;

/// BLE slave latency (number of connection events the peripheral can skip).
pub const BLE_SLAVE_LATENCY: u16 = 0;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

/// Delay before the dongle scans again after a failed or dropped link (ms).
pub const BLE_RECONNECT_BACKOFF_MS: u64 = 1000;

/// Advertising interval of the remote (in 0.625 ms units). 160 = 100 ms.
pub const BLE_ADV_INTERVAL: u32 = 160;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "sc-remote";
pub const USB_PRODUCT: &str = "Shortcut Remote Dongle";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 1;

/// Max packet size of the HID interrupt-IN endpoint; holds the largest report.
pub const USB_HID_MAX_PACKET_SIZE: u16 = 16;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in the binaries.  Adjust for your custom PCB.
//
//   Button 1      → P0.11
//   Button 2      → P0.12
//   Button 3      → P0.24
//   Button 4      → P0.25
//   Run LED       → P0.13
//   Link LED      → P0.14

/// Run LED blink period on the remote (ms).
pub const RUN_LED_BLINK_MS: u64 = 1000;
