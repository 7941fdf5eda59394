//! sc-remote: firmware library for a BLE button remote and its USB HID dongle.
//!
//! The event → report pipeline is plain `no_std` logic that builds and is
//! tested on the host:
//!
//! ```text
//!  buttons ─▶ input ─▶ transport ══ BLE ══▶ transport ─▶ translate ─▶ queue ─▶ pump ─▶ USB
//!                       (remote)              (dongle: bridge)
//! ```
//!
//! Hardware glue (`ble::central`, `ble::peripheral`, `usb`,
//! `input::buttons`) is only compiled with the `embedded` feature.
//!
//! Usage: `cargo test --lib` runs the host tests; the firmware binaries
//! need `--features embedded` and a `thumbv7em-none-eabihf` target.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod macros;

pub mod ble;
pub mod bridge;
pub mod config;
pub mod error;
pub mod hid;
pub mod input;
pub mod pump;
pub mod queue;
pub mod translate;
pub mod transport;

#[cfg(feature = "embedded")]
pub mod usb;

pub use bridge::{Forwarded, ReportBridge};
pub use error::{BleError, Error};
pub use hid::HidReport;
pub use input::{ButtonEvent, ButtonId, Edge};
pub use pump::{EndpointState, ReportPump};
pub use queue::ReportQueue;
pub use translate::Translator;
