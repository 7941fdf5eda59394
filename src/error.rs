//! Unified error type for sc-remote.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

use crate::pump::EndpointError;
use crate::transport::{LinkError, WireError};

/// Top-level error type used by device bring-up and the link tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The SoftDevice returned a BLE-level error.
    Ble(BleError),

    /// A payload from the link could not be decoded.
    Wire(WireError),

    /// The link refused to send.
    Link(LinkError),

    /// The HID IN endpoint refused a write.
    Endpoint(EndpointError),
}

/// Subset of BLE errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleError {
    /// GAP / GATT raw error code from the SoftDevice.
    Raw(u32),
    /// GATT server registration failed.
    ServerInit,
    /// Advertising could not start or ended with an error.
    AdvertiseFailed,
    /// Scan was cancelled or could not start.
    ScanFailed,
    /// Connection attempt failed.
    ConnectFailed,
    /// GATT discovery failed.
    DiscoveryFailed,
    /// Characteristic subscribe/notify failed.
    NotifyFailed,
}

// Convenience conversions

#[cfg(feature = "embedded")]
impl From<nrf_softdevice::RawError> for BleError {
    fn from(e: nrf_softdevice::RawError) -> Self {
        BleError::Raw(e as u32)
    }
}

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}

impl From<WireError> for Error {
    fn from(e: WireError) -> Self {
        Error::Wire(e)
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Error::Link(e)
    }
}

impl From<EndpointError> for Error {
    fn from(e: EndpointError) -> Self {
        Error::Endpoint(e)
    }
}
