//! HID report types and the USB report descriptor.
//!
//! Two report shapes share one HID interface, told apart by report ID:
//! keyboard (ID 1, 9 bytes) and consumer control (ID 2, 2 bytes).

pub mod consumer;
pub mod keyboard;


use crate::config::CONSUMER_BIT_ORDER;
use consumer::{consumer_collection, ConsumerReport, CONSUMER_COLLECTION_LEN, CONSUMER_REPORT_ID};
use keyboard::{KeyboardReport, KEYBOARD_COLLECTION, KEYBOARD_REPORT_ID};

pub use consumer::{ConsumerAction, ConsumerBitmap};

/// Largest serialized report, report ID included.
pub const MAX_REPORT_SIZE: usize = keyboard::KEYBOARD_REPORT_SIZE;

/// A report bound for the USB interrupt-IN endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidReport {
    Keyboard(KeyboardReport),
    Consumer(ConsumerReport),
}

impl HidReport {
    /// Report ID that prefixes this report on the wire.
    pub fn report_id(&self) -> u8 {
        match self {
            HidReport::Keyboard(_) => KEYBOARD_REPORT_ID,
            HidReport::Consumer(_) => CONSUMER_REPORT_ID,
        }
    }

    /// Total length on the wire; fixed by the report ID.
    pub fn len(&self) -> usize {
        match self {
            HidReport::Keyboard(_) => keyboard::KEYBOARD_REPORT_SIZE,
            HidReport::Consumer(_) => consumer::CONSUMER_REPORT_SIZE,
        }
    }

    /// Serialize into `buf`, returning the number of bytes written
    /// (0 if `buf` is shorter than [`HidReport::len`]).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        match self {
            HidReport::Keyboard(k) => k.serialize(buf),
            HidReport::Consumer(c) => c.serialize(buf),
        }
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(self, HidReport::Keyboard(_))
    }

    pub fn is_consumer(&self) -> bool {
        matches!(self, HidReport::Consumer(_))
    }
}

impl From<KeyboardReport> for HidReport {
    fn from(report: KeyboardReport) -> Self {
        HidReport::Keyboard(report)
    }
}

impl From<ConsumerReport> for HidReport {
    fn from(report: ConsumerReport) -> Self {
        HidReport::Consumer(report)
    }
}

/// Length of the full report descriptor.
pub const REPORT_DESCRIPTOR_LEN: usize = KEYBOARD_COLLECTION.len() + CONSUMER_COLLECTION_LEN;

const fn build_report_descriptor() -> [u8; REPORT_DESCRIPTOR_LEN] {
    let consumer = consumer_collection(&CONSUMER_BIT_ORDER);
    let mut out = [0u8; REPORT_DESCRIPTOR_LEN];

    let mut i = 0;
    while i < KEYBOARD_COLLECTION.len() {
        out[i] = KEYBOARD_COLLECTION[i];
        i += 1;
    }
    let mut j = 0;
    while j < CONSUMER_COLLECTION_LEN {
        out[i + j] = consumer[j];
        j += 1;
    }
    out
}

/// Report descriptor of the dongle's HID interface: keyboard collection
/// (report ID 1) followed by the consumer collection (report ID 2), whose
/// usages are laid out from [`CONSUMER_BIT_ORDER`].
pub const REPORT_DESCRIPTOR: [u8; REPORT_DESCRIPTOR_LEN] = build_report_descriptor();
