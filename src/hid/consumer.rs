//! Consumer Control HID support - media keys, volume, power (report ID 2).
//!
//! Consumer Control is a separate HID usage page (0x0C). The report is a
//! single bitfield byte: each of the 8 bits is one consumer action, in the
//! order given by [`crate::config::CONSUMER_BIT_ORDER`].
//!
//! Layout (2 bytes on the wire):
//! ```text
//! Byte 0: Report ID (0x02)
//! Byte 1: Action bitfield (bit n = CONSUMER_BIT_ORDER[n])
//! ```

/// Report ID of the consumer-control report.
pub const CONSUMER_REPORT_ID: u8 = 0x02;

/// Consumer control report size in bytes, including the report ID.
pub const CONSUMER_REPORT_SIZE: usize = 2;

/// Number of consumer actions (one per bit of the bitfield).
pub const CONSUMER_ACTION_COUNT: usize = 8;

/// Bit table of the consumer report: index = bit number.
pub type ConsumerBitmap = [ConsumerAction; CONSUMER_ACTION_COUNT];

/// Consumer actions the remote can trigger (Usage Page 0x0C).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsumerAction {
    /// Volume up.
    VolumeUp,
    /// Volume down.
    VolumeDown,
    /// Play/Pause toggle.
    PlayPause,
    /// Mute toggle.
    Mute,
    /// Next track.
    NextTrack,
    /// Previous track.
    PrevTrack,
    /// Power.
    Power,
    /// Sleep.
    Sleep,
}

impl ConsumerAction {
    /// Consumer page usage ID of this action.
    pub const fn usage(self) -> u8 {
        match self {
            ConsumerAction::VolumeUp => 0xE9,
            ConsumerAction::VolumeDown => 0xEA,
            ConsumerAction::PlayPause => 0xCD,
            ConsumerAction::Mute => 0xE2,
            ConsumerAction::NextTrack => 0xB5,
            ConsumerAction::PrevTrack => 0xB6,
            ConsumerAction::Power => 0x30,
            ConsumerAction::Sleep => 0x32,
        }
    }

    /// Bit position of this action in `order`, if it is assigned one.
    pub fn bit_in(self, order: &ConsumerBitmap) -> Option<u8> {
        order.iter().position(|&a| a == self).map(|bit| bit as u8)
    }
}

/// Consumer Control HID report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerReport {
    /// Active consumer actions, one bit each.
    pub bitfield: u8,
}

impl ConsumerReport {
    /// Create an empty (nothing active) report.
    pub const fn empty() -> Self {
        Self { bitfield: 0 }
    }

    /// Report with exactly the bit of `action` set.
    ///
    /// Returns `None` when `order` has no slot for the action.
    pub fn for_action(
        action: ConsumerAction,
        order: &ConsumerBitmap,
    ) -> Option<Self> {
        action.bit_in(order).map(|bit| Self {
            bitfield: 1 << bit,
        })
    }

    /// Serialize to USB HID report bytes, report ID first.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < CONSUMER_REPORT_SIZE {
            return 0;
        }
        buf[0] = CONSUMER_REPORT_ID;
        buf[1] = self.bitfield;
        CONSUMER_REPORT_SIZE
    }

    /// Check if any action is active.
    pub fn is_empty(&self) -> bool {
        self.bitfield == 0
    }
}

const CONSUMER_HEADER: [u8; 16] = [
    0x05, 0x0C, // Usage Page (Consumer)
    0x09, 0x01, // Usage (Consumer Control)
    0xA1, 0x01, // Collection (Application)
    0x85, CONSUMER_REPORT_ID, //   Report ID (2)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x01, //   Report Count (1)
];

/// Length of the consumer collection: header, one 4-byte item per bit, End Collection.
pub const CONSUMER_COLLECTION_LEN: usize = CONSUMER_HEADER.len() + CONSUMER_ACTION_COUNT * 4 + 1;

/// Build the consumer-control collection of the report descriptor.
///
/// Each bit becomes `Usage (<action>)` followed by a one-bit
/// `Input (Data, Variable, Absolute)`, in bit order.
pub const fn consumer_collection(
    order: &ConsumerBitmap,
) -> [u8; CONSUMER_COLLECTION_LEN] {
    let mut out = [0u8; CONSUMER_COLLECTION_LEN];

    let mut i = 0;
    while i < CONSUMER_HEADER.len() {
        out[i] = CONSUMER_HEADER[i];
        i += 1;
    }

    let mut bit = 0;
    while bit < CONSUMER_ACTION_COUNT {
        let at = CONSUMER_HEADER.len() + bit * 4;
        out[at] = 0x09; //   Usage
        out[at + 1] = order[bit].usage();
        out[at + 2] = 0x81; //   Input (Data, Variable, Absolute)
        out[at + 3] = 0x02;
        bit += 1;
    }

    out[CONSUMER_COLLECTION_LEN - 1] = 0xC0; // End Collection
    out
}
