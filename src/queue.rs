//! Bounded FIFO between report producers and the USB pump.
//!
//! Producers (the BLE receive path on the dongle) never wait: a full queue
//! drops the report. The single consumer, the report pump, waits until a
//! report is available.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::hid::HidReport;

/// Multi-producer, single-consumer report queue of capacity `N`.
pub struct ReportQueue<const N: usize> {
    channel: Channel<CriticalSectionRawMutex, HidReport, N>,
}

impl<const N: usize> ReportQueue<N> {
    /// Create an empty queue. Usable in `static` initialisers.
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Queue a report without waiting.
    ///
    /// Returns `false` and drops `report` when the queue is full; entries
    /// already queued are untouched.
    pub fn enqueue(&self, report: HidReport) -> bool {
        match self.channel.try_send(report) {
            Ok(()) => true,
            Err(_) => {
                warn!("Report queue full - report dropped");
                false
            }
        }
    }

    /// Wait for the oldest report.
    pub async fn dequeue(&self) -> HidReport {
        self.channel.receive().await
    }

    /// Take the oldest report if there is one.
    pub fn try_dequeue(&self) -> Option<HidReport> {
        self.channel.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drop everything queued.
    pub fn clear(&self) {
        self.channel.clear();
    }
}

impl<const N: usize> Default for ReportQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
