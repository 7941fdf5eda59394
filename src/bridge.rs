//! Event → report bridge: the producer side of the report queue.
//!
//! Takes button events (local) or raw link payloads (from the remote),
//! translates them and queues the resulting report without ever waiting.

use crate::hid::HidReport;
use crate::input::ButtonEvent;
use crate::queue::ReportQueue;
use crate::transport::{decode_payload, WireError};
use crate::translate::Translator;

/// Outcome of feeding one event or payload through the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Forwarded {
    /// A report was queued for the pump.
    Queued(HidReport),
    /// The event maps to no report (e.g. consumer button release).
    NoReport,
    /// Queue full; the report was dropped.
    QueueFull,
    /// Malformed payload; dropped before translation.
    Rejected(WireError),
}

pub struct ReportBridge<'a, const N: usize> {
    translator: Translator,
    queue: &'a ReportQueue<N>,
}

impl<'a, const N: usize> ReportBridge<'a, N> {
    pub fn new(translator: Translator, queue: &'a ReportQueue<N>) -> Self {
        Self { translator, queue }
    }

    /// Translate a button event and queue its report.
    pub fn handle_event(&mut self, event: ButtonEvent) -> Forwarded {
        let Some(report) = self.translator.translate(event) else {
            return Forwarded::NoReport;
        };
        if self.queue.enqueue(report) {
            Forwarded::Queued(report)
        } else {
            Forwarded::QueueFull
        }
    }

    /// Decode a payload received from the remote and forward it.
    pub fn handle_payload(&mut self, payload: &[u8]) -> Forwarded {
        match decode_payload(payload) {
            Ok(event) => {
                debug!("Received {}", event);
                self.handle_event(event)
            }
            Err(e) => {
                warn!("Malformed payload dropped: {}", e);
                Forwarded::Rejected(e)
            }
        }
    }

    pub fn translator_mut(&mut self) -> &mut Translator {
        &mut self.translator
    }
}
