//! USB report pump: the only writer of the interrupt-IN endpoint.
//!
//! The endpoint allows one outstanding transfer. [`EndpointState`] holds the
//! busy flag shared between the pump (which claims it before each write)
//! and the USB stack's completion path (which clears it). A report that
//! finds the flag already set is dropped, never queued twice or retried.
//!
//! ```text
//!   Idle ──start──▶ AwaitingReport ──claim ok──▶ TransferInFlight
//!                        ▲                            │
//!                        └────── completion / reset ──┘
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

use crate::hid::{HidReport, MAX_REPORT_SIZE};
use crate::queue::ReportQueue;

/// Busy flag and configuration state of the HID IN endpoint.
pub struct EndpointState {
    busy: AtomicBool,
    configured: AtomicBool,
}

impl EndpointState {
    /// Starts busy: nothing may be written until the host configures us.
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(true),
            configured: AtomicBool::new(false),
        }
    }

    /// Atomically claim the endpoint. `false` if a transfer is in flight.
    pub fn try_claim(&self) -> bool {
        !self.busy.swap(true, Ordering::AcqRel)
    }

    /// Transfer finished; the endpoint can take the next report.
    pub fn transfer_complete(&self) {
        if !self.busy.swap(false, Ordering::AcqRel) {
            warn!("IN endpoint completion without a pending write");
        }
    }

    /// Host selected our configuration. The first call after power-up,
    /// deconfiguration or bus reset releases the busy flag.
    pub fn configured(&self) {
        if !self.configured.swap(true, Ordering::AcqRel) {
            self.busy.store(false, Ordering::Release);
            info!("USB configured - IN endpoint ready");
        }
    }

    pub fn deconfigured(&self) {
        if self.configured.swap(false, Ordering::AcqRel) {
            info!("USB deconfigured");
        }
    }

    /// Host reset the bus: any in-flight transfer is gone for good.
    pub fn bus_reset(&self) {
        self.configured.store(false, Ordering::Release);
        if self.busy.swap(false, Ordering::AcqRel) {
            debug!("Bus reset - in-flight report discarded");
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn is_configured(&self) -> bool {
        self.configured.load(Ordering::Acquire)
    }
}

impl Default for EndpointState {
    fn default() -> Self {
        Self::new()
    }
}

/// Why the USB stack refused a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EndpointError {
    /// The stack is still busy with a previous write.
    Busy,
    /// Endpoint not enabled (device not configured).
    Disabled,
    /// Any other stack failure.
    Io,
}

/// Non-blocking interrupt-IN write primitive.
///
/// `submit` hands bytes to the USB stack and returns at once; the stack
/// later reports completion through [`EndpointState::transfer_complete`].
pub trait ReportEndpoint {
    fn submit(&mut self, report: &[u8]) -> Result<(), EndpointError>;
}

/// Where the pump is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PumpState {
    /// Not started yet.
    Idle,
    /// Waiting for the next queued report.
    AwaitingReport,
    /// A transfer is outstanding on the endpoint.
    TransferInFlight,
}

/// Why a report was not transmitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PumpError {
    /// Previous transfer still in flight; report dropped.
    EndpointBusy,
    /// The stack refused the write; report dropped, flag left set.
    Endpoint(EndpointError),
}

/// Drains the report queue into the endpoint, one transfer at a time.
pub struct ReportPump<'a, E, const N: usize> {
    queue: &'a ReportQueue<N>,
    endpoint_state: &'a EndpointState,
    endpoint: E,
    started: bool,
    submitted: bool,
    sent: u32,
    dropped: u32,
}

impl<'a, E: ReportEndpoint, const N: usize> ReportPump<'a, E, N> {
    pub fn new(queue: &'a ReportQueue<N>, endpoint_state: &'a EndpointState, endpoint: E) -> Self {
        Self {
            queue,
            endpoint_state,
            endpoint,
            started: false,
            submitted: false,
            sent: 0,
            dropped: 0,
        }
    }

    /// Wait for one queued report and try to transmit it.
    pub async fn process_one(&mut self) -> Result<(), PumpError> {
        self.started = true;
        let report = self.queue.dequeue().await;
        self.send(report)
    }

    /// Claim the endpoint and submit `report`, or drop it if busy.
    pub fn send(&mut self, report: HidReport) -> Result<(), PumpError> {
        if !self.endpoint_state.try_claim() {
            self.dropped = self.dropped.wrapping_add(1);
            debug!("Endpoint busy - report {} dropped", report.report_id());
            return Err(PumpError::EndpointBusy);
        }

        let mut buf = [0u8; MAX_REPORT_SIZE];
        let len = report.serialize(&mut buf);

        match self.endpoint.submit(&buf[..len]) {
            Ok(()) => {
                self.submitted = true;
                self.sent = self.sent.wrapping_add(1);
                debug!("Report {} submitted ({} bytes)", report.report_id(), len);
                Ok(())
            }
            Err(e) => {
                self.submitted = false;
                self.dropped = self.dropped.wrapping_add(1);
                error!("Failed to submit report: {}", e);
                Err(PumpError::Endpoint(e))
            }
        }
    }

    /// Pump forever. Run this as its own task.
    pub async fn run(&mut self) -> ! {
        info!("Report pump started");
        loop {
            let _ = self.process_one().await;
        }
    }

    /// `TransferInFlight` only while our last accepted write has not been
    /// completed or reset away. A flag held by an unconfigured device or a
    /// refused write counts as `AwaitingReport`.
    pub fn state(&self) -> PumpState {
        if !self.started {
            PumpState::Idle
        } else if self.submitted && self.endpoint_state.is_busy() {
            PumpState::TransferInFlight
        } else {
            PumpState::AwaitingReport
        }
    }

    /// Reports handed to the endpoint.
    pub fn sent(&self) -> u32 {
        self.sent
    }

    /// Reports dropped (endpoint busy or write refused).
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn endpoint_mut(&mut self) -> &mut E {
        &mut self.endpoint
    }
}
