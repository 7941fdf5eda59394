//! Integration tests for the remote → dongle → USB pipeline.

use std::cell::RefCell;
use std::rc::Rc;

use embassy_futures::block_on;
use sc_remote::hid::keyboard::{KEY_A, KEY_M};
use sc_remote::input::capture;
use sc_remote::pump::{EndpointError, PumpState, ReportEndpoint};
use sc_remote::transport::{LinkError, RemoteLink, RemoteSender};
use sc_remote::{
    ButtonEvent, ButtonId, EndpointState, Forwarded, ReportBridge, ReportPump, ReportQueue,
    Translator,
};

/// Link that hands every frame straight to the dongle's receive path.
#[derive(Clone, Default)]
struct LoopbackLink {
    frames: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl RemoteLink for LoopbackLink {
    fn send(&mut self, payload: &[u8]) -> Result<(), LinkError> {
        self.frames.borrow_mut().push(payload.to_vec());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingEndpoint {
    writes: Vec<Vec<u8>>,
}

impl ReportEndpoint for RecordingEndpoint {
    fn submit(&mut self, report: &[u8]) -> Result<(), EndpointError> {
        self.writes.push(report.to_vec());
        Ok(())
    }
}

/// Press and release each button once on the remote; return the frames sent.
fn remote_frames(buttons: &[ButtonId]) -> Vec<Vec<u8>> {
    let link = LoopbackLink::default();
    let mut sender = RemoteSender::new(link.clone());
    for &button in buttons {
        for event in capture(button.mask(), button.mask())
            .into_iter()
            .chain(capture(0, button.mask()))
        {
            assert!(sender.send_event(event));
        }
    }
    let frames = link.frames.borrow().clone();
    frames
}

#[test]
fn rotating_letter_end_to_end() {
    let queue: ReportQueue<10> = ReportQueue::new();
    let endpoint_state = EndpointState::new();
    endpoint_state.configured();

    let mut bridge = ReportBridge::new(Translator::default(), &queue);
    let mut pump = ReportPump::new(&queue, &endpoint_state, RecordingEndpoint::default());

    let frames = remote_frames(&[ButtonId::Button3, ButtonId::Button3, ButtonId::Button3]);
    assert_eq!(frames.len(), 6);

    for frame in &frames {
        assert!(matches!(bridge.handle_payload(frame), Forwarded::Queued(_)));
        block_on(pump.process_one()).unwrap();
        endpoint_state.transfer_complete();
    }

    let keys: Vec<(u8, u8)> = pump
        .endpoint()
        .writes
        .iter()
        .map(|w| (w[0], w[3]))
        .collect();
    assert_eq!(
        keys,
        [
            (1, KEY_A),
            (1, 0),
            (1, KEY_A + 1),
            (1, 0),
            (1, KEY_A + 2),
            (1, 0),
        ]
    );
    assert!(pump.endpoint().writes.iter().all(|w| w.len() == 9));
}

#[test]
fn volume_and_chord_end_to_end() {
    let queue: ReportQueue<10> = ReportQueue::new();
    let endpoint_state = EndpointState::new();
    endpoint_state.configured();

    let mut bridge = ReportBridge::new(Translator::default(), &queue);
    let mut pump = ReportPump::new(&queue, &endpoint_state, RecordingEndpoint::default());

    let frames = remote_frames(&[ButtonId::Button1, ButtonId::Button2, ButtonId::Button4]);
    let outcomes: Vec<Forwarded> = frames.iter().map(|f| bridge.handle_payload(f)).collect();
    assert_eq!(outcomes[1], Forwarded::NoReport);
    assert_eq!(outcomes[3], Forwarded::NoReport);
    assert_eq!(queue.len(), 4);

    while !queue.is_empty() {
        block_on(pump.process_one()).unwrap();
        endpoint_state.transfer_complete();
    }

    let writes = &pump.endpoint().writes;
    assert_eq!(writes[0], [0x02, 0b01]);
    assert_eq!(writes[1], [0x02, 0b10]);
    assert_eq!(writes[2], [0x01, 0x03, 0x00, KEY_M, 0, 0, 0, 0, 0]);
    assert_eq!(writes[3], [0x01, 0, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn malformed_frame_never_reaches_usb() {
    let queue: ReportQueue<10> = ReportQueue::new();
    let mut bridge = ReportBridge::new(Translator::default(), &queue);

    assert!(matches!(bridge.handle_payload(b"201"), Forwarded::Rejected(_)));
    assert!(matches!(bridge.handle_payload(b"9"), Forwarded::Rejected(_)));
    assert!(queue.is_empty());

    // The next valid frame still starts the rotation at 'A'.
    match bridge.handle_payload(b"21") {
        Forwarded::Queued(report) => {
            let mut buf = [0u8; 9];
            report.serialize(&mut buf);
            assert_eq!(buf[3], KEY_A);
        }
        other => panic!("expected queued report, got {:?}", other),
    }
}

#[test]
fn slow_host_drops_instead_of_blocking_producers() {
    let queue: ReportQueue<10> = ReportQueue::new();
    let endpoint_state = EndpointState::new();
    endpoint_state.configured();

    let mut bridge = ReportBridge::new(Translator::default(), &queue);
    let mut pump = ReportPump::new(&queue, &endpoint_state, RecordingEndpoint::default());

    // Host never completes the first transfer.
    bridge.handle_event(ButtonEvent::pressed(ButtonId::Button4));
    bridge.handle_event(ButtonEvent::released(ButtonId::Button4));
    assert!(block_on(pump.process_one()).is_ok());
    assert!(block_on(pump.process_one()).is_err());
    assert_eq!(pump.state(), PumpState::TransferInFlight);

    // Producers keep going until the queue itself is full.
    for _ in 0..10 {
        bridge.handle_event(ButtonEvent::pressed(ButtonId::Button3));
    }
    assert_eq!(
        bridge.handle_event(ButtonEvent::pressed(ButtonId::Button3)),
        Forwarded::QueueFull
    );
    assert_eq!(pump.endpoint().writes.len(), 1);
}

#[test]
fn bus_reset_recovers_pipeline() {
    let queue: ReportQueue<10> = ReportQueue::new();
    let endpoint_state = EndpointState::new();
    endpoint_state.configured();

    let mut bridge = ReportBridge::new(Translator::default(), &queue);
    let mut pump = ReportPump::new(&queue, &endpoint_state, RecordingEndpoint::default());

    bridge.handle_payload(b"21");
    block_on(pump.process_one()).unwrap();
    assert!(endpoint_state.is_busy());

    endpoint_state.bus_reset();
    endpoint_state.configured();

    bridge.handle_payload(b"20");
    block_on(pump.process_one()).unwrap();

    let writes = &pump.endpoint().writes;
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0][3], KEY_A);
    assert_eq!(writes[1][3], 0);
}
