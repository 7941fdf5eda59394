//! Remote ↔ dongle wire framing.
//!
//! Every button edge crosses the BLE link as exactly two ASCII bytes:
//!
//! ```text
//! Byte 0: channel digit  '0'..'3'  (button 1..4)
//! Byte 1: edge digit     '1' = pressed, '0' = released
//! ```
//!
//! Anything that is not exactly two bytes is a malformed frame and is
//! dropped by the receiver.

use crate::input::{ButtonEvent, ButtonId, Edge};

/// Length of every wire message.
pub const WIRE_MESSAGE_LEN: usize = 2;

const EDGE_PRESSED: u8 = b'1';
const EDGE_RELEASED: u8 = b'0';

/// Why a received payload was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireError {
    /// Payload was not exactly two bytes long.
    Length(usize),
    /// First byte is not a known channel digit.
    UnknownChannel(u8),
    /// Second byte is neither '0' nor '1'.
    UnknownEdge(u8),
}

/// A validated two-byte frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WireMessage {
    bytes: [u8; WIRE_MESSAGE_LEN],
}

impl WireMessage {
    /// Frame a button event for the link.
    pub fn encode(event: ButtonEvent) -> Self {
        let channel = b'0' + event.button.index() as u8;
        let edge = match event.edge {
            Edge::Pressed => EDGE_PRESSED,
            Edge::Released => EDGE_RELEASED,
        };
        Self {
            bytes: [channel, edge],
        }
    }

    /// Validate the length of a received payload.
    ///
    /// Only the length is checked here; the digits are checked by
    /// [`WireMessage::decode`].
    pub fn parse(payload: &[u8]) -> Result<Self, WireError> {
        match payload {
            [channel, edge] => Ok(Self {
                bytes: [*channel, *edge],
            }),
            _ => Err(WireError::Length(payload.len())),
        }
    }

    /// Decode back into the button event it carries.
    pub fn decode(&self) -> Result<ButtonEvent, WireError> {
        let [channel, edge] = self.bytes;
        let button = channel
            .checked_sub(b'0')
            .and_then(|index| ButtonId::from_index(index as usize))
            .ok_or(WireError::UnknownChannel(channel))?;
        let edge = match edge {
            EDGE_PRESSED => Edge::Pressed,
            EDGE_RELEASED => Edge::Released,
            other => return Err(WireError::UnknownEdge(other)),
        };
        Ok(ButtonEvent::new(button, edge))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Parse and decode a received payload in one step.
pub fn decode_payload(payload: &[u8]) -> Result<ButtonEvent, WireError> {
    WireMessage::parse(payload)?.decode()
}

/// Reasons a link refuses to send.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// No central is connected (or it has not subscribed).
    NotConnected,
    /// The stack has no room for another packet right now.
    Busy,
    /// Any other stack failure.
    Io,
}

/// Byte-oriented send primitive of an established wireless link.
pub trait RemoteLink {
    fn send(&mut self, payload: &[u8]) -> Result<(), LinkError>;
}

/// Remote side of the transport: frames button events onto a link.
///
/// Sending is fire-and-forget: a refused send drops the event.
pub struct RemoteSender<L> {
    link: L,
    sent: u32,
    dropped: u32,
}

impl<L: RemoteLink> RemoteSender<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            sent: 0,
            dropped: 0,
        }
    }

    /// Frame and send one event. Returns `true` if the link accepted it.
    pub fn send_event(&mut self, event: ButtonEvent) -> bool {
        let message = WireMessage::encode(event);
        match self.link.send(message.as_bytes()) {
            Ok(()) => {
                self.sent = self.sent.wrapping_add(1);
                debug!("Sent {}", event);
                true
            }
            Err(e) => {
                self.dropped = self.dropped.wrapping_add(1);
                warn!("Link refused {}: {} - event dropped", event, e);
                false
            }
        }
    }

    /// Events accepted by the link so far.
    pub fn sent(&self) -> u32 {
        self.sent
    }

    /// Events dropped because the link refused them.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_uses_ascii_digits() {
        let msg = WireMessage::encode(ButtonEvent::pressed(ButtonId::Button1));
        assert_eq!(msg.as_bytes(), b"01");
        let msg = WireMessage::encode(ButtonEvent::released(ButtonId::Button4));
        assert_eq!(msg.as_bytes(), b"30");
    }

    #[test]
    fn every_event_survives_the_wire() {
        for button in ButtonId::ALL {
            for edge in [Edge::Pressed, Edge::Released] {
                let event = ButtonEvent::new(button, edge);
                let msg = WireMessage::encode(event);
                assert_eq!(decode_payload(msg.as_bytes()), Ok(event));
            }
        }
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert_eq!(decode_payload(b"011"), Err(WireError::Length(3)));
        assert_eq!(decode_payload(b"0"), Err(WireError::Length(1)));
        assert_eq!(decode_payload(b""), Err(WireError::Length(0)));
    }

    #[test]
    fn unknown_channel_is_rejected() {
        assert_eq!(decode_payload(b"41"), Err(WireError::UnknownChannel(b'4')));
        assert_eq!(decode_payload(b"/1"), Err(WireError::UnknownChannel(b'/')));
    }

    #[test]
    fn unknown_edge_is_rejected() {
        assert_eq!(decode_payload(b"02"), Err(WireError::UnknownEdge(b'2')));
    }

    struct RecordingLink {
        connected: bool,
        frames: std::vec::Vec<std::vec::Vec<u8>>,
    }

    impl RemoteLink for RecordingLink {
        fn send(&mut self, payload: &[u8]) -> Result<(), LinkError> {
            if !self.connected {
                return Err(LinkError::NotConnected);
            }
            self.frames.push(payload.to_vec());
            Ok(())
        }
    }

    #[test]
    fn sender_frames_events_onto_the_link() {
        let mut sender = RemoteSender::new(RecordingLink {
            connected: true,
            frames: std::vec::Vec::new(),
        });
        assert!(sender.send_event(ButtonEvent::pressed(ButtonId::Button3)));
        assert!(sender.send_event(ButtonEvent::released(ButtonId::Button3)));

        assert_eq!(sender.link().frames, [b"21".to_vec(), b"20".to_vec()]);
        assert_eq!(sender.sent(), 2);
    }

    #[test]
    fn sender_drops_when_link_down() {
        let mut sender = RemoteSender::new(RecordingLink {
            connected: false,
            frames: std::vec::Vec::new(),
        });
        assert!(!sender.send_event(ButtonEvent::pressed(ButtonId::Button1)));
        assert_eq!(sender.dropped(), 1);
        assert!(sender.link().frames.is_empty());

        sender.link_mut().connected = true;
        assert!(sender.send_event(ButtonEvent::pressed(ButtonId::Button1)));
        assert_eq!(sender.link().frames.len(), 1);
    }
}
