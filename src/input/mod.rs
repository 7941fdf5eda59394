//! Button input: identities, edges, and change-mask interpretation.
//!
//! The GPIO layer ([`scanner`]) reports two bitmasks after debouncing:
//! the current pressed state and which bits changed since the previous
//! report. [`capture`] turns those masks into one [`ButtonEvent`] per
//! changed bit.

pub mod scanner;

#[cfg(feature = "embedded")]
pub mod buttons;

use crate::config::BUTTON_COUNT;
use heapless::Vec;

/// One of the four buttons on the remote (and its wire channel).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Button1,
    Button2,
    Button3,
    Button4,
}

impl ButtonId {
    /// All buttons in bit order.
    pub const ALL: [ButtonId; BUTTON_COUNT] = [
        ButtonId::Button1,
        ButtonId::Button2,
        ButtonId::Button3,
        ButtonId::Button4,
    ];

    /// Zero-based index, equal to the bit position in state masks.
    pub const fn index(self) -> usize {
        match self {
            ButtonId::Button1 => 0,
            ButtonId::Button2 => 1,
            ButtonId::Button3 => 2,
            ButtonId::Button4 => 3,
        }
    }

    /// Bit of this button in a state/changed mask.
    pub const fn mask(self) -> u8 {
        1 << self.index()
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Direction of a button transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// A debounced button transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub button: ButtonId,
    pub edge: Edge,
}

impl ButtonEvent {
    pub const fn new(button: ButtonId, edge: Edge) -> Self {
        Self { button, edge }
    }

    pub const fn pressed(button: ButtonId) -> Self {
        Self::new(button, Edge::Pressed)
    }

    pub const fn released(button: ButtonId) -> Self {
        Self::new(button, Edge::Released)
    }
}

/// Turn a state mask plus change mask into button events, lowest bit first.
///
/// A set bit in `state` means the button is held. Bits above the four
/// buttons are ignored.
pub fn capture(state: u8, changed: u8) -> Vec<ButtonEvent, BUTTON_COUNT> {
    let mut events = Vec::new();
    for button in ButtonId::ALL {
        if changed & button.mask() == 0 {
            continue;
        }
        let edge = if state & button.mask() != 0 {
            Edge::Pressed
        } else {
            Edge::Released
        };
        // Capacity equals the button count, so this never fails.
        let _ = events.push(ButtonEvent::new(button, edge));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_event_per_changed_bit() {
        let events = capture(0b0001, 0b0011);
        assert_eq!(
            events.as_slice(),
            &[
                ButtonEvent::pressed(ButtonId::Button1),
                ButtonEvent::released(ButtonId::Button2),
            ]
        );
    }

    #[test]
    fn unchanged_bits_produce_nothing() {
        assert!(capture(0b1111, 0).is_empty());
    }

    #[test]
    fn all_four_can_change_at_once() {
        let events = capture(0b1010, 0b1111);
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].edge, Edge::Released);
        assert_eq!(events[1].edge, Edge::Pressed);
        assert_eq!(events[3].button, ButtonId::Button4);
    }

    #[test]
    fn high_bits_are_ignored() {
        assert!(capture(0xF0, 0xF0).is_empty());
    }

    #[test]
    fn index_and_mask_agree() {
        for (i, button) in ButtonId::ALL.iter().enumerate() {
            assert_eq!(button.index(), i);
            assert_eq!(button.mask(), 1 << i);
            assert_eq!(ButtonId::from_index(i), Some(*button));
        }
        assert_eq!(ButtonId::from_index(4), None);
    }
}
