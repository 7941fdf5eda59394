//! Button event → HID report translation.
//!
//! Every button is bound to an [`Action`]. Consumer actions report only on
//! press; key actions report the key on press and an all-released keyboard
//! report on release. The rotating letter (A..Z, wrapping) is per-translator
//! state so a fresh [`Translator`] always starts at 'A'.

use crate::config::{BUTTON_ACTIONS, BUTTON_COUNT, CONSUMER_BIT_ORDER};
use crate::hid::consumer::{ConsumerAction, ConsumerBitmap, ConsumerReport};
use crate::hid::keyboard::{KeyboardReport, KEY_A, KEY_Z};
use crate::hid::HidReport;
use crate::input::{ButtonEvent, ButtonId, Edge};

/// What a button does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Consumer-control action, reported on press only.
    Consumer(ConsumerAction),
    /// Next letter of the A..Z rotation; release clears.
    RotatingKey,
    /// Fixed key with modifier flags; release clears.
    Chord { modifier: u8, keycode: u8 },
    /// No report at all.
    Unassigned,
}

/// Button → action bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonMap {
    actions: [Action; BUTTON_COUNT],
}

impl ButtonMap {
    pub const fn new(actions: [Action; BUTTON_COUNT]) -> Self {
        Self { actions }
    }

    pub fn action(&self, button: ButtonId) -> Action {
        self.actions[button.index()]
    }

    pub fn set(&mut self, button: ButtonId, action: Action) {
        self.actions[button.index()] = action;
    }
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self::new(BUTTON_ACTIONS)
    }
}

/// Rotating keycode: A, B, ... Z, A, ...
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyRotation {
    next: u8,
}

impl KeyRotation {
    pub const fn new() -> Self {
        Self { next: KEY_A }
    }

    /// Keycode the next press will emit.
    pub fn current(&self) -> u8 {
        self.next
    }

    /// Return the current keycode and step to the next letter.
    pub fn advance(&mut self) -> u8 {
        let key = self.next;
        self.next = if key >= KEY_Z { KEY_A } else { key + 1 };
        key
    }

    pub fn reset(&mut self) {
        self.next = KEY_A;
    }
}

impl Default for KeyRotation {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateful translator from button events to HID reports.
#[derive(Clone, Debug)]
pub struct Translator {
    map: ButtonMap,
    consumer_bits: ConsumerBitmap,
    rotation: KeyRotation,
}

impl Translator {
    pub fn new(map: ButtonMap, consumer_bits: ConsumerBitmap) -> Self {
        Self {
            map,
            consumer_bits,
            rotation: KeyRotation::new(),
        }
    }

    /// Report due for `event`, or `None` when the button's action has
    /// nothing to send on this edge.
    pub fn translate(&mut self, event: ButtonEvent) -> Option<HidReport> {
        match (self.map.action(event.button), event.edge) {
            (Action::Consumer(action), Edge::Pressed) => {
                let report = ConsumerReport::for_action(action, &self.consumer_bits);
                if report.is_none() {
                    warn!("Consumer action {} has no bit", action);
                }
                report.map(HidReport::Consumer)
            }
            (Action::Consumer(_), Edge::Released) => None,
            (Action::RotatingKey, Edge::Pressed) => Some(HidReport::Keyboard(KeyboardReport::key(
                0,
                self.rotation.advance(),
            ))),
            (Action::Chord { modifier, keycode }, Edge::Pressed) => {
                Some(HidReport::Keyboard(KeyboardReport::key(modifier, keycode)))
            }
            (Action::RotatingKey | Action::Chord { .. }, Edge::Released) => {
                Some(HidReport::Keyboard(KeyboardReport::empty()))
            }
            (Action::Unassigned, _) => None,
        }
    }

    /// Rewind the letter rotation to 'A'.
    pub fn reset(&mut self) {
        self.rotation.reset();
    }

    pub fn rotation(&self) -> &KeyRotation {
        &self.rotation
    }

    pub fn map_mut(&mut self) -> &mut ButtonMap {
        &mut self.map
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(ButtonMap::default(), CONSUMER_BIT_ORDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::keyboard::{KEY_M, MOD_LEFT_CTRL, MOD_LEFT_SHIFT};

    fn press(b: ButtonId) -> ButtonEvent {
        ButtonEvent::pressed(b)
    }

    fn release(b: ButtonId) -> ButtonEvent {
        ButtonEvent::released(b)
    }

    fn keyboard(report: Option<HidReport>) -> KeyboardReport {
        match report {
            Some(HidReport::Keyboard(k)) => k,
            other => panic!("expected keyboard report, got {:?}", other),
        }
    }

    #[test]
    fn volume_buttons_report_on_press_only() {
        let mut t = Translator::default();

        let up = t.translate(press(ButtonId::Button1));
        assert_eq!(up, Some(HidReport::Consumer(ConsumerReport { bitfield: 0b01 })));
        assert_eq!(t.translate(release(ButtonId::Button1)), None);

        let down = t.translate(press(ButtonId::Button2));
        assert_eq!(down, Some(HidReport::Consumer(ConsumerReport { bitfield: 0b10 })));
        assert_eq!(t.translate(release(ButtonId::Button2)), None);
    }

    #[test]
    fn rotating_key_sequence_a_b_c() {
        let mut t = Translator::default();
        let mut keys = std::vec::Vec::new();
        for _ in 0..3 {
            keys.push(keyboard(t.translate(press(ButtonId::Button3))).keycodes[0]);
            assert!(keyboard(t.translate(release(ButtonId::Button3))).is_empty());
        }
        assert_eq!(keys, [KEY_A, KEY_A + 1, KEY_A + 2]);
    }

    #[test]
    fn rotation_wraps_after_z() {
        let mut t = Translator::default();
        for _ in 0..26 {
            t.translate(press(ButtonId::Button3));
        }
        assert_eq!(t.rotation().current(), KEY_A);
        let wrapped = keyboard(t.translate(press(ButtonId::Button3)));
        assert_eq!(wrapped.keycodes[0], KEY_A);
    }

    #[test]
    fn last_letter_is_z() {
        let mut rotation = KeyRotation::new();
        let mut last = 0;
        for _ in 0..26 {
            last = rotation.advance();
        }
        assert_eq!(last, KEY_Z);
    }

    #[test]
    fn chord_press_and_release() {
        let mut t = Translator::default();
        let pressed = keyboard(t.translate(press(ButtonId::Button4)));
        assert_eq!(pressed.modifier, MOD_LEFT_CTRL | MOD_LEFT_SHIFT);
        assert_eq!(pressed.keycodes, [KEY_M, 0, 0, 0, 0, 0]);

        let released = keyboard(t.translate(release(ButtonId::Button4)));
        assert_eq!(released, KeyboardReport::empty());
    }

    #[test]
    fn repeated_release_yields_identical_reports() {
        let mut t = Translator::default();
        let first = t.translate(release(ButtonId::Button3));
        let second = t.translate(release(ButtonId::Button3));
        assert_eq!(first, second);
        assert!(keyboard(first).is_empty());
    }

    #[test]
    fn release_does_not_advance_rotation() {
        let mut t = Translator::default();
        t.translate(release(ButtonId::Button3));
        assert_eq!(t.rotation().current(), KEY_A);
    }

    #[test]
    fn reset_rewinds_rotation() {
        let mut t = Translator::default();
        t.translate(press(ButtonId::Button3));
        t.translate(press(ButtonId::Button3));
        t.reset();
        let key = keyboard(t.translate(press(ButtonId::Button3)));
        assert_eq!(key.keycodes[0], KEY_A);
    }

    #[test]
    fn unassigned_button_yields_nothing() {
        let mut t = Translator::default();
        t.map_mut().set(ButtonId::Button4, Action::Unassigned);
        assert_eq!(t.translate(press(ButtonId::Button4)), None);
        assert_eq!(t.translate(release(ButtonId::Button4)), None);
    }

    #[test]
    fn consumer_action_without_bit_yields_nothing() {
        let bits = [ConsumerAction::Mute; 8];
        let mut t = Translator::new(ButtonMap::default(), bits);
        assert_eq!(t.translate(press(ButtonId::Button1)), None);
    }

    #[test]
    fn report_lengths_match_ids() {
        let mut t = Translator::default();
        for button in ButtonId::ALL {
            for event in [press(button), release(button)] {
                if let Some(report) = t.translate(event) {
                    let mut buf = [0u8; 16];
                    assert_eq!(report.serialize(&mut buf), report.len());
                    let expected = if report.report_id() == 1 { 9 } else { 2 };
                    assert_eq!(report.len(), expected);
                }
            }
        }
    }
}
