//! Debounced scanning of the four active-low button pins.
//!
//! The scanner is generic over the `embedded-hal` pin and delay traits so
//! it runs unchanged on the nRF52840 (`embassy_nrf::gpio::Input`,
//! `embassy_time::Delay`) and against mock pins in host tests.

use embassy_futures::select::select4;
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use heapless::Vec;

use super::{capture, ButtonEvent};
use crate::config::BUTTON_COUNT;

/// Watches the button pins and reports debounced state changes.
pub struct ButtonScanner<P, D> {
    pins: [P; BUTTON_COUNT],
    delay: D,
    debounce_ms: u32,
    last: u8,
}

impl<P, D> ButtonScanner<P, D>
where
    P: InputPin + Wait,
    D: DelayNs,
{
    /// Create a scanner; the current pin levels become the baseline.
    pub fn new(pins: [P; BUTTON_COUNT], delay: D, debounce_ms: u32) -> Self {
        let mut scanner = Self {
            pins,
            delay,
            debounce_ms,
            last: 0,
        };
        scanner.last = scanner.read_state();
        scanner
    }

    /// Pressed-state mask right now (bit n = button n+1 held).
    ///
    /// Pins are active-low; a pin that fails to read counts as released.
    pub fn read_state(&mut self) -> u8 {
        let mut state = 0;
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            if matches!(pin.is_low(), Ok(true)) {
                state |= 1 << bit;
            }
        }
        state
    }

    /// Last debounced state reported.
    pub fn state(&self) -> u8 {
        self.last
    }

    /// Wait for the next debounced change and return `(state, changed)`.
    ///
    /// Edges that revert within the debounce window are swallowed.
    pub async fn next_change(&mut self) -> (u8, u8) {
        loop {
            {
                let [a, b, c, d] = &mut self.pins;
                let _ = select4(
                    a.wait_for_any_edge(),
                    b.wait_for_any_edge(),
                    c.wait_for_any_edge(),
                    d.wait_for_any_edge(),
                )
                .await;
            }

            self.delay.delay_ms(self.debounce_ms).await;

            let state = self.read_state();
            let changed = state ^ self.last;
            if changed != 0 {
                self.last = state;
                return (state, changed);
            }
        }
    }

    /// Wait for the next debounced change and return it as button events.
    pub async fn next_events(&mut self) -> Vec<ButtonEvent, BUTTON_COUNT> {
        let (state, changed) = self.next_change().await;
        capture(state, changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ButtonId, Edge};
    use core::cell::Cell;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use std::rc::Rc;

    /// Pin whose level is shared with the test; edges are always "ready".
    #[derive(Clone)]
    struct MockPin {
        low: Rc<Cell<bool>>,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                low: Rc::new(Cell::new(false)),
            }
        }
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.low.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.low.get())
        }
    }

    impl Wait for MockPin {
        async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
        async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
        async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
        async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
        async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// Delay that applies scripted pin changes on each debounce wait.
    struct ScriptedDelay {
        calls: Rc<Cell<usize>>,
        script: std::vec::Vec<(usize, Rc<Cell<bool>>, bool)>,
    }

    impl DelayNs for ScriptedDelay {
        async fn delay_ns(&mut self, _ns: u32) {}

        async fn delay_ms(&mut self, _ms: u32) {
            let call = self.calls.get();
            for (at, level, low) in &self.script {
                if *at == call {
                    level.set(*low);
                }
            }
            self.calls.set(call + 1);
        }
    }

    fn pins() -> [MockPin; BUTTON_COUNT] {
        [MockPin::new(), MockPin::new(), MockPin::new(), MockPin::new()]
    }

    fn plain_delay() -> ScriptedDelay {
        ScriptedDelay {
            calls: Rc::new(Cell::new(0)),
            script: std::vec::Vec::new(),
        }
    }

    #[test]
    fn baseline_is_taken_at_construction() {
        let pins = pins();
        pins[1].low.set(true);
        let scanner = ButtonScanner::new(pins, plain_delay(), 20);
        assert_eq!(scanner.state(), 0b0010);
    }

    #[test]
    fn press_then_release_of_button_three() {
        let pins = pins();
        let level = pins[2].low.clone();
        let mut scanner = ButtonScanner::new(pins, plain_delay(), 20);

        level.set(true);
        assert_eq!(block_on(scanner.next_change()), (0b0100, 0b0100));

        level.set(false);
        let events = block_on(scanner.next_events());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].button, ButtonId::Button3);
        assert_eq!(events[0].edge, Edge::Released);
    }

    #[test]
    fn bounce_inside_debounce_window_is_ignored() {
        let pins = pins();
        let level = pins[0].low.clone();
        let calls = Rc::new(Cell::new(0));
        let delay = ScriptedDelay {
            calls: calls.clone(),
            // Glitch reverts during the first window, real press lands in the second.
            script: std::vec![(0, level.clone(), false), (1, level.clone(), true)],
        };
        let mut scanner = ButtonScanner::new(pins, delay, 20);

        level.set(true);
        let (state, changed) = block_on(scanner.next_change());

        assert_eq!((state, changed), (0b0001, 0b0001));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn simultaneous_changes_reported_together() {
        let pins = pins();
        pins[0].low.set(true);
        let b1 = pins[0].low.clone();
        let b4 = pins[3].low.clone();
        let mut scanner = ButtonScanner::new(pins, plain_delay(), 20);

        b1.set(false);
        b4.set(true);
        let events = block_on(scanner.next_events());
        assert_eq!(
            events.as_slice(),
            &[
                ButtonEvent::released(ButtonId::Button1),
                ButtonEvent::pressed(ButtonId::Button4),
            ]
        );
    }
}
