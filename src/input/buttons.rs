//! GPIO button wiring for the remote.
//!
//! Four tactile switches, active-low with internal pull-ups. A single task
//! scans all of them and pushes debounced events into the button channel
//! consumed by the BLE link task.

use crate::config::{BUTTON_COUNT, BUTTON_DEBOUNCE_MS, BUTTON_EVENT_DEPTH};
use crate::input::scanner::ButtonScanner;
use crate::input::ButtonEvent;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::Delay;

/// Scanner over the on-board button pins.
pub type Buttons = ButtonScanner<Input<'static>, Delay>;

/// Configure the four button pins and build the scanner.
pub fn init(pins: [AnyPin; BUTTON_COUNT]) -> Buttons {
    let inputs = pins.map(|pin| Input::new(pin, Pull::Up));
    ButtonScanner::new(inputs, Delay, BUTTON_DEBOUNCE_MS)
}

/// Scan loop: forwards every debounced edge to `tx`.
///
/// Never blocks on the channel; if the link task has fallen behind the
/// event is dropped.
pub async fn button_task(
    mut buttons: Buttons,
    tx: Sender<'static, CriticalSectionRawMutex, ButtonEvent, BUTTON_EVENT_DEPTH>,
) -> ! {
    info!("Button task started");

    loop {
        for event in buttons.next_events().await {
            debug!("Button: {}", event);
            if tx.try_send(event).is_err() {
                warn!("Button channel full - event dropped");
            }
        }
    }
}
