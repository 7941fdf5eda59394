//! USB Device subsystem - presents the HID device to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. One HID interface carries both report shapes:
//!
//! - Report ID 1: Keyboard
//! - Report ID 2: Consumer control
//!
//! The report pump submits serialized reports; a dedicated task writes
//! them to the interrupt-IN endpoint one at a time.

pub mod hid_device;
