//! Bluetooth Low Energy subsystem.
//!
//! Both devices talk over the Nordic UART Service (NUS):
//!
//! - **Remote** ([`peripheral`]) - GATT server, advertises the custom
//!   remote service UUID in its scan response and notifies each 2-byte
//!   button frame on the NUS TX characteristic.
//! - **Dongle** ([`central`]) - scans for that UUID, connects, subscribes
//!   to NUS TX and feeds every notification into the report bridge.
//!
//! NUS UUIDs:
//!   service `6e400001-b5a3-f393-e0a9-e50e24dcca9e`,
//!   RX (write) `6e400002-...`, TX (notify) `6e400003-...`.

pub mod adv;

#[cfg(feature = "embedded")]
pub mod central;
#[cfg(feature = "embedded")]
pub mod peripheral;

#[cfg(feature = "embedded")]
pub use softdevice::{softdevice_config, Role};

#[cfg(feature = "embedded")]
mod softdevice {
    use core::mem;

    use nrf_softdevice::raw;

    use crate::config::BLE_DEVICE_NAME;

    /// GAP role a device runs the SoftDevice in.
    #[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
    pub enum Role {
        /// Remote: one peripheral link, advertising.
        Peripheral,
        /// Dongle: one central link, scanning.
        Central,
    }

    /// SoftDevice configuration for a single-link device in `role`.
    pub fn softdevice_config(role: Role) -> nrf_softdevice::Config {
        let (periph_role_count, central_role_count, adv_set_count) = match role {
            Role::Peripheral => (1, 0, 1),
            Role::Central => (0, 1, 0),
        };

        nrf_softdevice::Config {
            clock: Some(raw::nrf_clock_lf_cfg_t {
                source: raw::NRF_CLOCK_LF_SRC_RC as u8,
                rc_ctiv: 16,
                rc_temp_ctiv: 2,
                accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
            }),
            conn_gap: Some(raw::ble_gap_conn_cfg_t {
                conn_count: 1,
                event_length: 24,
            }),
            conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 23 }),
            gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
                attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
            }),
            gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
                adv_set_count,
                periph_role_count,
                central_role_count,
                central_sec_count: 0,
                _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
            }),
            gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
                p_value: BLE_DEVICE_NAME.as_ptr() as _,
                current_len: BLE_DEVICE_NAME.len() as u16,
                max_len: BLE_DEVICE_NAME.len() as u16,
                // SAFETY: all-zero is a valid "no access" security mode.
                write_perm: unsafe { mem::zeroed() },
                _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                    raw::BLE_GATTS_VLOC_STACK as u8,
                ),
            }),
            ..Default::default()
        }
    }
}
