//! Advertisement data: building it on the remote, filtering it on the dongle.

use heapless::{String, Vec};

/// Maximum legacy advertising / scan response payload.
pub const MAX_ADV_LEN: usize = 31;

const AD_FLAGS: u8 = 0x01;
const AD_UUID128_INCOMPLETE: u8 = 0x06;
const AD_UUID128_COMPLETE: u8 = 0x07;
const AD_SHORT_NAME: u8 = 0x08;
const AD_COMPLETE_NAME: u8 = 0x09;

/// LE General Discoverable, BR/EDR not supported.
const FLAGS_GENERAL_DISC_NO_BREDR: u8 = 0x06;

pub type AdvData = Vec<u8, MAX_ADV_LEN>;

/// Iterate the `(ad_type, value)` structures of raw advertisement data.
///
/// Stops at the first zero-length or truncated structure.
fn ad_structures(data: &[u8]) -> impl Iterator<Item = (u8, &[u8])> {
    let mut i = 0;
    core::iter::from_fn(move || {
        let len = *data.get(i)? as usize;
        if len == 0 || i + len >= data.len() {
            return None;
        }
        let ad_type = data[i + 1];
        let value = &data[i + 2..i + 1 + len];
        i += len + 1;
        Some((ad_type, value))
    })
}

/// Check if raw advertisement data lists the given 128-bit service UUID
/// (little-endian, as it appears over the air).
pub fn contains_uuid128(data: &[u8], uuid_le: &[u8; 16]) -> bool {
    ad_structures(data)
        .filter(|(ad_type, _)| *ad_type == AD_UUID128_INCOMPLETE || *ad_type == AD_UUID128_COMPLETE)
        .any(|(_, uuids)| uuids.chunks_exact(16).any(|chunk| chunk == uuid_le))
}

/// Extract complete/shortened local name from advertisement data.
pub fn extract_device_name(data: &[u8]) -> Option<String<32>> {
    let (_, name_bytes) = ad_structures(data)
        .find(|(ad_type, _)| *ad_type == AD_SHORT_NAME || *ad_type == AD_COMPLETE_NAME)?;

    let mut name = String::new();
    for &b in name_bytes {
        if name.push(b as char).is_err() {
            break;
        }
    }
    Some(name)
}

fn push_structure(out: &mut AdvData, ad_type: u8, value: &[u8]) {
    // Callers size `value` to fit; a failed push only truncates.
    let _ = out.push(value.len() as u8 + 1);
    let _ = out.push(ad_type);
    let _ = out.extend_from_slice(value);
}

/// Advertising payload of the remote: flags plus its local name.
///
/// Names too long for the packet are cut and sent as a shortened name.
pub fn advertising_data(name: &str) -> AdvData {
    let mut out = AdvData::new();
    push_structure(&mut out, AD_FLAGS, &[FLAGS_GENERAL_DISC_NO_BREDR]);

    let room = MAX_ADV_LEN - out.len() - 2;
    let bytes = name.as_bytes();
    if bytes.len() <= room {
        push_structure(&mut out, AD_COMPLETE_NAME, bytes);
    } else {
        push_structure(&mut out, AD_SHORT_NAME, &bytes[..room]);
    }
    out
}

/// Scan response of the remote: its complete 128-bit service UUID list.
pub fn scan_response(uuid_le: &[u8; 16]) -> AdvData {
    let mut out = AdvData::new();
    push_structure(&mut out, AD_UUID128_COMPLETE, uuid_le);
    out
}
