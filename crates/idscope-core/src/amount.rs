//! Fixed-point formatting of raw token amounts.
//!
//! Amounts are shifted and rounded on their decimal digits, so no value
//! ever passes through floating point.

use crate::types::RawBalance;

/// Fractional digits shown for balance totals.
pub const BALANCE_PRECISION: u32 = 2;

/// Format `raw / 10^decimals` with exactly `places` fractional digits,
/// rounding half up.
pub fn to_fixed(raw: RawBalance, decimals: u32, places: u32) -> String {
    let decimals = decimals as usize;
    let places = places as usize;

    let mut digits: Vec<u8> = raw.to_string().into_bytes();
    // Everything rounds away below the last kept place.
    if decimals > digits.len() + places {
        return match places {
            0 => "0".to_string(),
            _ => format!("0.{}", "0".repeat(places)),
        };
    }

    // Left-pad so there is at least one integer digit.
    if digits.len() <= decimals {
        let mut padded = vec![b'0'; decimals + 1 - digits.len()];
        padded.append(&mut digits);
        digits = padded;
    }
    let int_len = digits.len() - decimals;

    let mut kept: Vec<u8>;
    if decimals <= places {
        kept = digits;
        kept.resize(int_len + places, b'0');
    } else {
        let round_up = digits[int_len + places] >= b'5';
        kept = digits[..int_len + places].to_vec();
        if round_up && increment(&mut kept) {
            kept.insert(0, b'1');
        }
    }

    let split = kept.len() - places;
    let int_part = String::from_utf8_lossy(&kept[..split]);
    let int_part = int_part.trim_start_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };

    if places == 0 {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, String::from_utf8_lossy(&kept[split..]))
    }
}

/// Add one to a string of ASCII digits. Returns true on carry out.
fn increment(digits: &mut [u8]) -> bool {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return false;
        }
    }
    true
}

/// Total of free and reserved balance in human units, two decimals.
///
/// Returns `None` if the sum does not fit in a `u128`.
pub fn format_total(free: RawBalance, reserved: RawBalance, decimals: u32) -> Option<String> {
    let total = free.checked_add(reserved)?;
    Some(to_fixed(total, decimals, BALANCE_PRECISION))
}
