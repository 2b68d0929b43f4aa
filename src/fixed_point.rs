//! Fixed-point representation of fractional seconds.
//!
//! A floating value is split into its integer part and a fraction scaled by `2^size`. The
//! sortable generator stores seconds with `size = 12` and a precision of three decimal digits,
//! which maps every millisecond to a distinct 12-bit value.

/// Rounds `num` to `digits` decimal places, halves rounding up.
///
/// An [`f64::EPSILON`] nudge counters representation error, so `1.255` rounds to `1.26` even
/// though its nearest binary value is slightly below.
pub fn round_precise(num: f64, digits: u32) -> f64 {
    let pow = 10f64.powi(digits as i32);
    ((num + f64::EPSILON) * pow).round() / pow
}

/// Converts a floating value to an `(integer, fraction)` fixed-point pair.
///
/// The fraction is first rounded to `precision` decimal digits (if given), then scaled by
/// `2^size` and floored so that it always fits in `size` bits. A fraction that rounds to exactly
/// `1` carries into the integer part. Negative or NaN input saturates to zero.
///
/// # Examples
///
/// ```rust
/// use sortable_id::fixed_point::to_fixed_point;
///
/// assert_eq!(to_fixed_point(0.999, 12, Some(3)), (0, 4091));
/// assert_eq!(to_fixed_point(0.9995, 12, Some(3)), (1, 0));
/// assert_eq!(to_fixed_point(0.0005, 12, Some(3)), (0, 4));
/// ```
pub fn to_fixed_point(floating: f64, size: u32, precision: Option<u32>) -> (u64, u64) {
    let floating = floating.max(0.0);
    let mut integer = floating.trunc() as u64;
    let mut fractional = match precision {
        Some(digits) => round_precise(floating % 1.0, digits),
        None => floating % 1.0,
    };
    if fractional >= 1.0 {
        integer += 1;
        fractional = 0.0;
    }
    let fractional_fixed = (fractional * 2f64.powi(size as i32)).floor() as u64;
    (integer, fractional_fixed)
}

/// Converts an `(integer, fraction)` fixed-point pair back to a floating value.
///
/// This inverse is lossy near the field boundaries: [`to_fixed_point`] floors, so re-rounding to
/// `precision` digits recovers the original value only up to that precision.
pub fn from_fixed_point(
    (integer, fractional_fixed): (u64, u64),
    size: u32,
    precision: Option<u32>,
) -> f64 {
    let fractional = fractional_fixed as f64 / 2f64.powi(size as i32);
    let fractional = match precision {
        Some(digits) => round_precise(fractional, digits),
        None => fractional,
    };
    integer as f64 + fractional
}
