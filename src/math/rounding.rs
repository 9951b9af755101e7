//! Decimal rounding shared by every transform.

/// Extra digits formatted past the rounding position; enough that the digit
/// deciding the rounding is taken from the exact decimal expansion.
const GUARD_DIGITS: usize = 30;

/// Magnitudes beyond this carry no fractional digits worth rounding.
const MAX_ROUNDABLE: f64 = 1e15;

/// Round `value` to `decimals` places the way fixed-point string formatting
/// does: the exact decimal value of the `f64` is rounded half-up on its
/// magnitude and the sign is preserved.
///
/// Multiplying by `10^decimals` first would round in binary (e.g. `2.675 * 100`
/// becomes exactly `267.5` although `2.675` is stored as `2.67499...`), so the
/// decision digit is read from the decimal expansion instead.
///
/// Non-finite inputs are returned unchanged; a rounded negative zero becomes `0.0`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let magnitude = value.abs();
    if magnitude >= MAX_ROUNDABLE {
        return value;
    }

    let text = format!("{magnitude:.prec$}", prec = decimals as usize + GUARD_DIGITS);
    let (head, tail) = text.split_at(text.len() - GUARD_DIGITS);
    let round_up = tail.as_bytes().first().is_some_and(|b| *b >= b'5');

    let digits: String = head.chars().filter(|c| c.is_ascii_digit()).collect();
    let Ok(mut units) = digits.parse::<u64>() else {
        return value;
    };
    if round_up {
        units += 1;
    }

    let rounded = units as f64 / 10f64.powi(decimals as i32);
    if rounded == 0.0 {
        0.0
    } else {
        rounded.copysign(value)
    }
}

pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

pub fn round3(value: f64) -> f64 {
    round_to(value, 3)
}

pub fn round4(value: f64) -> f64 {
    round_to(value, 4)
}
