use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Every driver value in the engine is a `Fixed64` so that evaluation is
/// bit-for-bit deterministic across platforms. `f64` appears only in
/// boundary DTOs (JSON/RON/TOML wire shapes).
pub type Fixed64 = I32F32;

/// Convert an f64 to Fixed64. Use only at boundaries, never mid-evaluation.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display/export.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Convert an integer driver value (tons, MW, BTU) to Fixed64.
#[inline]
pub fn i64_to_fixed64(v: i64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Checked multiplication that returns None on overflow.
#[inline]
pub fn checked_mul_64(a: Fixed64, b: Fixed64) -> Option<Fixed64> {
    a.checked_mul(b)
}

/// Checked division that returns None on a zero divisor or overflow.
#[inline]
pub fn checked_div_64(a: Fixed64, b: Fixed64) -> Option<Fixed64> {
    a.checked_div(b)
}

/// Interpret `pct` as a percentage of 100 and scale `value` by it.
/// `percent_of(200, 2.5)` is 5.
#[inline]
pub fn percent_of(value: Fixed64, pct: Fixed64) -> Fixed64 {
    value * (pct / Fixed64::from_num(100))
}
