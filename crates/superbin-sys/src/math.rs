const HIGH_BIT: u64 = 1 << 63;

/// Number of leading zero bits in the 64-bit representation, 64 for zero.
#[inline(always)]
pub const fn count_leading_zeros(value: u64) -> u32 {
  value.leading_zeros()
}

/// Number of trailing zero bits.
///
/// Zero is degenerate and reports 0 rather than 64.
#[inline(always)]
pub const fn count_trailing_zeros(value: u64) -> u32 {
  if value == 0 {
    return 0;
  }
  value.trailing_zeros()
}

/// Index of the highest set bit, `floor(log2(value))`. Zero maps to 0.
#[inline(always)]
pub const fn log2_floor(value: u64) -> u32 {
  if value == 0 {
    return 0;
  }
  63 - count_leading_zeros(value)
}

#[inline(always)]
pub const fn is_pow2(value: u64) -> bool {
  value != 0 && (value & (value - 1)) == 0
}

/// Smallest power of two `>= value`.
///
/// Zero rounds to 1. Values above `2^63` have no 64-bit power of two above
/// them and wrap to 0.
pub const fn ceil_pow2(value: u64) -> u64 {
  match value.checked_next_power_of_two() {
    Some(pow) => pow,
    None => 0,
  }
}

/// Largest power of two `<= value`, 0 for zero.
pub const fn floor_pow2(value: u64) -> u64 {
  if value == 0 {
    return 0;
  }
  HIGH_BIT >> count_leading_zeros(value)
}

pub const fn is_aligned(value: u64, align: u64) -> Option<bool> {
  if !is_pow2(align) {
    return None;
  }
  Some((value & (align - 1)) == 0)
}

/// Smallest multiple of `align` that is `>= value`.
///
/// `None` when `align` is not a power of two or the result does not fit.
pub const fn align_to(value: u64, align: u64) -> Option<u64> {
  if !is_pow2(align) {
    return None;
  }

  let mask = align - 1;
  if let Some(sum) = value.checked_add(mask) {
    return Some(sum & !mask);
  }

  None
}
