#![cfg_attr(not(test), no_std)]

pub mod math;
pub mod prim;

pub mod prelude {
  pub use super::{
    math::{
      align_to,
      ceil_pow2,
      count_leading_zeros,
      count_trailing_zeros,
      floor_pow2,
      is_aligned,
      is_pow2,
      log2_floor,
    },
    prim::{
      DEFAULT_PAGE_SIZE,
      gb,
      kb,
      mb,
    },
  };
}
