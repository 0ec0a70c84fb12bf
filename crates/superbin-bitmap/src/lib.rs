#![cfg_attr(not(test), no_std)]

//! Geometry of the two-level free/used bin map a chunk carries at runtime.
//!
//! Level 2 holds one bit per slot in 16-bit words, level 1 holds one bit per
//! level 2 word. Chunks with few slots are tracked directly and need no map.

use superbin_sys::math::ceil_pow2;


/// Bits per bin map word; each level 1 bit summarizes one level 2 word.
pub const FANOUT: u64 = 16;

/// Slot counts up to this are tracked without a bin map.
pub const DIRECT_LIMIT: u64 = 32;

/// Minimum number of level 1 words once a bin map exists.
pub const MIN_L1_LEN: u64 = 2;

/// Fixed header cost of a bin map in bytes.
const HEADER_BYTES: u64 = 4;

/// Bytes per bin map word.
const WORD_BYTES: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinMapGeometry {
  count: u64,
  l1_len: u32,
  l2_len: u32,
}

impl BinMapGeometry {
  pub const fn for_count(count: u64) -> Self {
    if count <= DIRECT_LIMIT {
      return Self {
        count,
        l1_len: 0,
        l2_len: 0,
      };
    }

    let l2_len = ceil_pow2(count.div_ceil(FANOUT));
    let mut l1_len = l2_len.div_ceil(FANOUT);
    if l1_len < MIN_L1_LEN {
      l1_len = MIN_L1_LEN;
    }

    Self {
      count,
      l1_len: ceil_pow2(l1_len) as u32,
      l2_len: ceil_pow2(l2_len) as u32,
    }
  }

  #[inline(always)]
  pub const fn count(&self) -> u64 {
    self.count
  }

  #[inline(always)]
  pub const fn l1_len(&self) -> u32 {
    self.l1_len
  }

  #[inline(always)]
  pub const fn l2_len(&self) -> u32 {
    self.l2_len
  }

  #[inline(always)]
  pub const fn is_direct(&self) -> bool {
    self.l1_len == 0 && self.l2_len == 0
  }

  /// Runtime footprint: header plus both levels.
  pub const fn bytes(&self) -> u64 {
    HEADER_BYTES + WORD_BYTES * (self.l1_len as u64 + self.l2_len as u64)
  }

  /// Number of slots the level 2 words can describe.
  pub const fn capacity(&self) -> u64 {
    if self.is_direct() {
      return DIRECT_LIMIT;
    }
    self.l2_len as u64 * FANOUT
  }
}
