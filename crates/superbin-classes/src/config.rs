use getset::{
  CopyGetters,
  Getters,
};

use crate::{
  ClassError,
  ClassResult,
};

pub const MIN_SUB_BUCKETS: u32 = 2;
pub const MAX_SUB_BUCKETS: u32 = 8;

/// Worst-case rounding waste, expressed as the number of sub-buckets each
/// power-of-two band is split into, plus the small bins folded into coarser
/// ones.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct WasteTarget {
  #[getset(get_copy = "pub")]
  sub_bucket_count: u32,
  /// `(from, to)` sizes; the bin of `from` is redirected to the bin of `to`.
  #[getset(get = "pub")]
  remap: Vec<(u64, u64)>,
}

impl WasteTarget {
  pub fn new(sub_bucket_count: u32, remap: Vec<(u64, u64)>) -> ClassResult<Self> {
    if !sub_bucket_count.is_power_of_two()
      || !(MIN_SUB_BUCKETS..=MAX_SUB_BUCKETS).contains(&sub_bucket_count)
    {
      return Err(ClassError::InvalidSubBuckets(sub_bucket_count));
    }

    Ok(Self {
      sub_bucket_count,
      remap,
    })
  }

  /// About 10% waste: eight sub-buckets per band.
  pub fn percent10() -> Self {
    Self {
      sub_bucket_count: 8,
      remap: vec![
        (9, 12),
        (10, 12),
        (11, 12),
        (13, 16),
        (14, 16),
        (15, 16),
        (18, 20),
        (22, 24),
        (26, 28),
        (30, 32),
      ],
    }
  }

  /// About 25% waste: four sub-buckets per band.
  pub fn percent25() -> Self {
    Self {
      sub_bucket_count: 4,
      remap: vec![(10, 12), (14, 16)],
    }
  }

  #[inline(always)]
  pub const fn sub_bucket_shift(&self) -> u32 {
    self.sub_bucket_count.trailing_zeros()
  }
}

impl Default for WasteTarget {
  fn default() -> Self {
    Self::percent25()
  }
}
