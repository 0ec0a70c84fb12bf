use superbin_sys::prelude::*;

use crate::{
  ClassError,
  ClassResult,
  config::WasteTarget,
};

/// Maps an allocation size to its bin.
///
/// The band `[2^e, 2^(e+1))` holding `size` is cut into `N` sub-buckets and
/// `size` is rounded up to the next sub-bucket boundary, so rounding never
/// adds more than `size / N`. The index is the rounded value's position in
/// the band, offset by `N` per band. Bands narrower than `N` bytes are not
/// split, which makes every size below `2N` its own bin.
///
/// `size` must be non-zero, see [`try_bin_index`].
pub fn bin_index(size: u64, target: &WasteTarget) -> usize {
  debug_assert!(size != 0, "bin_index of a zero size");

  let shift = target.sub_bucket_shift();
  let exp = log2_floor(size);
  let granule = ((1u64 << exp) - 1) >> shift;
  // u128 keeps the top band from wrapping when rounding up.
  let rounded = (size as u128 + granule as u128) & !(granule as u128);
  let band = exp.saturating_sub(shift);

  (rounded >> band) as usize + band as usize * target.sub_bucket_count() as usize
}

pub fn try_bin_index(size: u64, target: &WasteTarget) -> ClassResult<usize> {
  if size == 0 {
    return Err(ClassError::ZeroSize);
  }
  Ok(bin_index(size, target))
}

/// Size `size` is rounded up to inside its bin.
pub fn rounded_size(size: u64, target: &WasteTarget) -> u64 {
  if size == 0 {
    return 0;
  }
  let exp = log2_floor(size);
  let granule = ((1u64 << exp) - 1) >> target.sub_bucket_shift();
  size.saturating_add(granule) & !granule
}
