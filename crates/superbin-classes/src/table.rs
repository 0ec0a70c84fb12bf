use getset::Getters;
use tracing::{
  debug,
  info,
  trace,
};

use crate::{
  ClassError,
  ClassResult,
  bin::Bin,
  classes::{
    bin_index,
    try_bin_index,
  },
  config::WasteTarget,
};

/// Smallest allocation size the table covers.
pub const MIN_ALLOC_SIZE: u64 = 8;

/// Largest `max_alloc_size` accepted; bin sizes stay below `2 * MAX_ALLOC_LIMIT`.
pub const MAX_ALLOC_LIMIT: u64 = 1 << 31;

/// Dense bin table.
///
/// `bins` holds one representative per distinct bin in ascending size,
/// `slots[i]` names the representative populating index `i`. Indices below the
/// first representative's own index are populated by that representative.
#[derive(Debug, Clone, Getters)]
pub struct BinTable {
  #[getset(get = "pub")]
  bins: Vec<Bin>,
  #[getset(get = "pub")]
  slots: Vec<usize>,
  #[getset(get = "pub")]
  target: WasteTarget,
}

impl BinTable {
  /// Enumerates the bins up to `max_alloc_size` and applies the target's remap.
  pub fn build(max_alloc_size: u64, target: &WasteTarget) -> ClassResult<Self> {
    let mut table = Self::enumerate(max_alloc_size, target)?;
    table.remap(target.remap())?;
    Ok(table)
  }

  /// Walks every sub-bucket boundary of every band `[b, 2b)` with
  /// `b <= max_alloc_size`, keeping the first size reaching each index.
  pub fn enumerate(max_alloc_size: u64, target: &WasteTarget) -> ClassResult<Self> {
    if !(MIN_ALLOC_SIZE..=MAX_ALLOC_LIMIT).contains(&max_alloc_size) {
      return Err(ClassError::MaxAllocSize {
        size: max_alloc_size,
        min: MIN_ALLOC_SIZE,
        max: MAX_ALLOC_LIMIT,
      });
    }

    let mut table = Self {
      bins: Vec::new(),
      slots: Vec::new(),
      target: target.clone(),
    };

    let parts = target.sub_bucket_count() as u64;
    let mut band = MIN_ALLOC_SIZE;
    while band <= max_alloc_size {
      let step = band / parts;
      let mut size = band;
      while size < band << 1 {
        let index = bin_index(size, target);
        trace!(size, index, "visit");
        table.populate(size, index);
        size += step;
      }
      band = size;
    }

    info!(
      bins = table.bins.len(),
      slots = table.slots.len(),
      max_alloc_size,
      "enumerated bin table"
    );
    Ok(table)
  }

  fn populate(&mut self, size: u64, index: usize) {
    if index < self.slots.len() {
      return;
    }

    let pos = self.bins.len();
    self.bins.push(Bin::new(size, index));
    self.slots.resize(index + 1, pos);
  }

  /// Redirects the bin of each `from` size to the index of its `to` size.
  ///
  /// Only the bin's declared index changes; its slot and size stay put.
  pub fn remap(&mut self, remap: &[(u64, u64)]) -> ClassResult<()> {
    for &(from, to) in remap {
      let from_index = self.checked_index(from)?;
      let to_index = self.checked_index(to)?;

      let pos = self.slots[from_index];
      self.bins[pos].redirect(to_index);
      debug!(from, to, from_index, to_index, "remapped bin");
    }
    Ok(())
  }

  fn checked_index(&self, size: u64) -> ClassResult<usize> {
    let index = try_bin_index(size, &self.target)?;
    if index >= self.slots.len() {
      return Err(ClassError::RemapOutOfRange {
        size,
        index,
        len: self.slots.len(),
      });
    }
    Ok(index)
  }

  /// Number of indices, `0..len()` are all populated.
  #[inline(always)]
  pub fn len(&self) -> usize {
    self.slots.len()
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  /// Bin populating `index`.
  pub fn get(&self, index: usize) -> Option<&Bin> {
    let pos = *self.slots.get(index)?;
    self.bins.get(pos)
  }

  /// Bin a request of `size` bytes is served from, following remaps.
  pub fn lookup(&self, size: u64) -> Option<&Bin> {
    let natural = try_bin_index(size, &self.target).ok()?;
    let effective = self.get(natural)?.bin_index();
    self.get(effective)
  }

  /// Index `size` maps to before any remap.
  #[inline(always)]
  pub fn natural_index(&self, size: u64) -> usize {
    bin_index(size, &self.target)
  }

  /// Every index in order, with its populating bin.
  pub fn iter(&self) -> impl Iterator<Item = (usize, &Bin)> + '_ {
    self.slots.iter().map(|&pos| &self.bins[pos]).enumerate()
  }

  pub(crate) fn bins_mut(&mut self) -> &mut [Bin] {
    &mut self.bins
  }
}
