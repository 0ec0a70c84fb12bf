use getset::CopyGetters;
use superbin_bitmap::BinMapGeometry;

use crate::assign::Fit;

/// One size class and, once assigned, its placement inside a chunk.
#[derive(Debug, Clone, PartialEq, Eq, CopyGetters)]
pub struct Bin {
  /// Smallest size that maps to this bin.
  #[getset(get_copy = "pub")]
  size: u64,
  /// Effective bin index; differs from the natural one after a remap.
  #[getset(get_copy = "pub")]
  bin_index: usize,
  #[getset(get_copy = "pub")]
  alloc_index: Option<usize>,
  #[getset(get_copy = "pub")]
  num_pages: u32,
  /// Tail bytes left over in the used part of a chunk.
  #[getset(get_copy = "pub")]
  waste: u64,
  #[getset(get_copy = "pub")]
  alloc_count: u64,
  #[getset(get_copy = "pub")]
  bin_map: BinMapGeometry,
}

impl Bin {
  pub fn new(size: u64, bin_index: usize) -> Self {
    Self {
      size,
      bin_index,
      alloc_index: None,
      num_pages: 1,
      waste: 0,
      alloc_count: 0,
      bin_map: BinMapGeometry::default(),
    }
  }

  #[inline(always)]
  pub fn is_placed(&self) -> bool {
    self.alloc_index.is_some()
  }

  /// Slots of a placed bin are tracked through a bin map.
  #[inline(always)]
  pub fn uses_bin_map(&self) -> bool {
    self.alloc_count > 1
  }

  pub(crate) fn redirect(&mut self, bin_index: usize) {
    self.bin_index = bin_index;
  }

  pub(crate) fn place(&mut self, alloc_index: usize, fit: &Fit) {
    self.alloc_index = Some(alloc_index);
    self.num_pages = fit.pages();
    self.waste = fit.waste();
    self.alloc_count = fit.block() / self.size;
  }

  pub fn set_bin_map(&mut self, bin_map: BinMapGeometry) {
    self.bin_map = bin_map;
  }
}
