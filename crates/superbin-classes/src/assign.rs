use std::collections::BTreeSet;

use getset::{
  CopyGetters,
  Getters,
};
use superbin_bitmap::BinMapGeometry;
use superbin_sys::prelude::*;
use tracing::{
  debug,
  info,
  warn,
};

use crate::{
  ClassError,
  ClassResult,
  table::BinTable,
};

/// Tail waste of an accepted block may not exceed `block / TAIL_WASTE_DIVISOR`.
pub const TAIL_WASTE_DIVISOR: u64 = 100;

/// Most pages a chunk may span; page counts are stored as `u32`.
pub const MAX_CHUNK_PAGES: u64 = u32::MAX as u64;

/// All bins served from chunks of one size.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct SuperAlloc {
  #[getset(get_copy = "pub")]
  chunk_size: u64,
  /// Positions into [`BinTable::bins`].
  #[getset(get = "pub")]
  bins: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct Assignment {
  #[getset(get = "pub")]
  allocators: Vec<SuperAlloc>,
  /// Bins no chunk size could host, absent from every allocator.
  #[getset(get = "pub")]
  unplaced: Vec<usize>,
}

impl Assignment {
  /// Allocator holding the bin at `pos`, if any.
  pub fn allocator_of(&self, pos: usize) -> Option<usize> {
    self
      .allocators
      .iter()
      .position(|alloc| alloc.bins.contains(&pos))
  }
}

/// Used part of a chunk for one bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
pub struct Fit {
  #[getset(get_copy = "pub")]
  block: u64,
  #[getset(get_copy = "pub")]
  pages: u32,
  #[getset(get_copy = "pub")]
  waste: u64,
}

/// Finds how many pages of a `chunk_size` chunk to use for `size` slots.
///
/// Blocks are tried from the whole chunk down to a single page. A block is
/// taken when its tail waste is within 1% of the block and below the best
/// seen so far, which starts at one page. The first such block wins even if
/// a smaller block would waste less.
pub fn fit(size: u64, chunk_size: u64, page_size: u64) -> Option<Fit> {
  if size == 0 || page_size == 0 || size > chunk_size {
    return None;
  }
  if chunk_size / page_size > MAX_CHUNK_PAGES {
    return None;
  }

  let best = page_size;
  let mut block = chunk_size;
  while block >= page_size {
    let waste = block % size;
    if waste <= block / TAIL_WASTE_DIVISOR && waste < best {
      return Some(Fit {
        block,
        pages: u32::try_from(block / page_size).ok()?,
        waste,
      });
    }
    block -= page_size;
  }

  None
}

pub fn validate_chunks(chunk_sizes: &[u64], page_size: u64) -> ClassResult<()> {
  if !is_pow2(page_size) {
    return Err(ClassError::InvalidPageSize(page_size));
  }
  if chunk_sizes.is_empty() {
    return Err(ClassError::NoChunkSizes);
  }

  let mut prev = 0;
  for &chunk in chunk_sizes {
    if !is_pow2(chunk) {
      return Err(ClassError::ChunkNotPow2(chunk));
    }
    if is_aligned(chunk, page_size) != Some(true) || chunk < page_size {
      return Err(ClassError::ChunkNotPageMultiple {
        chunk,
        page: page_size,
      });
    }
    if chunk / page_size > MAX_CHUNK_PAGES {
      return Err(ClassError::ChunkTooLarge {
        chunk,
        page: page_size,
        max_pages: MAX_CHUNK_PAGES,
      });
    }
    if chunk <= prev {
      return Err(ClassError::ChunkOrder { prev, next: chunk });
    }
    prev = chunk;
  }
  Ok(())
}

/// Places every bin in the smallest chunk size that fits it.
///
/// One [`SuperAlloc`] is produced per chunk size, in order, whether or not
/// it received bins. Bins no chunk size can host stay unplaced.
pub fn assign(
  table: &mut BinTable,
  chunk_sizes: &[u64],
  page_size: u64,
) -> ClassResult<Assignment> {
  validate_chunks(chunk_sizes, page_size)?;

  let mut pending: BTreeSet<usize> = (0..table.bins().len()).collect();
  let mut allocators = Vec::with_capacity(chunk_sizes.len());

  for (alloc_index, &chunk_size) in chunk_sizes.iter().enumerate() {
    let bins = place_chunk(table, &mut pending, alloc_index, chunk_size, page_size);
    info!(alloc_index, chunk_size, bins = bins.len(), "filled allocator");
    allocators.push(SuperAlloc { chunk_size, bins });
  }

  let unplaced: Vec<usize> = pending.into_iter().collect();
  for &pos in &unplaced {
    warn!(size = table.bins()[pos].size(), "bin fits no chunk size");
  }

  Ok(Assignment {
    allocators,
    unplaced,
  })
}

/// Sizes the bin map of every placed bin holding more than one slot, from
/// the number of slots a whole chunk of its allocator holds.
pub fn size_bin_maps(table: &mut BinTable, assignment: &Assignment) {
  let bins = table.bins_mut();
  for alloc in &assignment.allocators {
    for &pos in &alloc.bins {
      let bin = &mut bins[pos];
      if !bin.uses_bin_map() {
        continue;
      }
      let bm = BinMapGeometry::for_count(alloc.chunk_size / bin.size());
      bin.set_bin_map(bm);
    }
  }
}

fn place_chunk(
  table: &mut BinTable,
  pending: &mut BTreeSet<usize>,
  alloc_index: usize,
  chunk_size: u64,
  page_size: u64,
) -> Vec<usize> {
  let bins = table.bins_mut();
  let mut placed = Vec::new();

  for &pos in pending.iter() {
    let bin = &mut bins[pos];
    if bin.size() > chunk_size {
      continue;
    }
    let Some(found) = fit(bin.size(), chunk_size, page_size) else {
      continue;
    };

    bin.place(alloc_index, &found);
    debug!(
      alloc_index,
      size = bin.size(),
      pages = found.pages(),
      waste = found.waste(),
      "placed bin"
    );
    placed.push(pos);
  }

  for pos in &placed {
    pending.remove(pos);
  }
  placed
}
