//! Renders a finished bin table and its allocators: a diagnostic listing for
//! people and the `superbin_t` / `superalloc_t` array literals the native
//! allocator compiles in.

use std::io::{
  self,
  Write,
};

use superbin_classes::{
  Assignment,
  Bin,
  BinTable,
};
use thiserror::Error;

pub mod size;

pub use size::ByteSize;


#[derive(Debug, Error)]
pub enum EmitError {
  #[error("failed to write tables: {0}")]
  Io(#[from] io::Error),
}

pub type EmitResult<T> = Result<T, EmitError>;

const FIELD_MASK: u64 = 0x3FF;

/// Size split into the 10-bit megabyte, kilobyte and byte fields of `superbin_t`.
pub const fn packed_size(size: u64) -> (u64, u64, u64) {
  (
    (size >> 20) & FIELD_MASK,
    (size >> 10) & FIELD_MASK,
    size & FIELD_MASK,
  )
}

pub struct Emitter<W: Write> {
  out: W,
}

impl<W: Write> Emitter<W> {
  pub fn new(out: W) -> Self {
    Self { out }
  }

  pub fn into_inner(self) -> W {
    self.out
  }

  /// One line per distinct bin with the index its size maps to.
  pub fn write_bins(&mut self, table: &BinTable) -> EmitResult<()> {
    for bin in table.bins() {
      writeln!(
        self.out,
        "AllocSize: {}, Bin: {}",
        ByteSize(bin.size()),
        table.natural_index(bin.size())
      )?;
    }
    Ok(())
  }

  /// Placement of every assigned bin, grouped by allocator.
  pub fn write_placements(&mut self, table: &BinTable, assignment: &Assignment) -> EmitResult<()> {
    for (alloc_index, alloc) in assignment.allocators().iter().enumerate() {
      for &pos in alloc.bins() {
        let bin = &table.bins()[pos];
        self.write_placement(table, alloc_index, alloc.chunk_size(), bin)?;
      }
    }
    writeln!(self.out)?;
    Ok(())
  }

  fn write_placement(
    &mut self,
    table: &BinTable,
    alloc_index: usize,
    chunk_size: u64,
    bin: &Bin,
  ) -> EmitResult<()> {
    write!(
      self.out,
      "{}:{} AllocSize:{}, AllocCount:{}, ChunkSize:{}, UsedPagesPerChunk:{}",
      alloc_index,
      table.natural_index(bin.size()),
      ByteSize(bin.size()),
      chunk_size / bin.size(),
      ByteSize(chunk_size),
      bin.num_pages()
    )?;

    if bin.uses_bin_map() {
      let bm = bin.bin_map();
      write!(
        self.out,
        ", BinMap({},{}):{}",
        bm.l1_len(),
        bm.l2_len(),
        bm.bytes()
      )?;
    }

    writeln!(self.out)?;
    Ok(())
  }

  /// `c_asbins` and `c_allocators` declarations.
  pub fn write_cpp(&mut self, table: &BinTable, assignment: &Assignment) -> EmitResult<()> {
    writeln!(self.out, "static const s32        c_num_bins = {};", table.len())?;
    writeln!(self.out, "static const superbin_t c_asbins[c_num_bins] = {{")?;
    for (_, bin) in table.iter() {
      let (mb, kb, b) = packed_size(bin.size());
      writeln!(
        self.out,
        "superbin_t({},{},{},{},{},{},{},{},{}),",
        mb,
        kb,
        b,
        bin.bin_index(),
        bin.alloc_index().unwrap_or(0),
        u8::from(bin.uses_bin_map()),
        bin.alloc_count(),
        bin.bin_map().l1_len(),
        bin.bin_map().l2_len()
      )?;
    }
    writeln!(self.out, "}};")?;

    let allocators = assignment.allocators();
    writeln!(
      self.out,
      "static const s32    c_num_allocators = {};",
      allocators.len()
    )?;
    writeln!(self.out, "static superalloc_t c_allocators[c_num_allocators] = {{")?;
    for alloc in allocators {
      writeln!(self.out, "    superalloc_t({}),", alloc.chunk_size())?;
    }
    writeln!(self.out, "}};")?;
    Ok(())
  }

  /// Bin listing, placements, then the array literals.
  pub fn write_all(&mut self, table: &BinTable, assignment: &Assignment) -> EmitResult<()> {
    self.write_bins(table)?;
    self.write_placements(table, assignment)?;
    self.write_cpp(table, assignment)?;
    self.out.flush()?;
    Ok(())
  }
}
