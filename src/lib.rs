//! Offline generator for the superalloc bin and allocator tables.
//!
//! A run enumerates the bins up to the maximum allocation size, places each
//! bin in the smallest chunk size that hosts it with under 1% tail waste,
//! sizes the bin maps, and renders the result.

use std::io::{
  self,
  Write,
};

use superbin_classes::{
  Assignment,
  BinTable,
  ClassError,
  assign,
  size_bin_maps,
};
use superbin_emit::{
  EmitError,
  Emitter,
};
use thiserror::Error;
use tracing::{
  error,
  info,
};

pub mod config;

pub use config::Config;

#[cfg(test)]
mod tests;

pub mod prelude {
  pub use superbin_bitmap::BinMapGeometry;
  pub use superbin_classes::{
    Assignment,
    Bin,
    BinTable,
    SuperAlloc,
    WasteTarget,
    bin_index,
  };
  pub use superbin_emit::{
    ByteSize,
    Emitter,
  };
  pub use superbin_sys::prelude::*;

  pub use super::{
    Config,
    Plan,
    PlanError,
    PlanResult,
  };
}

#[derive(Debug, Error)]
pub enum PlanError {
  #[error(transparent)]
  Class(#[from] ClassError),
  #[error(transparent)]
  Emit(#[from] EmitError),
  #[error("invalid size `{0}`, expected bytes with an optional K, M or G suffix")]
  InvalidSize(String),
}

pub type PlanResult<T> = Result<T, PlanError>;

/// Finished tables of one run.
#[derive(Debug, Clone)]
pub struct Plan {
  table: BinTable,
  assignment: Assignment,
}

impl Plan {
  pub fn generate(config: &Config) -> PlanResult<Self> {
    let table = Self::enumerate(config)?;
    Self::complete(table, config)
  }

  /// Validated configuration and the bin table before any remap.
  fn enumerate(config: &Config) -> PlanResult<BinTable> {
    config.validate()?;
    Ok(BinTable::enumerate(
      config.max_alloc_size,
      &config.waste_target,
    )?)
  }

  /// Remap, chunk assignment and bin-map sizing.
  fn complete(mut table: BinTable, config: &Config) -> PlanResult<Self> {
    table.remap(config.waste_target.remap())?;
    let assignment = assign(&mut table, &config.chunk_sizes, config.page_size)?;
    size_bin_maps(&mut table, &assignment);

    info!(
      bins = table.len(),
      allocators = assignment.allocators().len(),
      unplaced = assignment.unplaced().len(),
      "generated plan"
    );
    Ok(Self { table, assignment })
  }

  pub fn table(&self) -> &BinTable {
    &self.table
  }

  pub fn assignment(&self) -> &Assignment {
    &self.assignment
  }

  pub fn emit<W: Write>(&self, out: W) -> PlanResult<W> {
    let mut emitter = Emitter::new(out);
    emitter.write_all(&self.table, &self.assignment)?;
    Ok(emitter.into_inner())
  }
}

/// Generates and emits the tables for `config`.
///
/// The bin listing is written as soon as the table is enumerated, so a fault
/// in a later stage leaves it in place, followed by an `Exception:` line. The
/// output always ends with `Done...`.
pub fn run<W: Write>(config: &Config, out: &mut W) -> io::Result<()> {
  if let Err(err) = generate_into(config, &mut *out) {
    error!(%err, "generation failed");
    writeln!(out, "Exception: {err}")?;
  }
  writeln!(out, "Done...")?;
  out.flush()
}

fn generate_into<W: Write>(config: &Config, out: W) -> PlanResult<()> {
  let mut emitter = Emitter::new(out);

  let table = Plan::enumerate(config)?;
  emitter.write_bins(&table)?;

  let plan = Plan::complete(table, config)?;
  emitter.write_placements(&plan.table, &plan.assignment)?;
  emitter.write_cpp(&plan.table, &plan.assignment)?;
  Ok(())
}
