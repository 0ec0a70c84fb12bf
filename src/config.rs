use superbin_classes::{
  ClassError,
  ClassResult,
  WasteTarget,
  table::{
    MAX_ALLOC_LIMIT,
    MIN_ALLOC_SIZE,
  },
  validate_chunks,
};
use superbin_sys::prelude::*;

use crate::PlanError;

pub const MAX_ALLOC_SIZE: u64 = mb(256);
pub const PAGE_SIZE: u64 = DEFAULT_PAGE_SIZE;
pub const CHUNK_SIZES: [u64; 15] = [
  kb(16),
  kb(64),
  kb(128),
  kb(256),
  kb(512),
  mb(1),
  mb(2),
  mb(4),
  mb(8),
  mb(16),
  mb(32),
  mb(64),
  mb(128),
  mb(256),
  gb(1),
];

/// Everything one generator run depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub waste_target: WasteTarget,
  pub max_alloc_size: u64,
  pub page_size: u64,
  pub chunk_sizes: Vec<u64>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      waste_target: WasteTarget::percent25(),
      max_alloc_size: MAX_ALLOC_SIZE,
      page_size: PAGE_SIZE,
      chunk_sizes: CHUNK_SIZES.to_vec(),
    }
  }
}

impl Config {
  pub fn validate(&self) -> ClassResult<()> {
    if !(MIN_ALLOC_SIZE..=MAX_ALLOC_LIMIT).contains(&self.max_alloc_size) {
      return Err(ClassError::MaxAllocSize {
        size: self.max_alloc_size,
        min: MIN_ALLOC_SIZE,
        max: MAX_ALLOC_LIMIT,
      });
    }
    validate_chunks(&self.chunk_sizes, self.page_size)
  }
}

/// Parses a byte count with an optional `K`, `M` or `G` suffix (1024 based).
pub fn parse_size(text: &str) -> Result<u64, PlanError> {
  let trimmed = text.trim();
  let invalid = || PlanError::InvalidSize(text.to_string());

  let digits_end = trimmed
    .find(|c: char| !c.is_ascii_digit())
    .unwrap_or(trimmed.len());
  let (digits, suffix) = trimmed.split_at(digits_end);
  let value: u64 = digits.parse().map_err(|_| invalid())?;

  let unit = match suffix.trim().to_ascii_uppercase().as_str() {
    "" | "B" => 1,
    "K" | "KB" | "KIB" => kb(1),
    "M" | "MB" | "MIB" => mb(1),
    "G" | "GB" | "GIB" => gb(1),
    _ => return Err(invalid()),
  };

  value.checked_mul(unit).ok_or_else(invalid)
}
