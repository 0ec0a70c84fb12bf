use thiserror::Error;

pub mod assign;
pub mod bin;
pub mod classes;
pub mod config;
pub mod table;


pub use assign::{
  Assignment,
  Fit,
  SuperAlloc,
  assign,
  fit,
  size_bin_maps,
  validate_chunks,
};
pub use bin::Bin;
pub use classes::{
  bin_index,
  try_bin_index,
};
pub use config::WasteTarget;
pub use table::BinTable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassError {
  #[error("allocation size must be at least one byte")]
  ZeroSize,
  #[error("sub-bucket count {0} must be a power of two between 2 and 8")]
  InvalidSubBuckets(u32),
  #[error("max alloc size {size} outside of [{min}, {max}]")]
  MaxAllocSize { size: u64, min: u64, max: u64 },
  #[error("remap of size {size} hits bin {index}, table holds {len}")]
  RemapOutOfRange { size: u64, index: usize, len: usize },
  #[error("page size {0} is not a power of two")]
  InvalidPageSize(u64),
  #[error("no chunk sizes configured")]
  NoChunkSizes,
  #[error("chunk size {0} is not a power of two")]
  ChunkNotPow2(u64),
  #[error("chunk size {chunk} is not a multiple of page size {page}")]
  ChunkNotPageMultiple { chunk: u64, page: u64 },
  #[error("chunk size {chunk} spans more than {max_pages} pages of {page} bytes")]
  ChunkTooLarge { chunk: u64, page: u64, max_pages: u64 },
  #[error("chunk sizes must ascend, {next} follows {prev}")]
  ChunkOrder { prev: u64, next: u64 },
}

pub type ClassResult<T> = Result<T, ClassError>;
